use std::io::Write;

use crate::error::Result;
use crate::kmer::kmer::decode_kmer;
use crate::kmer::word::KmerWord;

/// Writes `edges` as a Graphviz digraph with decoded window labels.
pub fn write_dot<W, I, O>(out: &mut O, edges: I, k: usize) -> Result<()>
where
    W: KmerWord,
    I: IntoIterator<Item = (W, W)>,
    O: Write,
{
    writeln!(out, "digraph G {{")?;
    for (from, to) in edges {
        writeln!(out, "\t{} -> {};", decode_kmer(from, k), decode_kmer(to, k))?;
    }
    writeln!(out, "}}")?;
    Ok(())
}
