// src/io/windows.rs
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::Result;
use crate::kmer::kmer::{decode_kmer, encode_kmer_exact};
use crate::kmer::word::KmerWord;

/// Writes one decoded window per line
pub enum WindowWriter {
    Plain(BufWriter<File>),
    Compressed(BufWriter<GzEncoder<File>>),
}

fn is_gzip(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "gz")
}

/// Open a window list for reading, handles gzipped files automatically
pub fn open_windows(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Parses windows of length `k`, skipping blank lines and `#` comments.
pub fn parse_windows<W: KmerWord, R: BufRead>(reader: R, k: usize) -> Result<Vec<W>> {
    let mut windows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        windows.push(encode_kmer_exact(trimmed, k)?);
    }
    Ok(windows)
}

pub fn read_windows<W: KmerWord>(path: &Path, k: usize) -> Result<Vec<W>> {
    parse_windows(open_windows(path)?, k)
}

impl WindowWriter {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        if is_gzip(path) {
            let encoder = GzEncoder::new(file, Compression::default());
            Ok(WindowWriter::Compressed(BufWriter::new(encoder)))
        } else {
            Ok(WindowWriter::Plain(BufWriter::new(file)))
        }
    }

    pub fn write_window<W: KmerWord>(&mut self, window: W, k: usize) -> Result<()> {
        let sequence = decode_kmer(window, k);
        match self {
            WindowWriter::Plain(writer) => writeln!(writer, "{}", sequence)?,
            WindowWriter::Compressed(writer) => writeln!(writer, "{}", sequence)?,
        };
        Ok(())
    }

    pub fn write_all<W: KmerWord>(&mut self, windows: impl IntoIterator<Item = W>, k: usize) -> Result<()> {
        for window in windows {
            self.write_window(window, k)?;
        }
        Ok(())
    }

    /// Flushes buffers and closes the gzip stream.
    pub fn finish(self) -> Result<()> {
        match self {
            WindowWriter::Plain(mut writer) => writer.flush()?,
            WindowWriter::Compressed(writer) => {
                let encoder = writer.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?;
            }
        };
        Ok(())
    }
}
