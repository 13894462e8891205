use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use seq_io::fastq::Reader;

use crate::config::defs::ValidateError;
use crate::utils::file::is_gzipped;

pub enum FastqReader {
    Uncompressed(BufReader<File>),
    Gzipped(GzDecoder<File>),
}

impl Read for FastqReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            FastqReader::Uncompressed(r) => r.read(buf),
            FastqReader::Gzipped(r) => r.read(buf),
        }
    }
}

fn open(path: &Path) -> io::Result<FastqReader> {
    let is_gz = is_gzipped(path)?;
    let file = File::open(path)?;
    if is_gz {
        Ok(FastqReader::Gzipped(GzDecoder::new(file)))
    } else {
        Ok(FastqReader::Uncompressed(BufReader::new(file)))
    }
}

/// Record-oriented reader for scanning whole chunk files.
pub fn fastq_reader(path: &Path) -> Result<Reader<FastqReader>, ValidateError> {
    let reader = open(path).map_err(|e| ValidateError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Reader::new(reader))
}

/// First read of a lane FASTQ: the identifier line (token before the first
/// space, leading `@` kept) and the sequence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstRead {
    pub read_id: String,
    pub sequence: String,
}

/// Pulls the first identifier/sequence pair out of a (possibly gzipped)
/// FASTQ file without reading past the sequence line. An empty file yields
/// `Ok(None)`; callers treat that as a fatal pairing error.
pub fn read_first_record(path: &Path) -> Result<Option<FirstRead>, ValidateError> {
    let io_err = |e| ValidateError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let reader = BufReader::new(open(path).map_err(io_err)?);
    let mut read_id: Option<String> = None;

    for line in reader.lines() {
        let line = line.map_err(io_err)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match read_id {
            None => {
                // @A00333:373:HF27HDSX2:3:1101:1597:1000 1:N:0:NCCGTTCT+NCAATCCGTC
                let token = line.split(' ').next().unwrap_or(line);
                read_id = Some(token.to_string());
            }
            Some(id) => {
                return Ok(Some(FirstRead {
                    read_id: id,
                    sequence: line.to_string(),
                }));
            }
        }
    }

    Ok(None)
}
