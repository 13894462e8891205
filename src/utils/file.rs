use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::defs::FASTQ_GZ_EXT;

pub fn is_gzipped(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    let mut buffer = [0u8; 2];
    match file.read_exact(&mut buffer) {
        Ok(()) => Ok(buffer == [0x1F, 0x8B]), // Gzip magic bytes
        // Shorter than two bytes: cannot be gzip
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

/// Lists `*.fastq.gz` files directly under `dir`, sorted by name.
pub fn list_fastq_gz(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if path.is_file() && name.ends_with(FASTQ_GZ_EXT) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Finds candidate merged chunks named `<prefix>-*.fastq.gz`. The prefix
/// may carry a directory component; a bare prefix is resolved against `cwd`.
pub fn find_chunks(chunk_prefix: &str, cwd: &Path) -> io::Result<Vec<PathBuf>> {
    let prefix_path = PathBuf::from(chunk_prefix);
    let dir = match prefix_path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => cwd.to_path_buf(),
        Some(parent) => parent.to_path_buf(),
        None => cwd.to_path_buf(),
    };
    let base = prefix_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(chunk_prefix)
        .to_string();

    let wanted_prefix = format!("{}-", base);
    let mut chunks = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if path.is_file() && name.starts_with(&wanted_prefix) && name.ends_with(FASTQ_GZ_EXT) {
            chunks.push(path);
        }
    }
    chunks.sort();
    Ok(chunks)
}
