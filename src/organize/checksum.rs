//! SHA-256 checksums used to confirm a copied file before its source is removed.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Buffer size for reading files (8KB)
const BUFFER_SIZE: usize = 8192;

/// Content fingerprint of a regular file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChecksum {
    pub sha256: String,
    pub size: u64,
}

/// Compute the SHA-256 checksum of a file
pub fn compute_file_checksum(path: &Path) -> io::Result<FileChecksum> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    // Read and hash in chunks
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(FileChecksum {
        sha256: hex::encode(hasher.finalize()),
        size,
    })
}

/// True when both files exist and have identical content
pub fn same_content(a: &Path, b: &Path) -> io::Result<bool> {
    let left = compute_file_checksum(a)?;
    let right = compute_file_checksum(b)?;
    Ok(left == right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_compute_file_checksum() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.pdf");
        fs::write(&file_path, b"Hello, World!").unwrap();

        let checksum = compute_file_checksum(&file_path).unwrap();

        assert_eq!(checksum.size, 13);
        assert_eq!(
            checksum.sha256,
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_same_content() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.pdf");
        let b = temp_dir.path().join("b.pdf");

        fs::write(&a, b"Test content").unwrap();
        fs::write(&b, b"Test content").unwrap();
        assert!(same_content(&a, &b).unwrap());

        fs::write(&b, b"Modified content").unwrap();
        assert!(!same_content(&a, &b).unwrap());
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(compute_file_checksum(&temp_dir.path().join("missing.pdf")).is_err());
    }
}
