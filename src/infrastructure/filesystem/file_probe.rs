use sha2::{Digest, Sha512};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::warn;

/// Number of leading bytes inspected when classifying a file as binary (4 MiB)
pub const BINARY_CHECK_LIMIT: u64 = 4 * 1024 * 1024;

const READ_CHUNK: usize = 64 * 1024;

/// Stateless helpers for files materialized on disk
pub struct FileProbe;

impl FileProbe {
    /// True if a NUL byte occurs in the first [`BINARY_CHECK_LIMIT`] bytes
    ///
    /// A file that cannot be opened or read counts as binary.
    pub async fn is_binary(path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match Self::probe_binary(path).await {
            Ok(binary) => binary,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "binary check failed, assuming binary");
                true
            }
        }
    }

    /// Strict form of [`FileProbe::is_binary`]; an empty file is text
    pub async fn probe_binary(path: impl AsRef<Path>) -> std::io::Result<bool> {
        let file = File::open(path.as_ref()).await?;
        let mut sample = file.take(BINARY_CHECK_LIMIT);
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            let n = sample.read(&mut buf).await?;
            if n == 0 {
                return Ok(false);
            }
            if buf[..n].contains(&0) {
                return Ok(true);
            }
        }
    }

    /// Lowercase hex SHA-512 of the file content
    pub async fn hash(path: impl AsRef<Path>) -> std::io::Result<String> {
        let file = File::open(path.as_ref()).await?;
        Self::hash_reader(file).await
    }

    /// Lowercase hex SHA-512 of everything `reader` yields
    pub async fn hash_reader<R>(mut reader: R) -> std::io::Result<String>
    where
        R: AsyncRead + Unpin,
    {
        let mut hasher = Sha512::new();
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// File size from metadata
    pub async fn length(path: impl AsRef<Path>) -> std::io::Result<u64> {
        Ok(tokio::fs::metadata(path.as_ref()).await?.len())
    }

    /// Number of bytes `reader` yields before EOF
    pub async fn reader_length<R>(mut reader: R) -> std::io::Result<u64>
    where
        R: AsyncRead + Unpin,
    {
        tokio::io::copy(&mut reader, &mut tokio::io::sink()).await
    }

    /// True if the directory has no entries
    ///
    /// Lookup failures count as empty. Callers that must tell "empty" from
    /// "unreadable" should use [`FileProbe::probe_empty_directory`].
    pub async fn is_empty_directory(path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match Self::probe_empty_directory(path).await {
            Ok(empty) => empty,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "directory listing failed, assuming empty");
                true
            }
        }
    }

    pub async fn probe_empty_directory(path: impl AsRef<Path>) -> std::io::Result<bool> {
        let mut entries = tokio::fs::read_dir(path.as_ref()).await?;
        Ok(entries.next_entry().await?.is_none())
    }
}
