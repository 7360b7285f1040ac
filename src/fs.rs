use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Synchronous read/write capability used by the replacement drivers.
///
/// Implement this to redirect file access, e.g. at an in-memory store in
/// tests. The default implementation is [`DiskIo`]. Both traits deal in raw
/// bytes; encoding and decoding happen in the drivers.
pub trait SyncFileIo: Send + Sync {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Asynchronous counterpart of [`SyncFileIo`].
#[async_trait]
pub trait AsyncFileIo: Send + Sync {
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
    async fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Real filesystem access.
///
/// Synchronous writes go through a temp file in the target directory which is
/// persisted over the destination, preserving the permissions of an existing
/// target. A half-written file is never left behind.
pub struct DiskIo;

impl SyncFileIo for DiskIo {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(contents)?;

        // Preserve permissions when overwriting in place
        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(temp_file.path(), metadata.permissions())?;
        }

        temp_file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[async_trait]
impl AsyncFileIo for DiskIo {
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, contents).await
    }
}

/// Looks up an encoding by label, falling back to UTF-8 for unknown or empty
/// labels. The fallback is silent: a typo in the encoding name yields UTF-8
/// behavior, not an error.
pub fn resolve_encoding(label: &str) -> &'static Encoding {
    if label.is_empty() {
        return UTF_8;
    }
    Encoding::for_label(label.as_bytes()).unwrap_or(UTF_8)
}

/// Decodes raw file bytes using the given encoding, with replacement
/// characters for malformed sequences.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Encodes text back into the given encoding for writing.
pub fn encode(text: &str, encoding: &'static Encoding) -> Vec<u8> {
    let (bytes, _, _) = encoding.encode(text);
    bytes.into_owned()
}
