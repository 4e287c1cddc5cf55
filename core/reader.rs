use crate::error::{AppError, Result};
use crate::record::ContentRef;
use std::fs;

/// Source of file text for previews and context generation.
pub trait ContentReader: Sync {
    fn read(&self, content_ref: &ContentRef) -> Result<String>;
}

/// Reads straight from the local filesystem. Invalid UTF-8 is replaced with
/// U+FFFD rather than rejected, so binary files still produce some text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentReader;

impl ContentReader for FsContentReader {
    fn read(&self, content_ref: &ContentRef) -> Result<String> {
        let location = content_ref.location();
        let bytes = fs::read(location).map_err(|e| AppError::ReadFailed {
            path: location.display().to_string(),
            source: e,
        })?;
        log::trace!("Read {} bytes from {}", bytes.len(), location.display());
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("Lossy UTF-8 decode for {}", location.display());
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_file_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello\r\nworld").unwrap();

        let text = FsContentReader.read(&ContentRef::new(&path)).unwrap();
        assert_eq!(text, "hello\r\nworld");
    }

    #[test]
    fn missing_file_is_read_failed() {
        let dir = tempdir().unwrap();
        let err = FsContentReader
            .read(&ContentRef::new(dir.path().join("gone.txt")))
            .unwrap_err();
        assert!(matches!(err, AppError::ReadFailed { .. }));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        fs::write(&path, [b'o', b'k', 0xff]).unwrap();

        let text = FsContentReader.read(&ContentRef::new(&path)).unwrap();
        assert_eq!(text, "ok\u{fffd}");
    }
}
