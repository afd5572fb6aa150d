//! Payload encoding: a local file becomes a `data:<mime>;base64,<bytes>` string
//! that can stand in for a record's content reference.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

#[derive(Debug)]
pub enum EncodeError {
    /// The source file could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// The source path is a directory or otherwise not a regular file.
    NotAFile { path: PathBuf },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Io { path, source } => {
                write!(f, "failed to read payload {}: {source}", path.display())
            }
            EncodeError::NotAFile { path } => {
                write!(f, "payload source {} is not a regular file", path.display())
            }
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Io { source, .. } => Some(source),
            EncodeError::NotAFile { .. } => None,
        }
    }
}

/// MIME type guessed from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("xml") | Some("musicxml") => "application/xml",
        Some("mid") | Some("midi") => "audio/midi",
        _ => "application/octet-stream",
    }
}

pub fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Read `path` and encode it as a data URI.
pub async fn encode_file(path: &Path) -> Result<String, EncodeError> {
    let meta = tokio::fs::metadata(path).await.map_err(|source| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(EncodeError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(encode_data_uri(&bytes, mime_for_path(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_shape() {
        assert_eq!(
            encode_data_uri(b"%PDF", "application/pdf"),
            "data:application/pdf;base64,JVBERg=="
        );
    }

    #[test]
    fn mime_guess_is_case_insensitive() {
        assert_eq!(mime_for_path(Path::new("Score.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn encode_file_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let uri = encode_file(&path).await.unwrap();
        assert_eq!(uri, "data:application/pdf;base64,JVBERg==");
    }

    #[tokio::test]
    async fn encode_file_surfaces_missing_and_directory_sources() {
        let dir = tempfile::tempdir().unwrap();

        let missing = encode_file(&dir.path().join("gone.pdf")).await.unwrap_err();
        assert!(matches!(missing, EncodeError::Io { .. }));

        let not_file = encode_file(dir.path()).await.unwrap_err();
        assert!(matches!(not_file, EncodeError::NotAFile { .. }));
    }
}
