//! Input resolution: load a user-supplied path or URL into memory.
//!
//! lopdf parses from a byte buffer, so both local files and downloads end up
//! as a [`PdfSource`]. The PDF magic bytes (`%PDF`) are checked here so the
//! caller gets a clear error instead of a parser failure deep inside lopdf.

use crate::error::ProofreadError;
use std::path::PathBuf;
use tracing::{debug, info};

/// A PDF document loaded into memory.
#[derive(Clone)]
pub struct PdfSource {
    /// Path or URL the bytes came from, for error messages and logs.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PdfSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfSource")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl PdfSource {
    /// Wrap bytes that are already in memory, validating the PDF header.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ProofreadError> {
        let name = name.into();
        check_magic(&name, &bytes)?;
        Ok(Self { name, bytes })
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to PDF bytes.
///
/// URLs are downloaded with `timeout_secs` as the request timeout; anything
/// else is treated as a local path.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<PdfSource, ProofreadError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(input).await
    }
}

async fn read_local(path_str: &str) -> Result<PdfSource, ProofreadError> {
    let path = PathBuf::from(path_str);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ProofreadError::PermissionDenied { path });
        }
        Err(_) => return Err(ProofreadError::FileNotFound { path }),
    };

    debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
    PdfSource::from_bytes(path_str, bytes)
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<PdfSource, ProofreadError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProofreadError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let map_send_err = |e: reqwest::Error| {
        if e.is_timeout() {
            ProofreadError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ProofreadError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(url).send().await.map_err(map_send_err)?;

    if !response.status().is_success() {
        return Err(ProofreadError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().await.map_err(map_send_err)?;
    info!("Downloaded {} bytes", bytes.len());

    PdfSource::from_bytes(url, bytes.to_vec())
}

fn check_magic(name: &str, bytes: &[u8]) -> Result<(), ProofreadError> {
    if bytes.starts_with(b"%PDF") {
        Ok(())
    } else {
        Err(ProofreadError::NotAPdf {
            source_name: name.to_string(),
            magic: bytes.iter().take(4).copied().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn from_bytes_rejects_non_pdf() {
        let err = PdfSource::from_bytes("notes.txt", b"hello".to_vec()).unwrap_err();
        match err {
            ProofreadError::NotAPdf { source_name, magic } => {
                assert_eq!(source_name, "notes.txt");
                assert_eq!(magic, b"hell".to_vec());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_bytes_rejects_empty_input() {
        assert!(PdfSource::from_bytes("empty.pdf", Vec::new()).is_err());
    }

    #[tokio::test]
    async fn missing_local_file_is_file_not_found() {
        let err = resolve_input("/definitely/not/a/real/file.pdf", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ProofreadError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn local_file_with_pdf_header_resolves() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.5\n%%EOF\n").unwrap();
        let path = tmp.path().to_string_lossy().to_string();

        let source = resolve_input(&path, 5).await.unwrap();
        assert_eq!(source.name, path);
        assert!(source.bytes.starts_with(b"%PDF"));
    }
}
