//! PDF documents uploaded for question extraction.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::multipart::Part;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{ClientError, ClientResult};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
/// File name reported for uploads that do not come from a path.
pub const DEFAULT_PDF_FILENAME: &str = "document.pdf";
/// Multipart field the service reads the document from.
pub const PDF_FIELD: &str = "file";

pub enum PdfSource {
    Path(PathBuf),
    Reader(Box<dyn AsyncRead + Send + Unpin>),
    Bytes(Vec<u8>),
}

impl PdfSource {
    pub fn reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    pub fn file_name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_PDF_FILENAME.to_string()),
            Self::Reader(_) | Self::Bytes(_) => DEFAULT_PDF_FILENAME.to_string(),
        }
    }

    /// Reads the whole document and wraps it as a multipart part.
    ///
    /// A file opened from a path is closed before this returns, whether the
    /// read succeeded or not.
    pub(crate) async fn into_part(self) -> ClientResult<Part> {
        let file_name = self.file_name();

        let bytes = match self {
            Self::Path(path) => read_file(&path).await?,
            Self::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .await
                    .map_err(ClientError::Stream)?;
                buf
            }
            Self::Bytes(bytes) => bytes,
        };

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(PDF_CONTENT_TYPE)?;
        Ok(part)
    }
}

async fn read_file(path: &Path) -> ClientResult<Vec<u8>> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .await
        .map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(buf)
}

impl fmt::Debug for PdfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
            Self::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

impl From<PathBuf> for PdfSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for PdfSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for PdfSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for PdfSource {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for PdfSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}
