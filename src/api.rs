// API client module: a small blocking HTTP client that posts one file to a
// filedrop server and reads back where it can be downloaded.

use crate::config::Credentials;
use crate::error::FiledropError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use reqwest::blocking::{multipart, Client};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Header carrying the base64 encoded base name of the uploaded file.
pub const FILENAME_HEADER: &str = "Filename";
/// Header carrying the base64 encoded display name, or an empty value.
pub const DISPLAY_FILENAME_HEADER: &str = "X-Filename";

/// Blocking client bound to one set of credentials.
pub struct FiledropClient {
    client: Client,
    credentials: Credentials,
}

/// What to upload, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub local_path: PathBuf,
    pub display_name: Option<String>,
}

/// The server's answer to a successful upload.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    #[serde(rename = "URL", alias = "url")]
    pub url: String,
    #[serde(rename = "Expires", alias = "expires")]
    pub expires: DateTime<FixedOffset>,
}

impl UploadReceipt {
    /// Expiry as RFC3339 with whole seconds, `Z` for UTC.
    pub fn expires_rfc3339(&self) -> String {
        self.expires.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl UploadRequest {
    pub fn new(local_path: impl Into<PathBuf>, display_name: Option<String>) -> Self {
        UploadRequest {
            local_path: local_path.into(),
            display_name: display_name.filter(|n| !n.is_empty()),
        }
    }

    /// Base name of the local file; this is the name the server stores.
    pub fn file_name(&self) -> String {
        base_name(&self.local_path)
    }

    /// Name shown to downloaders: the override's base name, else the file name.
    pub fn effective_display_name(&self) -> String {
        self.display_name
            .as_deref()
            .map(|n| base_name(Path::new(n)))
            .unwrap_or_else(|| self.file_name())
    }

    /// Value of the `Filename` header.
    pub fn filename_header(&self) -> String {
        STANDARD.encode(self.file_name())
    }

    /// Value of the `X-Filename` header. Empty when no override was given.
    pub fn display_filename_header(&self) -> String {
        match &self.display_name {
            Some(name) => STANDARD.encode(base_name(Path::new(name))),
            None => String::new(),
        }
    }
}

/// Last element of `path` after trailing separators are dropped. `..` and `.`
/// are kept as they are, an empty path is `.` and a bare root is `/`.
fn base_name(path: &Path) -> String {
    let text = path.to_string_lossy();
    if text.is_empty() {
        return ".".to_string();
    }
    let trimmed = text.trim_end_matches(std::path::is_separator);
    if trimmed.is_empty() {
        return std::path::MAIN_SEPARATOR.to_string();
    }
    match trimmed.rfind(std::path::is_separator) {
        Some(idx) => trimmed[idx..].chars().skip(1).collect(),
        None => trimmed.to_string(),
    }
}

impl FiledropClient {
    pub fn new(credentials: Credentials) -> Result<Self, FiledropError> {
        let client = Client::builder()
            .user_agent(concat!("filedrop/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(FiledropClient {
            client,
            credentials,
        })
    }

    /// Upload when `delete` is false, otherwise delete.
    pub fn execute(
        &self,
        req: &UploadRequest,
        delete: bool,
    ) -> Result<Option<UploadReceipt>, FiledropError> {
        if delete {
            self.delete(req)?;
            Ok(None)
        } else {
            self.upload(req).map(Some)
        }
    }

    /// Deleting uploads is accepted on the command line but has no server
    /// operation yet. Fails without touching the network.
    pub fn delete(&self, req: &UploadRequest) -> Result<(), FiledropError> {
        tracing::debug!(file = %req.file_name(), "delete requested");
        Err(FiledropError::DeleteUnsupported)
    }

    /// POST the file as multipart/form-data and decode the receipt.
    ///
    /// The body has a single `file` part named after the local base name. The
    /// names also travel base64 encoded in the `Filename` and `X-Filename`
    /// headers, and the request is authenticated with HTTP basic auth.
    pub fn upload(&self, req: &UploadRequest) -> Result<UploadReceipt, FiledropError> {
        let file_error = |source: io::Error| FiledropError::File {
            path: req.local_path.clone(),
            source,
        };
        let file = File::open(&req.local_path).map_err(file_error)?;
        let metadata = file.metadata().map_err(file_error)?;
        if !metadata.is_file() {
            return Err(file_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        let len = metadata.len();

        let part = multipart::Part::reader_with_length(file, len)
            .file_name(req.file_name())
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(
            server = %self.credentials.server,
            file = %req.file_name(),
            display = %req.effective_display_name(),
            bytes = len,
            "uploading"
        );
        let res = self
            .client
            .post(&self.credentials.server)
            .header(FILENAME_HEADER, req.filename_header())
            .header(DISPLAY_FILENAME_HEADER, req.display_filename_header())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .multipart(form)
            .send()?;

        let status = res.status();
        let body = res.bytes()?;
        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), "upload rejected");
            return Err(FiledropError::Server {
                status: status.as_u16(),
                body: body.to_vec(),
            });
        }

        let receipt: UploadReceipt = serde_json::from_slice(&body)?;
        tracing::debug!(url = %receipt.url, "upload accepted");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(value: &str) -> String {
        String::from_utf8(STANDARD.decode(value).unwrap()).unwrap()
    }

    #[test]
    fn headers_without_display_name() {
        let req = UploadRequest::new("/tmp/some dir/report.pdf", None);
        assert_eq!(decode(&req.filename_header()), "report.pdf");
        assert_eq!(req.display_filename_header(), "");
        assert_eq!(req.effective_display_name(), "report.pdf");
    }

    #[test]
    fn display_name_is_reduced_to_its_base_name() {
        let req = UploadRequest::new("report.pdf", Some("../drafts/Q3 ✓.pdf".into()));
        assert_eq!(decode(&req.filename_header()), "report.pdf");
        assert_eq!(decode(&req.display_filename_header()), "Q3 ✓.pdf");
        assert_eq!(req.effective_display_name(), "Q3 ✓.pdf");
    }

    #[test]
    fn base_name_keeps_only_the_last_element() {
        assert_eq!(base_name(Path::new("secret/dir/..")), "..");
        assert_eq!(base_name(Path::new("..")), "..");
        assert_eq!(base_name(Path::new("x/.")), ".");
        assert_eq!(base_name(Path::new("dir/sub/")), "sub");
        assert_eq!(base_name(Path::new("/")), "/");
        assert_eq!(base_name(Path::new("")), ".");
    }

    #[test]
    fn display_name_never_leaks_parent_directories() {
        let req = UploadRequest::new("a.txt", Some("secret/dir/..".into()));
        assert_eq!(decode(&req.display_filename_header()), "..");
        let req = UploadRequest::new("notes/.", None);
        assert_eq!(decode(&req.filename_header()), ".");
    }

    #[test]
    fn empty_display_name_counts_as_absent() {
        let req = UploadRequest::new("a.txt", Some(String::new()));
        assert_eq!(req.display_name, None);
        assert_eq!(req.display_filename_header(), "");
    }

    #[test]
    fn receipt_parses_rfc3339_and_prints_it_back() {
        let receipt: UploadReceipt = serde_json::from_str(
            r#"{"URL":"https://example.com/f/abc","Expires":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(receipt.url, "https://example.com/f/abc");
        assert_eq!(receipt.expires_rfc3339(), "2025-01-01T00:00:00Z");
    }

    #[test]
    fn receipt_keeps_non_utc_offset() {
        let receipt: UploadReceipt = serde_json::from_str(
            r#"{"url":"https://example.com/f/x","expires":"2025-06-30T12:30:00.5+02:00"}"#,
        )
        .unwrap();
        assert_eq!(receipt.expires_rfc3339(), "2025-06-30T12:30:00+02:00");
    }

    #[test]
    fn delete_is_reported_as_unsupported() {
        let client = FiledropClient::new(Credentials::default()).unwrap();
        let req = UploadRequest::new("a.txt", None);
        assert!(matches!(
            client.execute(&req, true),
            Err(FiledropError::DeleteUnsupported)
        ));
    }
}
