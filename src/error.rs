// Error type shared by the library modules. Every fallible operation in the
// crate returns one of these; only `main` decides to terminate the process.

use std::path::PathBuf;
use thiserror::Error;

/// Usage line printed when the positional arguments are wrong.
pub const USAGE: &str =
    "Usage: filedrop [-s server] [-u user] [-p password] [-d] [-f filename] filepath";

#[derive(Debug, Error)]
pub enum FiledropError {
    /// Bad command-line arguments.
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),

    /// The config directory or file could not be created, read, parsed or written.
    #[error("config error ({}): {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// First-run input could not be read from the terminal.
    #[error("failed to read {field}: {message}")]
    Prompt { field: String, message: String },

    /// The local file could not be opened or read.
    #[error("cannot read {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with something other than 200.
    #[error("server error {status}: {}", String::from_utf8_lossy(.body))]
    Server { status: u16, body: Vec<u8> },

    /// A 200 response whose body is not the expected JSON.
    #[error("error decoding json: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("deleting uploaded files is not implemented yet")]
    DeleteUnsupported,
}

impl FiledropError {
    pub(crate) fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        FiledropError::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_shows_status_and_body_verbatim() {
        let err = FiledropError::Server {
            status: 500,
            body: b"internal error".to_vec(),
        };
        assert_eq!(err.to_string(), "server error 500: internal error");
    }

    #[test]
    fn usage_error_includes_usage_line() {
        let err = FiledropError::Usage("expected exactly one file path, got 2".into());
        let text = err.to_string();
        assert!(text.starts_with("expected exactly one file path, got 2"));
        assert!(text.ends_with(USAGE));
    }
}
