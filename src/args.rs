use crate::config::Overrides;
use crate::error::FiledropError;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Upload a file to a filedrop server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Sets the server address to post to. Overrides values in config.
    #[arg(short = 's', value_name = "server")]
    pub server: Option<String>,

    /// Sets the username to use. Overrides values in config.
    #[arg(short = 'u', value_name = "user")]
    pub username: Option<String>,

    /// Sets password to log in as, in cleartext. Overrides values in config.
    #[arg(short = 'p', value_name = "password")]
    pub password: Option<String>,

    /// Delete an already uploaded file instead of uploading
    #[arg(short = 'd')]
    pub delete: bool,

    /// Sets the name of the file after upload
    #[arg(short = 'f', value_name = "filename")]
    pub filename: Option<String>,

    /// Config file to use instead of ~/.config/filedrop/config.json
    #[arg(short = 'c', long = "config", value_name = "path")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// File to upload
    #[arg(value_name = "filepath")]
    pub files: Vec<PathBuf>,
}

impl Args {
    /// The single positional file path.
    pub fn file_path(&self) -> Result<&Path, FiledropError> {
        match self.files.as_slice() {
            [path] => Ok(path.as_path()),
            other => Err(FiledropError::Usage(format!(
                "expected exactly one file path, got {}",
                other.len()
            ))),
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            server: self.server.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}
