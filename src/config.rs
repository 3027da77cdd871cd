// Per-user credentials: loading, saving and merging them with the
// command-line overrides into the triple the upload uses.

use crate::error::FiledropError;
use crate::prompt::Prompter;
use serde::{Deserialize, Serialize};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Server address and login stored in `~/.config/filedrop/config.json`.
///
/// The key names match the files written by earlier clients, so an existing
/// config keeps working. Lowercase keys are accepted too.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Credentials {
    #[serde(rename = "Server", alias = "server")]
    pub server: String,
    #[serde(rename = "Username", alias = "username")]
    pub username: String,
    #[serde(rename = "Password", alias = "password")]
    pub password: String,
}

/// Values given on the command line. An empty string counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Overrides {
    fn is_empty(&self) -> bool {
        [&self.server, &self.username, &self.password]
            .iter()
            .all(|v| set_value(v).is_none())
    }

    /// Replace every field of `creds` that has a non-empty override.
    pub fn apply(&self, creds: &mut Credentials) {
        if let Some(server) = set_value(&self.server) {
            creds.server = server.to_string();
        }
        if let Some(username) = set_value(&self.username) {
            creds.username = username.to_string();
        }
        if let Some(password) = set_value(&self.password) {
            creds.password = password.to_string();
        }
    }
}

fn set_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self, FiledropError> {
        let body = fs::read(path).map_err(|e| FiledropError::config(path, e))?;
        serde_json::from_slice(&body).map_err(|e| FiledropError::config(path, e))
    }

    /// Write the config as 4-space indented JSON.
    ///
    /// The bytes go to a sibling temp file that is renamed over `path`, so a
    /// failure part way through leaves any previous config untouched.
    pub fn save(&self, path: &Path) -> Result<(), FiledropError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .map_err(|e| FiledropError::config(path, e))?;

        let tmp = path.with_extension("json.tmp");
        let written = fs::File::create(&tmp)
            .and_then(|mut f| f.write_all(&buf).and_then(|_| f.sync_all()))
            .and_then(|_| fs::rename(&tmp, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(FiledropError::config(path, e));
        }
        Ok(())
    }
}

/// `~/.config/filedrop/config.json` for the current user.
pub fn default_config_path() -> Result<PathBuf, FiledropError> {
    let home = dirs::home_dir()
        .ok_or_else(|| FiledropError::config("~", "cannot determine home directory"))?;
    Ok(home.join(".config").join("filedrop").join("config.json"))
}

/// Constant the stored password digest is computed from.
const DIGEST_INPUT: &[u8] = b"some data to hash";

/// Value stored as the password by first-run setup.
///
/// This is the hex encoded 64 byte SHAKE256 digest of a fixed string. The
/// entered password does not take part, so every first-run setup stores the
/// same value. Kept as is for compatibility with existing configs and servers
/// until the intended scheme is settled.
pub fn placeholder_password_digest(_entered: &str) -> String {
    let mut hasher = Shake256::default();
    hasher.update(DIGEST_INPUT);
    let mut out = [0u8; 64];
    hasher.finalize_xof().read(&mut out);
    hex::encode(out)
}

/// Produce the credentials for this invocation.
///
/// An existing config at `config_path` is loaded first. When it is missing and
/// no override was given, the user is asked for the values through `prompter`
/// and they are persisted. Non-empty overrides then replace single fields;
/// they are never written back.
pub fn resolve(
    overrides: &Overrides,
    config_path: &Path,
    prompter: &mut dyn Prompter,
) -> Result<Credentials, FiledropError> {
    let exists = config_path
        .try_exists()
        .map_err(|e| FiledropError::config(config_path, e))?;

    let mut creds = if exists {
        tracing::debug!(path = %config_path.display(), "loading config");
        Credentials::load(config_path)?
    } else {
        Credentials::default()
    };

    if !exists && overrides.is_empty() {
        creds = first_run_setup(config_path, prompter)?;
    }

    overrides.apply(&mut creds);
    Ok(creds)
}

fn first_run_setup(
    config_path: &Path,
    prompter: &mut dyn Prompter,
) -> Result<Credentials, FiledropError> {
    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| FiledropError::config(dir, e))?;
    }

    prompter.say("Seems you haven't set any default values yet. Please set them now:");
    let server = prompter.ask("Server address")?;
    let username = prompter.ask("Username")?;
    let entered = prompter.ask_secret("Password")?;

    tracing::warn!(
        "stored password is a fixed placeholder digest, not derived from the entered password"
    );
    let creds = Credentials {
        server,
        username,
        password: placeholder_password_digest(&entered),
    };
    creds.save(config_path)?;
    tracing::info!(path = %config_path.display(), "saved config");
    Ok(creds)
}
