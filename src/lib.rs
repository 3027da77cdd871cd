// Library root
// -----------
// The binary (`main.rs`) parses the command line and hands it to `run`.
//
// Module responsibilities:
// - `args`: command-line flags and the positional file path.
// - `config`: the persisted credentials and how overrides and first-run
//   setup combine into the values used for the request.
// - `prompt`: interactive input for first-run setup.
// - `api`: the HTTP upload itself.
// - `ui`: spinner and result output.
pub mod api;
pub mod args;
pub mod config;
pub mod error;
pub mod prompt;
pub mod ui;

use api::{FiledropClient, UploadReceipt, UploadRequest};
use args::Args;
use error::FiledropError;
use prompt::Prompter;

/// One invocation: check arguments, resolve credentials, then upload.
///
/// Argument errors are reported before the config is touched, and nothing is
/// sent before the credentials are settled.
pub fn run(
    args: &Args,
    prompter: &mut dyn Prompter,
) -> Result<Option<UploadReceipt>, FiledropError> {
    let file_path = args.file_path()?;

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let credentials = config::resolve(&args.overrides(), &config_path, prompter)?;

    let request = UploadRequest::new(file_path, args.filename.clone());
    let client = FiledropClient::new(credentials)?;
    ui::run_transaction(&client, &request, args.delete)
}
