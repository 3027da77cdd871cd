// UI layer: the spinner shown while the upload runs and the lines printed
// once it finishes.

use crate::api::{FiledropClient, UploadReceipt, UploadRequest};
use crate::error::FiledropError;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Run the transaction behind a spinner and print the receipt on success.
pub fn run_transaction(
    client: &FiledropClient,
    req: &UploadRequest,
    delete: bool,
) -> Result<Option<UploadReceipt>, FiledropError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(if delete { "Deleting..." } else { "Uploading..." });
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = client.execute(req, delete);
    spinner.finish_and_clear();

    if let Ok(Some(receipt)) = &outcome {
        print_receipt(&mut io::stdout().lock(), receipt);
    }
    outcome
}

/// Like `report_receipt`, but a failed write is logged instead of returned:
/// the upload itself already succeeded. Returns whether the lines were written.
pub fn print_receipt(out: &mut impl Write, receipt: &UploadReceipt) -> bool {
    match report_receipt(out, receipt).and_then(|_| out.flush()) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(url = %receipt.url, "could not print upload result: {}", e);
            false
        }
    }
}

/// Print the download URL and expiry of a finished upload.
pub fn report_receipt(out: &mut impl Write, receipt: &UploadReceipt) -> io::Result<()> {
    writeln!(out, "File successfully uploaded")?;
    writeln!(out, "URL: {}", receipt.url)?;
    writeln!(out, "It expires: {}", receipt.expires_rfc3339())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_contains_url_and_expiry() {
        let receipt: UploadReceipt = serde_json::from_str(
            r#"{"URL":"https://example.com/f/abc","Expires":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let mut out = Vec::new();
        report_receipt(&mut out, &receipt).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            concat!(
                "File successfully uploaded\n",
                "URL: https://example.com/f/abc\n",
                "It expires: 2025-01-01T00:00:00Z\n"
            )
        );
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn print_receipt_reports_write_failure() {
        let receipt = sample_receipt();
        assert!(!print_receipt(&mut ClosedPipe, &receipt));
        let mut out = Vec::new();
        assert!(print_receipt(&mut out, &receipt));
        assert!(!out.is_empty());
    }

    fn sample_receipt() -> UploadReceipt {
        serde_json::from_str(
            r#"{"URL":"https://example.com/f/abc","Expires":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap()
    }
}
