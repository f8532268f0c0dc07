pub mod backup_dir;
pub mod export;
pub mod view;

use serde::Serialize;
use templog_cli::Envelope;

/// Print the envelope as JSON on stdout; a failed envelope becomes the
/// command's error
pub fn print_envelope<T: Serialize>(
    envelope: &Envelope<T>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    if envelope.is_failure() {
        let message = envelope.message.clone().unwrap_or_default();
        return Err(message.into());
    }
    Ok(())
}
