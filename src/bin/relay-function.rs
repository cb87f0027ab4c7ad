//! Serverless entry point.
//!
//! Reads one function event (JSON) from stdin, relays it, and writes the
//! function response (JSON) to stdout. Logs go to stderr. A malformed event
//! is answered with a 400 response document.

use std::io::{Read, Write};
use std::path::Path;

use crm_relay::config::{load_config, RelayConfig};
use crm_relay::observability::logging::{self, LogTarget};
use crm_relay::relay::{handle_document, Relay};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::var("CRM_RELAY_CONFIG") {
        Ok(path) => load_config(Path::new(&path))?,
        Err(_) => RelayConfig::default(),
    };
    logging::init(&config.observability.log_level, LogTarget::Stderr);

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let relay = Relay::from_config(&config)?;
    let response = handle_document(&relay, &config, &input).await;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
