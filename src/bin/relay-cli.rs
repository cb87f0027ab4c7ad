use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crm_relay::probe::Prober;
use crm_relay::{RelayClient, UrlRewriter};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Check and exercise a deployed CRM relay", long_about = None)]
struct Cli {
    /// Site origin hosting the relay.
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    /// Relay mount path vendor URLs are redirected to.
    #[arg(long, default_value = "/.netlify/functions/hubspot")]
    relay_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the diagnostics function
    Functions,
    /// Check that the relay reaches the vendor API
    Relay,
    /// Check direct vendor access (credential from VITE_HUBSPOT_API_KEY)
    Direct {
        #[arg(long, default_value = "https://api.hubapi.com")]
        base_url: String,
    },
    /// Send a request written against the vendor API through the relay
    Call {
        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
        /// Vendor URL, e.g. https://api.hubapi.com/crm/v3/objects/contacts
        target: String,
        /// JSON body
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = RelayClient::new(
        reqwest::Client::new(),
        UrlRewriter::new(crm_relay::rewrite::VENDOR_HOST, cli.relay_path),
        Url::parse(&cli.url)?,
    );
    let prober = Prober::new(client.clone());

    match cli.command {
        Commands::Functions => print_json(&serde_json::to_value(prober.check_functions().await)?)?,
        Commands::Relay => print_json(&serde_json::to_value(prober.check_relay().await)?)?,
        Commands::Direct { base_url } => {
            let credential = std::env::var("VITE_HUBSPOT_API_KEY").unwrap_or_default();
            print_json(&serde_json::to_value(prober.check_direct(&base_url, &credential).await)?)?
        }
        Commands::Call { method, target, data } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let mut request = client.request(method, &target)?;
            if let Some(data) = data {
                request = request
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(data);
            }
            print_response(request.send().await?).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => print_json(&json)?,
        Err(_) => println!("{}", text),
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
