use clap::{Parser, Subcommand};
use serde_json::Value;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Operator CLI for the forwarding proxy", long_about = None)]
struct Cli {
    /// Base URL of the running proxy.
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    /// Request timeout in seconds.
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the liveness endpoint; exits non-zero unless status is OK
    Health,
    /// Send a GET through the proxy (e.g. `request /api/natal`)
    Request {
        path: String,
        /// Origin header to send, to inspect the CORS grant
        #[arg(long)]
        origin: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .no_proxy()
        .build()?;
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            let status = res.status();
            let json: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
            if !status.is_success() || json.get("status").and_then(Value::as_str) != Some("OK") {
                eprintln!("Error: proxy reported unhealthy (HTTP {})", status);
                std::process::exit(1);
            }
        }
        Commands::Request { path, origin } => {
            let mut req = client.get(format!("{}/{}", base, path.trim_start_matches('/')));
            if let Some(origin) = origin {
                req = req.header(reqwest::header::ORIGIN, origin);
            }
            let res = req.send().await?;
            println!("HTTP {}", res.status());
            for (name, value) in res.headers() {
                if name.as_str().starts_with("access-control-") || name == "x-request-id" {
                    println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
                }
            }
            print_body(res).await?;
        }
    }

    Ok(())
}

async fn print_body(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
