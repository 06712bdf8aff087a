use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "feedback-cli")]
#[command(about = "Command line client for the feedback service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a feedback entry
    Submit {
        #[arg(long)]
        email: String,
        #[arg(long)]
        rating: i64,
        #[arg(long, default_value = "")]
        message: String,
        #[arg(long, default_value = "feedback-cli")]
        agent: String,
    },
    /// List all stored feedback
    List,
    /// Show a single feedback entry
    Get { id: i64 },
    /// Check the service is up
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Submit { email, rating, message, agent } => {
            client
                .post(format!("{}/feedback", base))
                .json(&json!({
                    "email": email,
                    "rating": rating,
                    "message": message,
                    "agent": agent,
                }))
                .send()
                .await?
        }
        Commands::List => client.get(format!("{}/feedback", base)).send().await?,
        Commands::Get { id } => client.get(format!("{}/feedback/{}", base, id)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: service returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
    Ok(())
}
