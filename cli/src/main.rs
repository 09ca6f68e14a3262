use cli_helpers::prelude::*;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use wbp_client::{Client, ClientConfig, Discovery};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let opts: Opts = Opts::parse();
    opts.verbose.init_logging()?;

    let mut config = match &opts.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };

    if let Some(user_agent) = opts.user_agent {
        config.user_agent = Some(user_agent);
    }

    if let Some(timeout) = opts.timeout {
        config.timeout = timeout;
    }

    if let Some(discovery) = opts.discovery {
        config.discovery = discovery;
    }

    match opts.command {
        Command::Lookup { url } => {
            let client = Client::new(&config)?;

            match url {
                Some(url) => {
                    let record = client.resolve(&url).await?;
                    println!("{}", serde_json::to_string(&record)?);
                }
                None => {
                    for line in BufReader::new(std::io::stdin()).lines() {
                        let line = line?;
                        let url = line.trim();

                        if url.is_empty() {
                            continue;
                        }

                        match client.resolve(url).await {
                            Ok(record) => {
                                println!("{}", serde_json::to_string(&record)?);
                            }
                            Err(error) => {
                                log::error!("{}: {:?}", url, error);
                            }
                        }
                    }
                }
            }
        }
        Command::Save { url } => {
            let client = Client::new(&config)?;
            let result = client.submit(&url).await?;

            match &result.location {
                Some(location) => log::info!("Captured {} at {}", url, location),
                None => log::warn!("Captured {} without a reported location", url),
            }

            println!("{}", serde_json::to_string(&result)?);
        }
        Command::Date { url } => {
            let date = wbp_core::wayback::human_date(&url);

            if date.is_empty() {
                log::warn!("No capture date in {}", url);
            } else {
                println!("{}", date);
            }
        }
    }

    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("CLI argument reading error")]
    Args(#[from] cli_helpers::Error),
    #[error("JSON encoding error")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error")]
    Config(#[from] wbp_client::config::Error),
    #[error("Wayback Machine client error")]
    Client(#[from] wbp_client::Error),
}

#[derive(Debug, Parser)]
#[clap(name = "wayback-probe", version, author)]
struct Opts {
    #[clap(flatten)]
    verbose: Verbosity,
    /// TOML client configuration
    #[clap(long)]
    config: Option<PathBuf>,
    #[clap(long)]
    user_agent: Option<String>,
    /// Request timeout in seconds
    #[clap(long)]
    timeout: Option<u64>,
    /// One of link, location, or auto
    #[clap(long)]
    discovery: Option<Discovery>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Find the earliest and latest captures of a URL (or of each URL on stdin)
    Lookup {
        #[clap(long)]
        url: Option<String>,
    },
    /// Submit a URL to the save-now endpoint
    Save {
        #[clap(long)]
        url: String,
    },
    /// Print the capture date of a Wayback Machine URL
    Date {
        #[clap(long)]
        url: String,
    },
}
