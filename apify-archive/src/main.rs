use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Result};
use apify_archive::config::Config;
use apify_archive_common::{CredentialProvider, EnvCredentials, StaticCredentials};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Archive Instagram and TikTok profiles through Apify
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Services to archive, all of them if omitted
    #[clap(subcommand)]
    sns: Option<Sns>,

    /// Config file location
    #[clap(short, long, default_value_os_t = default_config_path(), value_parser)]
    config: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Sns {
    Instagram {
        /// Only download media listed in existing post dumps
        #[clap(long)]
        from_dump: bool,
    },
    Tiktok {
        /// Only download media listed in existing post dumps
        #[clap(long)]
        from_dump: bool,
    },
    All,
}

fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "Apify Archive")
        .map(|d| d.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[tokio::main]
async fn main() {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("apify_archive=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(_) => process::exit(0),
        Err(err) => {
            eprintln!("An error occurred: {:#}", err);
            process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    let conf = Config::read(args.config)?;

    match args.sns.unwrap_or(Sns::All) {
        Sns::Instagram { from_dump: true } => {
            apify_archive::instagram::download_from_dump(&conf.instagram).await?;
        }
        Sns::Instagram { from_dump: false } => {
            let credentials = credentials()?;
            apify_archive::instagram::archive(&conf.instagram, &credentials).await?;
        }
        Sns::Tiktok { from_dump: true } => {
            apify_archive::tiktok::download_from_dump(&conf.tiktok).await?;
        }
        Sns::Tiktok { from_dump: false } => {
            let credentials = credentials()?;
            apify_archive::tiktok::archive(&conf.tiktok, &credentials).await?;
        }
        Sns::All => {
            let credentials = credentials()?;
            let results = [
                apify_archive::instagram::archive(&conf.instagram, &credentials).await,
                apify_archive::tiktok::archive(&conf.tiktok, &credentials).await,
            ];
            let mut errored = false;
            for err in results.into_iter().filter_map(|r| r.err()) {
                eprintln!("An error occurred: {:#}", err);
                errored = true;
            }
            if errored {
                return Err(anyhow!("errors occured while archiving"));
            }
        }
    }

    Ok(())
}

/// Read the API key once for the whole run
fn credentials() -> Result<StaticCredentials> {
    let api_key = EnvCredentials::default().api_key()?;
    Ok(StaticCredentials::new(api_key))
}
