//! Minimal CLI over the credential core. Commands are small and auditable so
//! operators can see exactly how a record is produced and checked.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use credhash::{
    algorithm_table, generate_salt, load_config, Algorithm, CredentialHasher, CredentialRecord,
    HasherConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "credhash", version, about = "Hash and verify salted credentials")]
struct Cli {
    /// JSON hasher configuration.
    #[arg(long, env = "CREDHASH_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hash a password and print the record as JSON.
    Hash {
        password: String,

        /// MD5, SHA1, SHA256, SHA512 or BCRYPT.
        #[arg(short, long, default_value = "BCRYPT", value_parser = Algorithm::parse_loose)]
        algorithm: Algorithm,
    },

    /// Verify a password against a JSON record.
    Verify { password: String, record: String },

    /// Print a fresh hex salt.
    Salt {
        /// Length in bytes.
        #[arg(short, long, default_value_t = credhash::DEFAULT_SALT_LEN)]
        length: usize,
    },

    /// List supported algorithms.
    Algorithms,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HasherConfig::default(),
    };
    let hasher = CredentialHasher::new(config);

    match cli.command {
        Command::Hash { password, algorithm } => {
            let record = hasher.hash_async(password, algorithm).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Verify { password, record } => {
            let record = CredentialRecord::from_json(&record)?;
            let matches = hasher.verify_async(password, record).await?;
            println!("{}", if matches { "match" } else { "no-match" });
            if !matches {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Salt { length } => {
            println!("{}", generate_salt(length)?);
        }
        Command::Algorithms => {
            for info in algorithm_table() {
                println!(
                    "{:<8} {:<8} {:<9} {}",
                    info.algorithm, info.name, info.security_tier, info.description
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
