mod proof;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shade_client::{HttpProver, HttpProverConfig};
use shade_config::ShadeConfig;
use shade_privacy::MockProver;
use shade_transaction::TxId;
use std::path::PathBuf;

/// Shade CLI - note proofs and rollup utilities
#[derive(Parser, Debug)]
#[command(name = "shade")]
#[command(about = "Shade rollup client tools", long_about = None)]
struct Cli {
    /// Config file (default: SHADE_CONFIG, ./config.toml, ~/.shade/config.toml)
    #[arg(long, global = true, env = "SHADE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble prover inputs for a settled note and print them as JSON
    Assemble {
        #[command(flatten)]
        note: proof::NoteArgs,
    },
    /// Assemble, prove and verify a note membership proof
    Prove {
        #[command(flatten)]
        note: proof::NoteArgs,

        /// Use the mock prover regardless of config
        #[arg(long)]
        mock: bool,
    },
    /// Print a sample config file
    SampleConfig,
    /// Print the explorer link of a transaction
    Explorer {
        /// Transaction id (0x-prefixed hex)
        tx_id: TxId,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ShadeConfig> {
    match path {
        Some(path) => ShadeConfig::load_from(path),
        None => ShadeConfig::load(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Assemble { note } => {
            let config = load_config(cli.config.as_ref())?;
            let inputs = proof::assemble(&note, &config)?;
            println!("{}", serde_json::to_string_pretty(&inputs.to_prover_args())?);
        }
        Command::Prove { note, mock } => {
            let config = load_config(cli.config.as_ref())?;
            let outcome = if mock || config.prover.mock {
                log::info!("Using mock prover");
                proof::prove(&note, &config, &MockProver::new()).await?
            } else {
                let prover = HttpProver::new(HttpProverConfig::from(&config.prover))?;
                if !prover.health_check().await {
                    log::warn!(
                        "Prover coordinator at {} is not healthy",
                        config.prover.coordinator_url
                    );
                }
                proof::prove(&note, &config, &prover).await?
            };

            println!("{}", serde_json::to_string_pretty(&outcome.artifact)?);
            if outcome.verified {
                println!("✅ Proof verified");
            } else {
                println!("❌ Proof rejected by verifier");
                std::process::exit(2);
            }
        }
        Command::SampleConfig => {
            println!("{}", ShadeConfig::generate_sample());
        }
        Command::Explorer { tx_id } => {
            let config = load_config(cli.config.as_ref())?;
            println!("{}", config.explorer_tx_url(&tx_id.to_string()));
        }
    }

    Ok(())
}
