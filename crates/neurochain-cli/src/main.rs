// crates/neurochain-cli/src/main.rs
//
// CLI entrypoint for the NeuroChain developer tools.
//
// Provides subcommands for registering and verifying models, mining blocks,
// inspecting the chain, and viewing node status.

mod commands;
mod output;
mod rpc_client;

use clap::{Parser, Subcommand};
use commands::chain::ChainCmd;
use commands::model::{SubmitCmd, VerifyCmd};
use output::OutputFormat;

/// NeuroChain CLI: provenance ledger for AI models.
#[derive(Parser, Debug)]
#[command(
    name = "neurochain",
    version = "0.1.0",
    about = "NeuroChain CLI: register, mine and verify AI model attestations"
)]
struct Cli {
    /// Base URL of the neurochain-daemon.
    #[arg(long, global = true, default_value = "http://127.0.0.1:5000")]
    rpc: String,

    /// Print raw JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Queue a model attestation for the next block.
    Submit(SubmitCmd),

    /// Mine the next block from the pending attestations.
    Mine,

    /// Check whether a model is registered on the chain.
    Verify(VerifyCmd),

    /// Chain inspection: show, pending, validate, resolve.
    #[command(subcommand)]
    Chain(ChainCmd),

    /// Display node health and peers.
    Status,

    /// Tamper with block 2 (daemon must be built with debug-tamper).
    #[command(hide = true)]
    Corrupt,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let format = OutputFormat::from_json_flag(cli.json);

    match &cli.command {
        Commands::Submit(cmd) => commands::model::run_submit(&cli.rpc, cmd, format).await?,
        Commands::Mine => commands::chain::run_mine(&cli.rpc, format).await?,
        Commands::Verify(cmd) => commands::model::run_verify(&cli.rpc, cmd, format).await?,
        Commands::Chain(cmd) => commands::chain::run(&cli.rpc, cmd, format).await?,
        Commands::Status => commands::status::run(&cli.rpc, format).await?,
        Commands::Corrupt => commands::debug::run_corrupt(&cli.rpc).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "neurochain",
            "submit",
            "--author",
            "alice",
            "--name",
            "resnet50",
            "--data",
            "weights",
        ])
        .unwrap();
        match cli.command {
            Commands::Submit(cmd) => {
                assert_eq!(cmd.author, "alice");
                assert_eq!(cmd.model_name, "resnet50");
                assert_eq!(cmd.source.data.as_deref(), Some("weights"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.rpc, "http://127.0.0.1:5000");
        assert!(!cli.json);
    }

    #[test]
    fn test_verify_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["neurochain", "verify"]).is_err());
        assert!(Cli::try_parse_from([
            "neurochain",
            "verify",
            "--data",
            "x",
            "--hash",
            "abc"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["neurochain", "verify", "--hash", "abc"]).is_ok());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "neurochain",
            "chain",
            "show",
            "--json",
            "--rpc",
            "http://10.0.0.2:5000",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.rpc, "http://10.0.0.2:5000");
        assert!(matches!(
            cli.command,
            Commands::Chain(ChainCmd::Show { transactions: false })
        ));
    }
}
