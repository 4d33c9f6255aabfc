// crates/neurochain-cli/src/commands/model.rs
//
// `neurochain submit` and `neurochain verify`: register a model attestation
// and check a model against the ledger.

use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use neurochain_core::crypto::digest;
use neurochain_rpc::handlers::model::VerifyModelResponse;
use neurochain_rpc::handlers::transaction::NewTransactionResponse;

use crate::output::{format_json, format_table, OutputFormat, TransactionRow};
use crate::rpc_client;

/// Where the model bytes come from. Exactly one must be given.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ModelSource {
    /// Path to the model file; hashed locally, only the digest is sent.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Inline stand-in contents, hashed by the daemon.
    #[arg(long)]
    pub data: Option<String>,

    /// Precomputed SHA-256 hex digest of the model file.
    #[arg(long)]
    pub hash: Option<String>,
}

impl ModelSource {
    /// JSON-RPC params identifying the model.
    pub fn to_params(&self) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        if let Some(path) = &self.file {
            let bytes = std::fs::read(path)
                .map_err(|e| format!("could not read {}: {}", path.display(), e))?;
            return Ok(json!({ "model_hash": digest(&bytes) }));
        }
        if let Some(data) = &self.data {
            return Ok(json!({ "file_data": data }));
        }
        if let Some(hash) = &self.hash {
            return Ok(json!({ "model_hash": hash.trim().to_lowercase() }));
        }
        Err("one of --file, --data or --hash is required".into())
    }
}

/// Register a model attestation.
#[derive(Debug, Args)]
pub struct SubmitCmd {
    /// Author registering the model.
    #[arg(long)]
    pub author: String,

    /// Human-readable model name.
    #[arg(long = "name")]
    pub model_name: String,

    #[command(flatten)]
    pub source: ModelSource,
}

/// Check whether a model is registered.
#[derive(Debug, Args)]
pub struct VerifyCmd {
    #[command(flatten)]
    pub source: ModelSource,
}

/// Build the `transactions/new` params for a submit command.
pub fn submit_params(cmd: &SubmitCmd) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mut params = cmd.source.to_params()?;
    params["author"] = json!(cmd.author);
    params["model_name"] = json!(cmd.model_name);
    Ok(params)
}

/// Run the submit command.
pub async fn run_submit(
    rpc: &str,
    cmd: &SubmitCmd,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let resp: NewTransactionResponse =
        rpc_client::call(rpc, "transactions/new", submit_params(cmd)?).await?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&resp)),
        OutputFormat::Table => {
            println!("{}", resp.message);
            println!("  Model hash: {}", resp.model_hash);
            println!("  Run `neurochain mine` to seal it.");
        }
    }
    Ok(())
}

/// Run the verify command.
pub async fn run_verify(
    rpc: &str,
    cmd: &VerifyCmd,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let resp: VerifyModelResponse =
        rpc_client::call(rpc, "model/verify", cmd.source.to_params()?).await?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&resp)),
        OutputFormat::Table => {
            println!("{}: {}", resp.status, resp.message);
            if let Some(tx) = &resp.details {
                println!("{}", format_table(&[TransactionRow::from(tx)]));
            }
        }
    }
    Ok(())
}
