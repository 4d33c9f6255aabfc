// crates/neurochain-cli/src/commands/chain.rs
//
// `neurochain mine` and `neurochain chain {show, pending, validate, resolve}`.

use clap::Subcommand;
use serde_json::json;

use neurochain_rpc::handlers::chain::{
    GetChainResponse, MineResponse, ResolveResponse, ValidateResponse,
};
use neurochain_rpc::handlers::transaction::ListPendingResponse;

use crate::output::{format_json, format_table, BlockRow, OutputFormat, TransactionRow};
use crate::rpc_client;

/// Chain inspection subcommands.
#[derive(Debug, Subcommand)]
pub enum ChainCmd {
    /// Print every block of the node's chain.
    Show {
        /// Also list each block's transactions.
        #[arg(long)]
        transactions: bool,
    },
    /// List attestations waiting for the next block.
    Pending,
    /// Re-verify every hash link and proof of work.
    Validate,
    /// Pull peer chains now and adopt the longest valid one.
    Resolve,
}

/// Run the mine command.
pub async fn run_mine(rpc: &str, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let resp: MineResponse = rpc_client::call(rpc, "chain/mine", json!({})).await?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&resp)),
        OutputFormat::Table => {
            println!("{}: block {}", resp.message, resp.index);
            println!("  Proof:         {}", resp.proof);
            println!("  Previous hash: {}", resp.previous_hash);
            println!("  Transactions:  {}", resp.transactions.len());
            if !resp.transactions.is_empty() {
                let rows: Vec<TransactionRow> =
                    resp.transactions.iter().map(TransactionRow::from).collect();
                println!("{}", format_table(&rows));
            }
        }
    }
    Ok(())
}

/// Run the chain subcommand.
pub async fn run(
    rpc: &str,
    cmd: &ChainCmd,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ChainCmd::Show { transactions } => {
            let resp: GetChainResponse = rpc_client::call(rpc, "chain/get", json!({})).await?;
            match format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table => {
                    println!("Chain length: {}", resp.length);
                    let rows: Vec<BlockRow> = resp.chain.iter().map(BlockRow::from).collect();
                    println!("{}", format_table(&rows));
                    if *transactions {
                        for block in resp.chain.iter().filter(|b| !b.transactions.is_empty()) {
                            println!();
                            println!("Block {}", block.index);
                            let rows: Vec<TransactionRow> =
                                block.transactions.iter().map(TransactionRow::from).collect();
                            println!("{}", format_table(&rows));
                        }
                    }
                }
            }
        }
        ChainCmd::Pending => {
            let resp: ListPendingResponse =
                rpc_client::call(rpc, "chain/pending", json!({})).await?;
            match format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table if resp.count == 0 => println!("No pending transactions."),
                OutputFormat::Table => {
                    println!("Pending transactions: {}", resp.count);
                    let rows: Vec<TransactionRow> =
                        resp.transactions.iter().map(TransactionRow::from).collect();
                    println!("{}", format_table(&rows));
                }
            }
        }
        ChainCmd::Validate => {
            let resp: ValidateResponse =
                rpc_client::call(rpc, "chain/validate", json!({})).await?;
            match format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table => println!("{}", resp.message),
            }
        }
        ChainCmd::Resolve => {
            let resp: ResolveResponse = rpc_client::call(rpc, "chain/resolve", json!({})).await?;
            match format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table => {
                    println!("{}", resp.message);
                    println!("  Chain length:    {}", resp.length);
                    println!("  Peer candidates: {}", resp.candidates);
                    println!("  Rejected:        {}", resp.rejected);
                }
            }
        }
    }

    Ok(())
}
