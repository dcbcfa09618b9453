//! Command-line client for the ircrpc API

use anyhow::{Context, Result};
use clap::Parser;
use ircrpc_client::{ClientError, RpcClient, DEFAULT_URL};
use ircrpc_core::models::config::{DEFAULT_API_PASSWORD, DEFAULT_API_USER};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "ircrpc")]
#[command(about = "Call the ircrpc JSON-RPC API", long_about = None)]
struct Args {
    /// Endpoint URL
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    /// API user
    #[arg(short, long, default_value = DEFAULT_API_USER)]
    user: String,

    /// API password
    #[arg(short, long, default_value = DEFAULT_API_PASSWORD)]
    password: String,

    /// Method name, e.g. `user.get`
    method: String,

    /// Params as a JSON object, e.g. '{"nick":"alice"}'
    params: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let params = args
        .params
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("Params must be valid JSON")?;

    let client = RpcClient::new(args.url, args.user, args.password);

    match client.call(args.method, params).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(ClientError::Rpc { code, message }) => {
            eprintln!("Error {}: {}", code, message);
            std::process::exit(1);
        }
        Err(e) => {
            Err(anyhow::Error::new(e).context(format!("Request to {} failed", client.url())))
        }
    }
}
