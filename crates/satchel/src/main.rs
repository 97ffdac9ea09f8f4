mod cli;

use std::time::Duration;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde_json::{json, Value};

use cli::Command;
use satchel_core::{BlockHeight, CoreError, RpcConfig, RpcError, WalletRpcClient};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr; stdout carries only the command's JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = RpcConfig::new(args.rpc_user, args.rpc_pass)
        .with_host(args.rpc_host)
        .with_port(args.rpc_port)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let endpoint = config.redacted_endpoint();
    let client = WalletRpcClient::connect(config).context("configure wallet RPC client")?;

    let output = run(&client, args.command).await.map_err(|err| {
        match err.downcast_ref::<CoreError>() {
            Some(core) => eyre!(format_rpc_error(&endpoint, core)),
            None => err,
        }
    })?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(client: &WalletRpcClient, command: Command) -> eyre::Result<Value> {
    let output = match command {
        Command::Balance { confirmed_only } => json!(client.get_balance(confirmed_only).await?),
        Command::NewAddress => json!(client.create_new_address().await?),
        Command::FeeRate { level } => json!(client.get_fee_rate(level).await?),
        Command::History {
            min_confirmations,
            from_height,
        } => {
            let scan = client
                .history(min_confirmations, BlockHeight(from_height))
                .await?;
            tracing::info!(
                addresses = scan.received.len(),
                last_height = %scan.last_height,
                "history scanned"
            );
            json!({
                "received": scan.received,
                "last_height": scan.last_height,
            })
        }
        Command::IsMine { address } => json!(client.is_mine(&address).await?),
        Command::Validate { address } => json!(client.validate_address(&address).await?),
        Command::PayTo {
            destination,
            amount,
            fee,
        } => json!(client.pay_to(&destination, amount, fee).await?),
        Command::PayToMax { destination, fee } => {
            json!(client.pay_to_max(&destination, fee).await?)
        }
        Command::Broadcast { tx_hex } => {
            let txid = client.broadcast(&tx_hex).await?;
            tracing::info!(%txid, "transaction broadcast");
            json!(txid)
        }
        Command::Call { method, params } => {
            let params = parse_params(params.as_deref())?;
            client.invoke(&method, params).await?
        }
    };
    Ok(output)
}

fn parse_params(raw: Option<&str>) -> eyre::Result<Value> {
    let Some(raw) = raw else {
        return Ok(json!({}));
    };
    let params: Value = serde_json::from_str(raw).context("parse call params as JSON")?;
    if !params.is_object() {
        return Err(eyre!("call params must be a JSON object, got: {params}"));
    }
    Ok(params)
}

/// Render a client error with an operator-facing hint where the cause is
/// recognisable.
fn format_rpc_error(endpoint: &str, err: &CoreError) -> String {
    let mut lines = vec![
        format!("wallet daemon request to `{endpoint}` failed"),
        format!("error: {err}"),
    ];

    let chain = error_chain(err);
    match err {
        CoreError::Rpc(RpcError::Transport(_)) => {
            if chain.contains("dns error") || chain.contains("failed to lookup address") {
                lines.push("hint: hostname resolution failed; verify --rpc-host".into());
            } else if chain.contains("Connection refused") || chain.contains("connection refused")
            {
                lines.push(
                    "hint: nothing is listening; start the daemon with rpc enabled and check --rpc-port"
                        .into(),
                );
            } else if chain.contains("timed out") {
                lines.push(
                    "hint: the daemon did not answer in time; raise --timeout-secs or check it is not syncing"
                        .into(),
                );
            }
        }
        CoreError::Rpc(RpcError::InvalidResponse(msg))
            if msg.contains("401") || msg.contains("403") =>
        {
            lines.push("hint: authentication failed; verify --rpc-user/--rpc-pass".into());
        }
        CoreError::Rejected(_) => {
            lines.push("hint: amounts and fees are in coins, not satoshis".into());
        }
        _ => {}
    }

    lines.join("\n")
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
