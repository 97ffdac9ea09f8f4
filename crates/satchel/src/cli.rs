use clap::{Parser, Subcommand};

use satchel_core::wallet::{DEFAULT_FEE_LEVEL, DEFAULT_FROM_HEIGHT, DEFAULT_MIN_CONFIRMATIONS};

/// Command-line client for an Electrum wallet daemon.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Wallet daemon RPC host.
    #[arg(long, default_value = "localhost", env = "SATCHEL_RPC_HOST")]
    pub rpc_host: String,

    /// Wallet daemon RPC port.
    #[arg(long, default_value = "7777", env = "SATCHEL_RPC_PORT")]
    pub rpc_port: u16,

    /// RPC username (`rpcuser` in the daemon config).
    #[arg(long, env = "SATCHEL_RPC_USER")]
    pub rpc_user: String,

    /// RPC password (`rpcpassword` in the daemon config).
    #[arg(long, env = "SATCHEL_RPC_PASS", hide_env_values = true)]
    pub rpc_pass: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "30", env = "SATCHEL_RPC_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Wallet balance in coins.
    Balance {
        /// Leave out unconfirmed funds.
        #[arg(long)]
        confirmed_only: bool,
    },

    /// Generate a new receiving address.
    NewAddress,

    /// Recommended fee rate per byte.
    FeeRate {
        /// Priority between 0.0 (lowest) and 1.0 (highest).
        #[arg(long, default_value_t = DEFAULT_FEE_LEVEL, allow_negative_numbers = true)]
        level: f64,
    },

    /// Totals received per wallet address.
    History {
        #[arg(long, default_value_t = DEFAULT_MIN_CONFIRMATIONS)]
        min_confirmations: u32,

        /// Resume from this block height (use the previous run's last height).
        #[arg(long, default_value_t = DEFAULT_FROM_HEIGHT.0)]
        from_height: u32,
    },

    /// Check whether an address belongs to the wallet.
    IsMine { address: String },

    /// Check whether an address is well-formed.
    Validate { address: String },

    /// Build and sign a payment; prints the transaction hex.
    PayTo {
        destination: String,

        /// Amount in coins.
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// Manual fee in coins; 0 lets the daemon choose.
        #[arg(long, default_value_t = 0.0)]
        fee: f64,
    },

    /// Build and sign a payment sweeping all funds; prints the transaction hex.
    PayToMax {
        destination: String,

        /// Manual fee in coins; 0 lets the daemon choose.
        #[arg(long, default_value_t = 0.0)]
        fee: f64,
    },

    /// Broadcast a signed transaction; prints the txid.
    Broadcast { tx_hex: String },

    /// Send a raw RPC call and print its result.
    Call {
        method: String,

        /// Parameters as a JSON object.
        params: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let base = ["satchel", "--rpc-user", "u", "--rpc-pass", "p"];
        Cli::try_parse_from(base.iter().chain(args)).expect("arguments must parse")
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn connection_defaults() {
        let cli = parse(&["new-address"]);
        assert_eq!(cli.rpc_host, "localhost");
        assert_eq!(cli.rpc_port, 7777);
        assert_eq!(cli.timeout_secs, 30);
        assert_eq!(cli.command, Command::NewAddress);
    }

    #[test]
    fn fee_rate_defaults_to_middle_priority() {
        let cli = parse(&["fee-rate"]);
        assert_eq!(cli.command, Command::FeeRate { level: 0.5 });
    }

    #[test]
    fn history_defaults() {
        let cli = parse(&["history"]);
        assert_eq!(
            cli.command,
            Command::History {
                min_confirmations: DEFAULT_MIN_CONFIRMATIONS,
                from_height: DEFAULT_FROM_HEIGHT.0
            }
        );
        assert_eq!(DEFAULT_FROM_HEIGHT.0, 1);
    }

    #[test]
    fn history_resume_height() {
        let cli = parse(&["history", "--from-height", "812345", "--min-confirmations", "6"]);
        assert_eq!(
            cli.command,
            Command::History {
                min_confirmations: 6,
                from_height: 812_345
            }
        );
    }

    #[test]
    fn pay_to_with_fee() {
        let cli = parse(&["pay-to", "bc1qdest", "0.25", "--fee", "0.0001"]);
        assert_eq!(
            cli.command,
            Command::PayTo {
                destination: "bc1qdest".into(),
                amount: 0.25,
                fee: 0.0001
            }
        );
    }

    #[test]
    fn negative_amount_reaches_the_client() {
        let cli = parse(&["pay-to", "bc1qdest", "-1"]);
        assert!(matches!(cli.command, Command::PayTo { amount, .. } if amount == -1.0));
    }
}
