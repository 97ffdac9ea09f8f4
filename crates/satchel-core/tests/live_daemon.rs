use std::env;
use std::sync::Once;

use satchel_core::wallet::{DEFAULT_FROM_HEIGHT, DEFAULT_MIN_CONFIRMATIONS};
use satchel_core::{RpcConfig, WalletRpcClient};

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("satchel_core=debug")),
            )
            .with_target(true)
            .try_init();
    });
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running Electrum daemon (testnet/regtest) with rpc enabled"]
async fn live_daemon_read_only_operations() {
    init_tracing();

    let user = env::var("SATCHEL_TEST_RPC_USER").expect("SATCHEL_TEST_RPC_USER must be set");
    let pass = env::var("SATCHEL_TEST_RPC_PASS").expect("SATCHEL_TEST_RPC_PASS must be set");
    let host = env::var("SATCHEL_TEST_RPC_HOST").unwrap_or_else(|_| "localhost".to_owned());
    let port: u16 = env::var("SATCHEL_TEST_RPC_PORT")
        .ok()
        .map(|p| p.parse().expect("SATCHEL_TEST_RPC_PORT must be a port number"))
        .unwrap_or(7777);

    let client = WalletRpcClient::connect(RpcConfig::new(user, pass).with_host(&host).with_port(port))
        .expect("rpc client must construct");

    eprintln!("[itest] checking getbalance against {host}:{port}");
    let total = client.get_balance(false).await.expect("getbalance must succeed");
    let confirmed = client.get_balance(true).await.expect("getbalance must succeed");
    eprintln!("[itest] balance total={total} confirmed={confirmed}");

    let address = client
        .create_new_address()
        .await
        .expect("createnewaddress must succeed");
    assert!(!address.is_empty(), "new address must not be empty");
    assert!(
        client.validate_address(&address).await.expect("validateaddress must succeed"),
        "freshly generated address must validate"
    );
    assert!(
        client.is_mine(&address).await.expect("ismine must succeed"),
        "freshly generated address must belong to the wallet"
    );

    let rate = client.get_fee_rate(0.5).await.expect("getfeerate must succeed");
    assert!(rate > 0.0, "fee rate must be positive");

    let scan = client
        .history(DEFAULT_MIN_CONFIRMATIONS, DEFAULT_FROM_HEIGHT)
        .await
        .expect("history must succeed");
    assert!(scan.last_height >= DEFAULT_FROM_HEIGHT);
    eprintln!(
        "[itest] history: {} receiving addresses, last height {}",
        scan.received.len(),
        scan.last_height
    );
}
