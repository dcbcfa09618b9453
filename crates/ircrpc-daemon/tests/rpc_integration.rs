use anyhow::Result;
use ircrpc_client::{ClientError, RpcClient};
use ircrpc_core::models::Config;
use ircrpc_core::storage::ConfigStorage;
use ircrpc_daemon::{serve, ApiHandler, Credentials, MemoryNetwork, RequestProcessor};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestDaemon {
    url: String,
    config: Config,
    network: Arc<MemoryNetwork>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
    _temp_dir: TempDir,
}

impl TestDaemon {
    async fn start() -> Result<Self> {
        let temp_dir = TempDir::new()?;

        // Defaults are written on first load
        let storage = ConfigStorage::new(temp_dir.path().to_path_buf());
        let mut config = storage.load()?;
        config.rpc.api_password = "s3cret:pass".to_string();
        storage.save(&config)?;
        let config = storage.load()?;
        config.validate()?;

        let network = Arc::new(MemoryNetwork::new(config.network.clone()));
        network.add_user("alice", "Alice", "alice.example", "192.0.2.1")?;
        network.add_user("bob", "Bob", "bob.example", "192.0.2.2")?;
        network.join("alice", "#rust")?;
        network.join("bob", "#rust")?;
        network.set_topic("#rust", "Rust talk")?;

        let processor = Arc::new(RequestProcessor::new(
            Credentials::from_config(&config.rpc),
            ApiHandler::new(network.clone()),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}{}", listener.local_addr()?, config.rpc.path);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let path = config.rpc.path.clone();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            serve(listener, processor, &path, shutdown).await.unwrap();
        });

        Ok(Self {
            url,
            config,
            network,
            shutdown: Some(shutdown_tx),
            handle,
            _temp_dir: temp_dir,
        })
    }

    fn client(&self) -> RpcClient {
        RpcClient::new(
            &self.url,
            &self.config.rpc.api_user,
            &self.config.rpc.api_password,
        )
    }

    async fn stop(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await?;
        Ok(())
    }
}

fn rpc_code(result: std::result::Result<serde_json::Value, ClientError>) -> i32 {
    result
        .expect_err("call should fail")
        .rpc_code()
        .expect("error should be a JSON-RPC error")
}

#[tokio::test]
async fn test_rpc_admin_operations() -> Result<()> {
    let daemon = TestDaemon::start().await?;
    let client = daemon.client();

    println!("Testing Server...");
    let servers = client.server_list().await?;
    assert_eq!(servers[0]["name"], "irc.local");
    assert_eq!(servers[0]["user_count"], 2);

    let server = client.server_get("irc.local").await?;
    assert_eq!(server, servers[0]);

    let res = client.server_rehash().await?;
    assert_eq!(res["result"], "Server rehashed successfully");
    assert_eq!(daemon.network.rehash_count(), 1);

    assert_eq!(rpc_code(client.server_connect("hub.example").await), -32601);

    println!("Testing Server Bans...");
    let res = client.server_ban_add("*@spam.example", "spam", None).await?;
    assert_eq!(res["result"], "Ban added successfully");
    assert_eq!(
        rpc_code(client.server_ban_add("*@spam.example", "spam", Some(60)).await),
        -1001
    );

    let bans = client.server_ban_list().await?;
    assert_eq!(bans[0]["mask"], "*@spam.example");
    assert_eq!(bans[0]["set_by"], "JSON-RPC");

    client.server_ban_del("*@spam.example").await?;
    assert_eq!(rpc_code(client.server_ban_del("*@spam.example").await), -1000);

    println!("Testing Channels...");
    let channel = client.channel_get("#rust").await?;
    assert_eq!(channel["num_users"], 2);
    assert_eq!(channel["topic"], "Rust talk");

    let res = client.channel_set_mode("#rust", "key", "hunter2").await?;
    assert_eq!(res["result"], "Mode set successfully");
    let channels = client.channel_list().await?;
    assert_eq!(channels[0]["modes"], "+knt hunter2");

    let res = client.channel_kick("#rust", "bob", "bye").await?;
    assert_eq!(res["result"], "User kicked successfully by server");
    assert!(!daemon.network.is_member("bob", "#rust"));
    assert_eq!(rpc_code(client.channel_kick("#rust", "bob", "again").await), -1005);

    println!("Testing Users...");
    let user = client.user_get("alice").await?;
    assert_eq!(user["nick"], "alice");
    assert_eq!(user["ip"], "192.0.2.1");

    client.user_set_nick("alice", "alicia").await?;
    client.user_set_realname("alicia", "Alice Liddell").await?;
    client.user_set_vhost("alicia", "staff.example.net").await?;
    client.user_set_mode("alicia", "+iw").await?;

    let user = client.user_get("alicia").await?;
    assert_eq!(user["realname"], "Alice Liddell");
    assert_eq!(user["host"], "staff.example.net");
    assert_eq!(daemon.network.user_modes("alicia").as_deref(), Some("+iw"));

    let users = client.user_list().await?;
    assert_eq!(users.as_array().map(|u| u.len()), Some(2));
    assert_eq!(rpc_code(client.user_get("alice").await), -1000);

    daemon.stop().await
}

#[tokio::test]
async fn test_rpc_protocol_errors() -> Result<()> {
    let daemon = TestDaemon::start().await?;
    let client = daemon.client();

    // Unknown method
    let err = client.call("user.delete", None).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Rpc { code: -32601, ref message } if message == "Method not found"
    ));

    // Missing params lists every required key
    let err = client
        .call(
            "server_ban.add",
            Some(serde_json::json!({"mask": "*@evil.example"})),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Rpc { code: -32602, ref message } if message == "Missing parameters: mask, reason"
    ));

    // Wrong password is denied and nothing changes
    let intruder = RpcClient::new(&daemon.url, "apiuser", "password");
    let err = intruder.server_rehash().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Rpc { code: -32000, ref message } if message == "Unauthorized"
    ));
    assert_eq!(daemon.network.rehash_count(), 0);

    daemon.stop().await
}
