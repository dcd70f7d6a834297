//! Integration tests for ShardRouter against real pubsub servers

use async_trait::async_trait;
use parking_lot::Mutex;
use realtime_router::{
    DialConfig, Dialer, PublishMessage, RouterConfig, RouterError, ShardRouter, TcpDialer,
};
use realtime_rpc::{PublishHandler, PubsubServer, RpcError, TcpPubsubClient};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct ShardNode {
    received: Mutex<Vec<PublishMessage>>,
    /// Delay before answering a publish for this account
    slow_account: Option<(String, Duration)>,
}

#[async_trait]
impl PublishHandler for ShardNode {
    async fn handle_publish(&self, message: PublishMessage) -> Result<(), String> {
        let delay = match &self.slow_account {
            Some((account, delay)) if *account == message.account_id => Some(*delay),
            _ => None,
        };
        self.received.lock().push(message);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
            return Err("late".to_string());
        }
        Ok(())
    }
}

/// Stands in for cluster DNS: maps shard addresses onto local listeners and
/// records every address it was asked to dial.
struct LocalDialer {
    inner: TcpDialer,
    routes: HashMap<String, SocketAddr>,
    dialed: Mutex<Vec<String>>,
}

#[async_trait]
impl Dialer for LocalDialer {
    type Client = TcpPubsubClient;

    async fn dial(&self, address: &str) -> realtime_rpc::Result<TcpPubsubClient> {
        self.dialed.lock().push(address.to_string());
        let target = self
            .routes
            .get(address)
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| address.to_string());
        self.inner.dial(&target).await
    }
}

async fn start_node() -> (Arc<ShardNode>, SocketAddr) {
    start_node_with(ShardNode::default()).await
}

async fn start_node_with(node: ShardNode) -> (Arc<ShardNode>, SocketAddr) {
    let node = Arc::new(node);
    let server = PubsubServer::bind("127.0.0.1:0", node.clone()).await.unwrap();
    let addr = server.local_addr().unwrap();
    server.spawn();
    (node, addr)
}

fn local_dialer(routes: HashMap<String, SocketAddr>, timeout: Duration) -> LocalDialer {
    LocalDialer {
        inner: TcpDialer::new(
            DialConfig::default()
                .with_timeout(timeout)
                .with_retry_interval(Duration::from_millis(20)),
        ),
        routes,
        dialed: Mutex::new(Vec::new()),
    }
}

#[tokio::test]
async fn test_end_to_end_send() {
    let (node, addr) = start_node().await;
    let routes = HashMap::from([("realtime-2.realtime:48883".to_string(), addr)]);
    let router = ShardRouter::with_dialer(
        RouterConfig::new("realtime:48883", 4),
        local_dialer(routes, Duration::from_secs(5)),
    )
    .unwrap();

    // crc32("hello") % 4 == 2
    router
        .send("hello", vec!["topicA".to_string()], vec![0x01, 0x02])
        .await
        .unwrap();
    router
        .send("hello", vec!["topicB".to_string()], vec![0x03])
        .await
        .unwrap();

    assert_eq!(*router.dialer().dialed.lock(), vec!["realtime-2.realtime:48883"]);

    let received = node.received.lock();
    assert_eq!(received.len(), 2);
    assert_eq!(
        received[0],
        PublishMessage::new("hello", vec!["topicA".to_string()], vec![0x01, 0x02])
    );
    assert_eq!(received[1].topics, vec!["topicB"]);
}

#[tokio::test]
async fn test_accounts_land_on_their_shards() {
    let mut nodes = Vec::new();
    let mut routes = HashMap::new();
    for shard in 0..4 {
        let (node, addr) = start_node().await;
        routes.insert(format!("realtime-{shard}.realtime:48883"), addr);
        nodes.push(node);
    }
    let router = ShardRouter::with_dialer(
        RouterConfig::new("realtime:48883", 4),
        local_dialer(routes, Duration::from_secs(5)),
    )
    .unwrap();

    let accounts: Vec<String> = (0..40).map(|i| format!("account-{i}")).collect();
    for account in &accounts {
        router
            .send(account, vec!["t".to_string()], account.as_bytes().to_vec())
            .await
            .unwrap();
    }

    for account in &accounts {
        let shard = router.shard_for(account);
        let received = nodes[shard].received.lock();
        assert!(received.iter().any(|m| &m.account_id == account));
    }
    let total: usize = nodes.iter().map(|n| n.received.lock().len()).sum();
    assert_eq!(total, accounts.len());
    assert!(router.dialer().dialed.lock().len() <= 4);
}

#[tokio::test]
async fn test_unreachable_shard_times_out_then_recovers() {
    // Reserve a port with nothing listening on it
    let reserved = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let down_addr = reserved.local_addr().unwrap();
    drop(reserved);

    let (_up, up_addr) = start_node().await;
    let routes = HashMap::from([
        ("realtime-0.realtime:48883".to_string(), down_addr),
        ("realtime-1.realtime:48883".to_string(), up_addr),
    ]);
    let router = ShardRouter::with_dialer(
        RouterConfig::new("realtime:48883", 4),
        local_dialer(routes, Duration::from_millis(200)),
    )
    .unwrap();

    // "user-1" -> shard 0, "user-5" -> shard 1
    let err = router
        .send("user-1", vec!["t".to_string()], vec![])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RouterError::Connect {
            shard: 0,
            source: RpcError::Timeout { .. },
            ..
        }
    ));
    assert!(!router.is_connected(0));

    router
        .send("user-5", vec!["t".to_string()], vec![])
        .await
        .unwrap();

    // Bring shard 0 up on the reserved port; the retry dials afresh
    let late = Arc::new(ShardNode::default());
    let server = PubsubServer::bind(down_addr, late.clone()).await.unwrap();
    server.spawn();

    router
        .send("user-1", vec!["t".to_string()], vec![0x09])
        .await
        .unwrap();

    assert_eq!(late.received.lock().len(), 1);
    let dials_to_zero = router
        .dialer()
        .dialed
        .lock()
        .iter()
        .filter(|a| a.as_str() == "realtime-0.realtime:48883")
        .count();
    assert_eq!(dials_to_zero, 2);
}

#[tokio::test]
async fn test_timed_out_send_keeps_handle_usable() {
    // Both accounts live on shard 2 of 4
    let (node, addr) = start_node_with(ShardNode {
        slow_account: Some(("hello".to_string(), Duration::from_millis(200))),
        ..Default::default()
    })
    .await;
    let routes = HashMap::from([("realtime-2.realtime:48883".to_string(), addr)]);
    let router = ShardRouter::with_dialer(
        RouterConfig::new("realtime:48883", 4),
        local_dialer(routes, Duration::from_secs(5)),
    )
    .unwrap();
    let other = (0..)
        .map(|i| format!("account-{i}"))
        .find(|a| router.shard_for(a) == 2)
        .unwrap();

    let timed_out = tokio::time::timeout(
        Duration::from_millis(50),
        router.send("hello", vec!["t".to_string()], vec![]),
    )
    .await;
    assert!(timed_out.is_err());
    assert!(router.is_connected(2));

    router
        .send(&other, vec!["t".to_string()], vec![0x01])
        .await
        .unwrap();

    let err = router
        .send("hello", vec!["t".to_string()], vec![])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RouterError::Publish {
            shard: 2,
            source: RpcError::Rejected(_)
        }
    ));

    assert_eq!(router.dialer().dialed.lock().len(), 1);
    assert_eq!(node.received.lock().len(), 3);
}
