use async_trait::async_trait;
use contactdesk::store::{MemoryConnector, MemoryStore, StoreConnector};
use contactdesk::{ConnectionSupervisor, Connector, DocumentStore, SupervisorConfig};
use contactdesk_http::config::SiteConfig;
use contactdesk_http::handlers::AppState;
use contactdesk_relay::{RelayConfig, RelayManager};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const SITE_URL: &str = "https://example.com";

#[allow(dead_code)]
pub struct TestServer {
    pub addr: String,
    pub store: Arc<MemoryStore>,
    pub public_dir: TempDir,
}

#[allow(dead_code)]
pub async fn spawn_server() -> TestServer {
    spawn_server_with_relays(RelayConfig::default()).await
}

/// Spawn the full router over a memory store reached through the supervisor,
/// with a small static site (`index.html`, `about.html`, `style.css`).
pub async fn spawn_server_with_relays(relays: RelayConfig) -> TestServer {
    let store = MemoryStore::new();
    let (addr, public_dir) = spawn_router(
        StoreConnector::Memory(MemoryConnector::new(Arc::clone(&store))),
        relays,
    )
    .await;
    TestServer {
        addr,
        store,
        public_dir,
    }
}

/// Hands out a prepared store on the first attempt.
#[allow(dead_code)]
pub struct ReadyConnector(pub Arc<dyn DocumentStore>);

#[async_trait]
impl Connector for ReadyConnector {
    type Handle = Arc<dyn DocumentStore>;

    fn target(&self) -> String {
        self.0.describe()
    }

    async fn connect(&self) -> contactdesk::Result<Self::Handle> {
        Ok(Arc::clone(&self.0))
    }
}

/// Spawn the full router over whatever store `connector` yields. Returns the
/// bound address and the public dir, which must outlive the server.
pub async fn spawn_router<C>(connector: C, relays: RelayConfig) -> (String, TempDir)
where
    C: Connector<Handle = Arc<dyn DocumentStore>>,
{
    let public_dir = TempDir::new().unwrap();
    std::fs::write(public_dir.path().join("index.html"), "<h1>Home</h1>").unwrap();
    std::fs::write(public_dir.path().join("about.html"), "<h1>About</h1>").unwrap();
    std::fs::write(public_dir.path().join("style.css"), "body{}").unwrap();

    let supervisor = Arc::new(ConnectionSupervisor::new(SupervisorConfig::new(
        3,
        Duration::from_millis(10),
    )));
    let connected = supervisor.supervise(&connector).await.unwrap();

    let state = Arc::new(AppState {
        store: connected.handle,
        supervisor,
        relays: RelayManager::new(relays),
        site: SiteConfig::new(public_dir.path(), SITE_URL),
    });

    let app = contactdesk_http::build_router(state, 64);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    (addr, public_dir)
}

#[allow(dead_code)]
pub fn valid_submission() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "+44 20 7946 0000",
        "message": "I'd like a quote."
    })
}
