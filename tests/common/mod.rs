use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Serialize;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Secret handed to the spawned server and used by `mint_token`, so tests
/// can produce tokens the server accepts without any login flow.
pub const TEST_JWT_SECRET: &str = "playerdeck-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/playerdeck-api");
        cmd.env("PLAYERDECK_PORT", port.to_string())
            .env("PLAYERDECK_JWT_SECRET", TEST_JWT_SECRET)
            .env("APP_ENV", "development")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit the rest of the environment so the server can see
        // DATABASE_URL when one is configured; none of these tests need it
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Degraded (no database) still means the server is up
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

#[derive(Serialize)]
struct TestClaims {
    sub: uuid::Uuid,
    profile_id: uuid::Uuid,
    username: String,
    exp: i64,
    iat: i64,
}

/// Mint a bearer token the server will accept, for the given profile.
pub fn mint_token(user_id: uuid::Uuid, profile_id: uuid::Uuid, username: &str) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = TestClaims {
        sub: user_id,
        profile_id,
        username: username.to_string(),
        exp: now + 3600,
        iat: now,
    };

    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )?;
    Ok(token)
}
