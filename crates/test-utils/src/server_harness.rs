//! Test server harness for cross-service tests
//!
//! Provides `TestAuthServer` and `TestImageServer`, real service instances
//! bound to random local ports.

use crate::fixtures::{users_json, PHOTO_BYTES, PHOTO_NAME, TEST_JWT_SECRET};
use anyhow::{anyhow, Context, Result};
use auth_service::handlers::AppState as AuthState;
use auth_service::repositories::UserStore;
use image_service::routes::AppState as ImageState;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

/// Global metrics handle for test servers.
///
/// Only one recorder can be installed per process; later servers share it
/// or fall back to a detached recorder.
static TEST_METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn test_metrics_handle() -> PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            auth_service::routes::init_metrics_recorder()
                .unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle())
        })
        .clone()
}

async fn serve(app: axum::Router) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|e| anyhow!("Failed to bind test server: {}", e))?;

    let addr = listener
        .local_addr()
        .map_err(|e| anyhow!("Failed to get local address: {}", e))?;

    let handle = tokio::spawn(async move {
        let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
        if let Err(e) = axum::serve(listener, make_service).await {
            eprintln!("Test server error: {}", e);
        }
    });

    Ok((addr, handle))
}

/// Auth service running the real router against fixture credentials.
pub struct TestAuthServer {
    addr: SocketAddr,
    _users_file: tempfile::NamedTempFile,
    _handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn with fixture users and `TEST_JWT_SECRET`.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_vars(HashMap::new()).await
    }

    /// Spawn with extra environment values layered over the defaults.
    pub async fn spawn_with_vars(extra_vars: HashMap<String, String>) -> Result<Self> {
        let users_file = tempfile::NamedTempFile::new()?;
        std::fs::write(users_file.path(), users_json().to_string())?;

        let mut vars = HashMap::from([
            ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            (
                "USERS_FILE".to_string(),
                users_file.path().display().to_string(),
            ),
        ]);
        vars.extend(extra_vars);

        let config = auth_service::config::Config::from_vars(&vars)
            .map_err(|e| anyhow!("Failed to create config: {}", e))?;
        let users = UserStore::load(&config.users_file).await?;

        let state = Arc::new(AuthState { config, users });
        let app = auth_service::routes::build_routes(state, test_metrics_handle());
        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            _users_file: users_file,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Log in and return the session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let response = reqwest::Client::new()
            .post(format!("{}/login", self.url()))
            .json(&serde_json::json!({"username": username, "password": password}))
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        body.get("token")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .context("login response has no token")
    }
}

impl Drop for TestAuthServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

/// Image service pointed at a `TestAuthServer`, serving a temp image root
/// that holds `PHOTO_NAME`.
pub struct TestImageServer {
    addr: SocketAddr,
    state: Arc<ImageState>,
    image_root: tempfile::TempDir,
    _handle: JoinHandle<()>,
}

impl TestImageServer {
    /// Spawn against `auth` with default nonce settings.
    pub async fn spawn(auth: &TestAuthServer) -> Result<Self> {
        Self::spawn_with_vars(auth.addr(), HashMap::new()).await
    }

    /// Spawn against the auth service at `auth_addr` with extra environment
    /// values layered over the defaults.
    pub async fn spawn_with_vars(
        auth_addr: SocketAddr,
        extra_vars: HashMap<String, String>,
    ) -> Result<Self> {
        let image_root = tempfile::tempdir()?;
        std::fs::write(image_root.path().join(PHOTO_NAME), PHOTO_BYTES)?;

        let mut vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            (
                "AUTH_SERVER_HOSTNAME".to_string(),
                auth_addr.ip().to_string(),
            ),
            ("AUTH_SERVER_PORT".to_string(), auth_addr.port().to_string()),
            (
                "IMAGE_ROOT".to_string(),
                image_root.path().display().to_string(),
            ),
        ]);
        vars.extend(extra_vars);

        let config = image_service::config::Config::from_vars(&vars)
            .map_err(|e| anyhow!("Failed to create config: {}", e))?;

        let state = Arc::new(
            ImageState::from_config(config)
                .map_err(|e| anyhow!("Failed to build image state: {}", e))?,
        );
        let app = image_service::routes::build_routes(state.clone(), test_metrics_handle());
        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            state,
            image_root,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shared application state, for inspecting the active nonce set.
    pub fn state(&self) -> &Arc<ImageState> {
        &self.state
    }

    /// Directory served under `/images/`.
    pub fn image_root(&self) -> &std::path::Path {
        self.image_root.path()
    }

    /// Call `GET /validate` with `authorization` as the raw header value.
    pub async fn validate(&self, authorization: Option<&str>) -> Result<reqwest::Response> {
        let mut request = reqwest::Client::new().get(format!("{}/validate", self.url()));
        if let Some(value) = authorization {
            request = request.header("Authorization", value);
        }
        Ok(request.send().await?)
    }

    /// Exchange a session token for a nonce.
    pub async fn request_nonce(&self, token: &str) -> Result<String> {
        let response = self.validate(Some(token)).await?.error_for_status()?;
        let body: serde_json::Value = response.json().await?;
        body.get("nonce")
            .and_then(|n| n.as_str())
            .map(str::to_string)
            .context("validate response has no nonce")
    }

    /// Call `GET /images/{path}?nonce={nonce}`.
    pub async fn fetch(&self, path: &str, nonce: &str) -> Result<reqwest::Response> {
        Ok(reqwest::Client::new()
            .get(format!("{}/images/{}", self.url(), path))
            .query(&[("nonce", nonce)])
            .send()
            .await?)
    }
}

impl Drop for TestImageServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
