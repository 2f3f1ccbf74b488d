use std::time::Duration;

use navsync_core::{CachedSnapshot, CaptureRequest};
use navsync_logging::nav_debug;

use crate::types::map_reqwest_error;
use crate::{FailureKind, RemoteError};

/// Header carrying the shared secret on every request.
pub const AUTH_HEADER: &str = "x-auth-password";
pub const LINK_PATH: &str = "/api/link";
pub const STORAGE_PATH: &str = "/api/storage";

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub api_base: String,
    pub secret: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl RemoteSettings {
    pub fn new(api_base: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            api_base: api_base.into(),
            secret,
            ..Self::default()
        }
    }

    /// The secret, if one is set and not blank.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3000".to_string(),
            secret: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The authoritative link dataset.
#[async_trait::async_trait]
pub trait LinkStore: Send + Sync {
    /// False when no secret is available; callers must not issue requests then.
    fn is_configured(&self) -> bool;

    async fn create_link(&self, request: &CaptureRequest) -> Result<(), RemoteError>;

    async fn fetch_snapshot(&self) -> Result<CachedSnapshot, RemoteError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestLinkStore {
    settings: RemoteSettings,
    client: reqwest::Client,
}

impl ReqwestLinkStore {
    pub fn new(settings: RemoteSettings) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RemoteError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &RemoteSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    fn require_secret(&self) -> Result<&str, RemoteError> {
        self.settings
            .secret()
            .ok_or_else(|| RemoteError::not_configured("shared secret"))
    }
}

#[async_trait::async_trait]
impl LinkStore for ReqwestLinkStore {
    fn is_configured(&self) -> bool {
        self.settings.secret().is_some()
    }

    async fn create_link(&self, request: &CaptureRequest) -> Result<(), RemoteError> {
        let secret = self.require_secret()?;
        let url = self.endpoint(LINK_PATH);
        nav_debug!("POST {} category={}", url, request.category_id);

        let response = self
            .client
            .post(&url)
            .header(AUTH_HEADER, secret)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }

    async fn fetch_snapshot(&self) -> Result<CachedSnapshot, RemoteError> {
        let secret = self.require_secret()?;
        let url = self.endpoint(STORAGE_PATH);
        nav_debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTH_HEADER, secret)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        response
            .json::<CachedSnapshot>()
            .await
            .map_err(|err| RemoteError::new(FailureKind::InvalidResponse, err.to_string()))
    }
}
