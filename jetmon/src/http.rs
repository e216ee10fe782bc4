//! HTTP client for the agent's snapshot endpoint.

use std::time::Duration;

use anyhow::Context;
use futures::future::BoxFuture;
use reqwest::{Certificate, Client};
use url::Url;

use crate::error::ConfigError;
use crate::poller::SnapshotSource;
use crate::types::Snapshot;

pub const METRICS_PATH: &str = "/metrics";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Normalises user input into the snapshot URL: a bare `host:port` gets
/// `http://`, and an empty path becomes `/metrics`.
pub fn metrics_url(input: &str) -> Result<Url, ConfigError> {
    let input = input.trim();
    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("http://{input}")
    };
    let mut url =
        Url::parse(&with_scheme).map_err(|_| ConfigError::InvalidUrl(input.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(input.to_string()));
    }
    if url.path().is_empty() || url.path() == "/" {
        url.set_path(METRICS_PATH);
    }
    Ok(url)
}

pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: Url, tls_ca: Option<&str>) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("jetmon/", env!("CARGO_PKG_VERSION")));
        if let Some(path) = tls_ca {
            let pem = std::fs::read(path).with_context(|| format!("read CA file {path}"))?;
            let cert = Certificate::from_pem(&pem).context("parse CA certificate")?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder.build().context("build HTTP client")?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn request_snapshot(&self) -> anyhow::Result<Snapshot> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()?;
        resp.json::<Snapshot>().await.context("decode snapshot")
    }
}

impl SnapshotSource for HttpSource {
    fn fetch(&self) -> BoxFuture<'_, anyhow::Result<Snapshot>> {
        Box::pin(self.request_snapshot())
    }
}
