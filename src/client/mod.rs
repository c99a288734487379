// File: ./src/client/mod.rs
//! HTTP client used by the link validator: a hyper-util client over rustls,
//! wrapped in User-Agent and redirect middleware.
pub mod middleware;
pub mod redirect;

use crate::client::middleware::{UserAgentLayer, UserAgentService};
use crate::client::redirect::{FollowRedirectLayer, FollowRedirectService};
use crate::config::LinkCheckConfig;
use crate::linkcheck::UrlCheck;
use anyhow::Result;
use http::{Request, Uri};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tower::{ServiceBuilder, ServiceExt};

type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;
type CheckService = UserAgentService<FollowRedirectService<HttpsClient>>;

#[derive(Clone, Debug)]
pub struct HttpLinkChecker {
    service: CheckService,
    timeout: Duration,
}

impl HttpLinkChecker {
    pub fn new(config: &LinkCheckConfig) -> Result<Self> {
        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            log::warn!("No valid system certificates found, https links will fail.");
        }
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();
        let http_client: HttpsClient = Client::builder(TokioExecutor::new()).build(https_connector);

        let service = ServiceBuilder::new()
            .layer(UserAgentLayer::new(&config.user_agent))
            .layer(FollowRedirectLayer::new(config.max_redirects))
            .service(http_client);

        Ok(Self {
            service,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    async fn fetch(&self, uri: Uri) -> Result<(), String> {
        let req = Request::get(uri).body(String::new()).map_err(|e| e.to_string())?;
        let response = tokio::time::timeout(self.timeout, self.service.clone().oneshot(req))
            .await
            .map_err(|_| format!("timeout after {}s", self.timeout.as_secs()))?
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_redirection() {
            return Err(format!("too many redirects ({})", status));
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(format!("status {}", status));
        }
        Ok(())
    }
}

impl UrlCheck for HttpLinkChecker {
    async fn check(&self, url: &str) -> Result<(), String> {
        if url.starts_with("mailto:") {
            return Ok(());
        }
        let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| e.to_string())?;
        match uri.scheme_str() {
            Some("http") | Some("https") => self.fetch(uri).await,
            _ => Err(format!("unsupported url '{}'", url)),
        }
    }
}
