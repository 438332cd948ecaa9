//! Dashboard API client.

use super::cache::OfflineCache;
use super::types::{
    Analysis, PrefsUpdate, PriceQuote, RemotePrefs, RemoteSettings, SettingsUpdate,
    SignalHistory, SignalUpdate,
};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::signal::SignalKind;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// The REST surface the dashboard consumes.
///
/// Every call fails on a non-success status or a transport error; there is
/// no retry. Callers decide what a failure means for the UI.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /settings`
    async fn settings(&self) -> Result<RemoteSettings>;
    /// `POST /settings`
    async fn save_settings(&self, update: SettingsUpdate) -> Result<()>;
    /// `GET /prefs`
    async fn prefs(&self) -> Result<RemotePrefs>;
    /// `POST /prefs`
    async fn save_prefs(&self, update: PrefsUpdate) -> Result<()>;
    /// `GET /price/{symbol}`
    async fn price(&self, symbol: &str) -> Result<PriceQuote>;
    /// `GET /signals/{symbol}`
    async fn signals(&self, symbol: &str) -> Result<SignalHistory>;
    /// `POST /signals/{symbol}`
    async fn save_signal(&self, symbol: &str, kind: SignalKind, price: Decimal) -> Result<()>;
    /// `GET /analysis/{symbol}?intervals=..&limit=..`
    async fn analysis(&self, symbol: &str) -> Result<Analysis>;
    /// `GET /signals/{symbol}/csv`
    async fn signals_csv(&self, symbol: &str) -> Result<String>;
}

/// Builder for creating an API client.
pub struct ApiClientBuilder {
    config: ApiConfig,
    cache: Option<OfflineCache>,
}

impl ApiClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
            cache: None,
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Route GET requests through an offline cache.
    pub fn cache(mut self, cache: OfflineCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the API client.
    pub fn build(self) -> Result<ApiClient> {
        ApiClient::new(self.config, self.cache)
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP implementation of [`DashboardApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
    cache: Option<OfflineCache>,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: ApiConfig, cache: Option<OfflineCache>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            http,
            cache,
        })
    }

    /// The offline cache, if enabled.
    pub fn offline_cache(&self) -> Option<&OfflineCache> {
        self.cache.as_ref()
    }

    /// Precache offline pages and drop stale cache versions.
    pub async fn prepare_offline_cache(&self) -> Result<()> {
        let Some(cache) = &self.cache else {
            return Ok(());
        };

        cache.install(|path| self.fetch_text(path)).await?;
        let purged = cache.activate().await;
        if !purged.is_empty() {
            debug!("Dropped {} stale caches", purged.len());
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn analysis_path(&self, symbol: &str) -> String {
        format!(
            "/analysis/{}?intervals={}&limit={}",
            symbol,
            self.config.analysis_intervals.join(","),
            self.config.analysis_limit
        )
    }

    /// GET a path straight from the network.
    async fn fetch_text(&self, path: String) -> Result<String> {
        let response = self.http.get(self.url(&path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::status(status.as_u16(), path));
        }
        Ok(response.text().await?)
    }

    /// GET a path, honouring the offline cache strategy.
    async fn get_text(&self, path: String) -> Result<String> {
        match &self.cache {
            Some(cache) => {
                let network = self.fetch_text(path.clone());
                cache.fetch(&path, || network).await
            }
            None => self.fetch_text(path).await,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: String) -> Result<T> {
        let body = self.get_text(path).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a JSON body. A response body that is not JSON resolves to `{}`.
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<serde_json::Value> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("POST {} failed with {}", path, status);
            return Err(Error::status(status.as_u16(), path));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|_| serde_json::json!({})))
    }
}

#[async_trait]
impl DashboardApi for ApiClient {
    async fn settings(&self) -> Result<RemoteSettings> {
        self.get_json("/settings".to_string()).await
    }

    async fn save_settings(&self, update: SettingsUpdate) -> Result<()> {
        self.post_json("/settings", &update).await.map(|_| ())
    }

    async fn prefs(&self) -> Result<RemotePrefs> {
        self.get_json("/prefs".to_string()).await
    }

    async fn save_prefs(&self, update: PrefsUpdate) -> Result<()> {
        self.post_json("/prefs", &update).await.map(|_| ())
    }

    async fn price(&self, symbol: &str) -> Result<PriceQuote> {
        self.get_json(format!("/price/{}", symbol)).await
    }

    async fn signals(&self, symbol: &str) -> Result<SignalHistory> {
        self.get_json(format!("/signals/{}", symbol)).await
    }

    async fn save_signal(&self, symbol: &str, kind: SignalKind, price: Decimal) -> Result<()> {
        let update = SignalUpdate {
            kind,
            price: price.round_dp(2),
        };
        self.post_json(&format!("/signals/{}", symbol), &update)
            .await
            .map(|_| ())
    }

    async fn analysis(&self, symbol: &str) -> Result<Analysis> {
        self.get_json(self.analysis_path(symbol)).await
    }

    async fn signals_csv(&self, symbol: &str) -> Result<String> {
        self.fetch_text(format!("/signals/{}/csv", symbol)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn client(base_url: String) -> ApiClient {
        ApiClientBuilder::new()
            .config(ApiConfig {
                base_url,
                ..ApiConfig::default()
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_price_decodes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/price/BTC")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"symbol":"BTC","price":64250.12}"#)
            .create_async()
            .await;

        let quote = client(server.url()).price("BTC").await.unwrap();

        mock.assert_async().await;
        assert_eq!(quote.usable(), Some(dec!(64250.12)));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/settings")
            .with_status(500)
            .create_async()
            .await;

        let err = client(server.url()).settings().await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_analysis_query_string() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/analysis/ETH")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("intervals".into(), "5m,15m,1h".into()),
                Matcher::UrlEncoded("limit".into(), "200".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"symbol":"ETH","timeframes":{},"confidence":50}"#)
            .create_async()
            .await;

        let analysis = client(server.url()).analysis("ETH").await.unwrap();

        mock.assert_async().await;
        assert_eq!(analysis.symbol, "ETH");
        assert_eq!(analysis.confidence, dec!(50));
    }

    #[tokio::test]
    async fn test_save_signal_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/signals/SOL")
            .match_body(Matcher::Json(json!({"type": "buy", "price": 142.57})))
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        client(server.url())
            .save_signal("SOL", SignalKind::Buy, dec!(142.5678))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_save_prefs_partial_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/prefs")
            .match_body(Matcher::Json(json!({"selected_coins": ["BTC", "DOT"]})))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        client(server.url())
            .save_prefs(PrefsUpdate::coins(vec!["BTC".into(), "DOT".into()]))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_price_failure_is_not_masked_by_cache() {
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("GET", "/price/BNB")
            .with_status(200)
            .with_body(r#"{"price":580.5}"#)
            .expect(1)
            .create_async()
            .await;

        let client = ApiClientBuilder::new()
            .config(ApiConfig {
                base_url: server.url(),
                ..ApiConfig::default()
            })
            .cache(OfflineCache::new(CacheConfig::default()))
            .build()
            .unwrap();

        assert_eq!(client.price("BNB").await.unwrap().usable(), Some(dec!(580.5)));
        ok.assert_async().await;
        ok.remove_async().await;

        server
            .mock("GET", "/price/BNB")
            .with_status(503)
            .create_async()
            .await;

        let err = client.price("BNB").await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 503, .. }), "{err:?}");
    }
}
