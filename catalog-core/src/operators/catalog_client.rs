//! src/operators/catalog_client.rs
//! ============================================================================
//! # Remote Catalog Client
//!
//! Fetches the bounded product page once per session and validates every
//! record at the boundary. Any deviation from the expected shape is a failure;
//! nothing downstream ever sees an unchecked record.

use std::{collections::HashSet, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    config::CatalogConfig,
    controller::event_loop::TaskResult,
    error::AppError,
    model::catalog_item::{CatalogItem, ItemId},
};

/// Source of the raw catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<CatalogItem>, AppError>;
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    products: Vec<CatalogRecord>,
}

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    id: u64,
    title: String,
    description: String,
    price: f64,
    #[serde(default)]
    rating: Option<f64>,
    category: String,
    thumbnail: String,
}

impl TryFrom<CatalogRecord> for CatalogItem {
    type Error = AppError;

    fn try_from(record: CatalogRecord) -> Result<Self, Self::Error> {
        if !record.price.is_finite() || record.price < 0.0 {
            return Err(AppError::malformed(format!(
                "item {} has invalid price {}",
                record.id, record.price
            )));
        }

        if let Some(rating) = record.rating {
            if !(0.0..=Self::MAX_RATING).contains(&rating) {
                return Err(AppError::malformed(format!(
                    "item {} has rating {} outside [0, 5]",
                    record.id, rating
                )));
            }
        }

        // `+ 0.0` folds -0.0 into 0.0 so `total_cmp` sees one zero.
        Ok(Self {
            id: ItemId(record.id),
            title: record.title,
            description: record.description,
            price: record.price + 0.0,
            rating: record.rating.map(|r| r + 0.0),
            category: record.category,
            thumbnail: record.thumbnail,
        })
    }
}

/// Parses and validates a catalog response body.
pub fn parse_catalog(body: &[u8]) -> Result<Vec<CatalogItem>, AppError> {
    let page: CatalogPage =
        serde_json::from_slice(body).map_err(|e| AppError::malformed(e.to_string()))?;

    let mut seen: HashSet<u64> = HashSet::with_capacity(page.products.len());
    page.products
        .into_iter()
        .map(|record| {
            if !seen.insert(record.id) {
                return Err(AppError::malformed(format!("duplicate item id {}", record.id)));
            }
            CatalogItem::try_from(record)
        })
        .collect()
}

/// reqwest-backed catalog source.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    endpoint: String,
    page_size: u32,
}

impl HttpCatalogSource {
    pub fn new(config: &CatalogConfig) -> Result<Self, AppError> {
        let client = Self::client_builder(config).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Client settings derived from the config. Without `request_timeout` the
    /// request may wait indefinitely.
    fn client_builder(config: &CatalogConfig) -> reqwest::ClientBuilder {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }

    /// Uses a preconfigured client; `request_timeout` is then the client's concern.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            page_size: config.page_size,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<CatalogItem>, AppError> {
        debug!("GET {} limit={}", self.endpoint, self.page_size);

        let response: reqwest::Response = self
            .client
            .get(&self.endpoint)
            .query(&[("limit", self.page_size)])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http_status(response.url().as_str(), status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_catalog(&body)
    }
}

/// Spawns the single startup fetch. The outcome arrives as
/// [`TaskResult::CatalogLoaded`]; if nobody is listening any more it is
/// discarded.
pub fn spawn_catalog_fetch(
    source: Arc<dyn CatalogSource>,
    task_tx: UnboundedSender<TaskResult>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let started = tokio::time::Instant::now();
        let result = source.fetch().await;
        let elapsed: Duration = started.elapsed();

        match &result {
            Ok(items) => info!("Catalog fetched: {} item(s) in {:?}", items.len(), elapsed),
            Err(e) => warn!("Catalog fetch failed after {:?}: {}", elapsed, e),
        }

        if task_tx.send(TaskResult::CatalogLoaded(result)).is_err() {
            debug!("Catalog result dropped, receiver closed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::view_state::ViewState;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    const SCENARIO: &str = r#"{
        "products": [
            {"id": 1, "title": "Zoo Trip", "description": "Animals", "price": 20, "rating": 0,
             "category": "outdoor", "thumbnail": "https://cdn.example/1.png", "stock": 3},
            {"id": 2, "title": "Art Class", "description": "Paint", "price": 10, "rating": 4.5,
             "category": "indoor", "thumbnail": "https://cdn.example/2.png"}
        ],
        "total": 2, "skip": 0, "limit": 12
    }"#;

    /// Serves one canned HTTP response and returns the base URL plus a handle
    /// yielding the raw request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{addr}/products"), handle)
    }

    fn source_for(endpoint: String) -> HttpCatalogSource {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpCatalogSource::with_client(
            client,
            &CatalogConfig {
                endpoint,
                ..CatalogConfig::default()
            },
        )
    }

    #[test]
    fn test_parse_scenario_body() {
        let items = parse_catalog(SCENARIO.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId(1));
        assert!(!items[0].is_rated());
        assert_eq!(items[1].rating, Some(4.5));
        assert_eq!(items[1].category, "indoor");
    }

    #[test]
    fn test_missing_rating_is_accepted_as_unrated() {
        let body = r#"{"products":[{"id":7,"title":"Kite","description":"","price":8,
            "category":"outdoor","thumbnail":""}]}"#;
        let items = parse_catalog(body.as_bytes()).unwrap();
        assert_eq!(items[0].rating, None);
    }

    #[test]
    fn test_shape_deviations_are_failures() {
        let bad = [
            "not json",
            r#"{"items": []}"#,
            r#"{"products": {}}"#,
            r#"{"products":[{"id":1,"title":"A","description":"","price":1,"category":"x"}]}"#,
            r#"{"products":[{"id":"1","title":"A","description":"","price":1,"category":"x","thumbnail":""}]}"#,
            r#"{"products":[{"id":1,"title":"A","description":"","price":-1,"category":"x","thumbnail":""}]}"#,
            r#"{"products":[{"id":1,"title":"A","description":"","price":1,"rating":7,"category":"x","thumbnail":""}]}"#,
            r#"{"products":[
                {"id":1,"title":"A","description":"","price":1,"category":"x","thumbnail":""},
                {"id":1,"title":"B","description":"","price":2,"category":"x","thumbnail":""}]}"#,
        ];
        for body in bad {
            let err = parse_catalog(body.as_bytes()).unwrap_err();
            assert!(
                matches!(err, AppError::MalformedCatalog { .. }),
                "body {body} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_http_fetch_requests_page_size() {
        let (endpoint, server) = serve_once("200 OK", SCENARIO).await;
        let items = source_for(endpoint).fetch().await.unwrap();
        assert_eq!(items.len(), 2);

        let request_line = server.await.unwrap();
        assert!(
            request_line.starts_with("GET /products?limit=12 "),
            "got {request_line}"
        );
    }

    #[tokio::test]
    async fn test_http_error_status_is_failure() {
        let (endpoint, server) = serve_once("503 Service Unavailable", "{}").await;
        let err = source_for(endpoint).fetch().await.unwrap_err();
        assert!(matches!(err, AppError::HttpStatus { status: 503, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = source_for(format!("http://{addr}/products"))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }

    #[tokio::test]
    async fn test_request_timeout_settles_as_failed() {
        // accepts the connection but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let config = CatalogConfig {
            endpoint: format!("http://{addr}/products"),
            request_timeout: Some(Duration::from_millis(100)),
            ..CatalogConfig::default()
        };
        let client = HttpCatalogSource::client_builder(&config)
            .no_proxy()
            .build()
            .unwrap();
        let source = HttpCatalogSource::with_client(client, &config);

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        spawn_catalog_fetch(Arc::new(source), tx);
        let TaskResult::CatalogLoaded(result) = rx.recv().await.unwrap() else {
            panic!("expected a catalog result");
        };
        assert!(
            matches!(&result, Err(AppError::Http(e)) if e.is_timeout()),
            "got {result:?}"
        );

        let mut view = ViewState::new();
        assert!(view.settle(result.ok()));
        assert!(view.error());
        assert!(!view.loading());
        server.abort();
    }

    #[tokio::test]
    async fn test_spawned_fetch_discards_result_without_receiver() {
        struct Fixed;

        #[async_trait]
        impl CatalogSource for Fixed {
            async fn fetch(&self) -> Result<Vec<CatalogItem>, AppError> {
                parse_catalog(SCENARIO.as_bytes())
            }
        }

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        // must not panic
        spawn_catalog_fetch(Arc::new(Fixed), tx).await.unwrap();
    }
}
