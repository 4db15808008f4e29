//! Product detail loading.
//!
//! [`ProductLoader`] is the seam between the session controller and whatever
//! serves product detail records. [`HttpProductLoader`] talks to the
//! `quickview-server` routes.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use quickview_core::{Product, ProductCard};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::LoadError;

/// Characters escaped when a handle is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Fetches a product's full detail record by handle.
///
/// Implementations never retry; the caller decides whether to try again.
#[async_trait]
pub trait ProductLoader: Send + Sync {
    /// # Errors
    ///
    /// - [`LoadError::NotFound`] when no product has `handle`.
    /// - [`LoadError::Transport`] for any network, status or parse failure.
    async fn load(&self, handle: &str) -> Result<Product, LoadError>;
}

/// Loads products from the quick-view HTTP API.
#[derive(Debug, Clone)]
pub struct HttpProductLoader {
    client: Client,
    base_url: String,
}

/// Envelope of `GET /api/collections/{handle}/products`.
#[derive(Debug, Deserialize)]
struct CollectionResponse {
    data: Vec<ProductCard>,
}

impl HttpProductLoader {
    /// Creates a loader against `base_url` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn product_url(&self, handle: &str) -> String {
        let encoded = utf8_percent_encode(handle, PATH_SEGMENT);
        format!("{}/api/product/{encoded}", self.base_url)
    }

    fn collection_url(&self, handle: &str) -> String {
        let encoded = utf8_percent_encode(handle, PATH_SEGMENT);
        format!("{}/api/collections/{encoded}/products", self.base_url)
    }

    /// Lists the grid cards of a collection.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Transport`] on any network, status or parse failure.
    pub async fn fetch_collection(&self, handle: &str) -> Result<Vec<ProductCard>, LoadError> {
        let url = self.collection_url(handle);
        let response: CollectionResponse = self.get_json(&url).await?.ok_or_else(|| {
            LoadError::Transport(format!("collection route not found at {url}"))
        })?;
        Ok(response.data)
    }

    /// GETs `url` and parses the body; `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LoadError::Transport(format!(
                "unexpected HTTP status {} from {url}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| LoadError::Transport(format!("invalid response body from {url}: {e}")))
    }
}

#[async_trait]
impl ProductLoader for HttpProductLoader {
    async fn load(&self, handle: &str) -> Result<Product, LoadError> {
        let url = self.product_url(handle);
        tracing::debug!(handle, url = %url, "loading product detail");

        self.get_json(&url)
            .await?
            .ok_or_else(|| LoadError::NotFound {
                handle: handle.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> HttpProductLoader {
        HttpProductLoader::new("http://127.0.0.1:3000/", 5, "quickview-test/0.1").expect("client")
    }

    #[test]
    fn product_url_trims_trailing_slash() {
        assert_eq!(
            loader().product_url("linen-shirt"),
            "http://127.0.0.1:3000/api/product/linen-shirt"
        );
    }

    #[test]
    fn product_url_encodes_path_separators() {
        assert_eq!(
            loader().product_url("a/b c"),
            "http://127.0.0.1:3000/api/product/a%2Fb%20c"
        );
    }

    #[test]
    fn collection_url_points_at_products_route() {
        assert_eq!(
            loader().collection_url("all"),
            "http://127.0.0.1:3000/api/collections/all/products"
        );
    }
}
