use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;
use vitrine_model::{CategoryNode, FetchedPage};

use super::dto::{ApiEnvelope, CategoryDto, ProductPageDto, message_text};
use crate::catalog::{CatalogFetch, CatalogFetchRequest, CategoryFetch};
use crate::error::{CatalogError, Result};

pub const PRODUCTS_PATH: &str = "api/products";
pub const CATEGORY_DROPDOWN_PATH: &str = "api/categories/dropdown";

/// HTTP client for the storefront catalog endpoints.
#[derive(Clone, Debug)]
pub struct StorefrontClient {
    client: Client,
    base_url: Url,
}

impl StorefrontClient {
    /// Create a client rooted at `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vitrine/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(base_url = %base_url, "created storefront client");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base URL
    pub fn build_url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Execute a request and unwrap the response envelope
    async fn execute_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(CatalogError::EmptyResponse {
                endpoint: endpoint.to_string(),
            });
        }
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&bytes)?;
        if let Some(code) = envelope.status_code
            && code >= 400
        {
            return Err(CatalogError::Api {
                status: code,
                message: envelope.message_text(),
            });
        }
        envelope.data.ok_or_else(|| CatalogError::EmptyResponse {
            endpoint: endpoint.to_string(),
        })
    }

    /// One page of the product search endpoint.
    #[instrument(
        name = "storefront.search_products",
        skip(self, request),
        fields(page = request.page, size = request.size, sort = %request.sort),
        err
    )]
    pub async fn search_products(
        &self,
        request: &CatalogFetchRequest,
    ) -> Result<FetchedPage> {
        let url = self.build_url(PRODUCTS_PATH)?;
        let mut query: Vec<(&str, String)> = vec![
            ("page", request.page.to_string()),
            ("size", request.size.to_string()),
            ("sort", request.sort.api_param().to_string()),
        ];
        if !request.filter.is_empty() {
            query.push(("filter", request.filter.clone()));
        }
        debug!(url = %url, filter = %request.filter, "GET products");

        let page: ProductPageDto = self
            .execute_request(PRODUCTS_PATH, self.client.get(url).query(&query))
            .await?;
        Ok(page.into())
    }

    /// The flat category list behind the navigation dropdown.
    #[instrument(name = "storefront.dropdown_categories", skip(self), err)]
    pub async fn dropdown_categories(&self) -> Result<Vec<CategoryNode>> {
        let url = self.build_url(CATEGORY_DROPDOWN_PATH)?;
        debug!(url = %url, "GET categories");
        let categories: Vec<CategoryDto> = self
            .execute_request(CATEGORY_DROPDOWN_PATH, self.client.get(url))
            .await?;
        Ok(categories.into_iter().map(CategoryNode::from).collect())
    }
}

/// Error bodies are returned unwrapped; prefer their `message` field.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .map(|value| message_text(value.get("message")))
        .filter(|message| !message.is_empty());
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        None => body.trim().to_string(),
    }
}

#[async_trait]
impl CatalogFetch for StorefrontClient {
    async fn fetch(&self, request: &CatalogFetchRequest) -> Result<FetchedPage> {
        self.search_products(request).await
    }
}

#[async_trait]
impl CategoryFetch for StorefrontClient {
    async fn fetch_flat_categories(&self) -> Result<Vec<CategoryNode>> {
        self.dropdown_categories().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = StorefrontClient::new("http://shop.local/store", Duration::from_secs(5))
            .expect("valid url");
        assert_eq!(
            client.build_url("/api/products").expect("joins").as_str(),
            "http://shop.local/store/api/products"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = StorefrontClient::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, CatalogError::Url(_)));
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"statusCode":400,"message":"bad filter"}"#),
            "bad filter"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, " upstream down "), "upstream down");
    }
}
