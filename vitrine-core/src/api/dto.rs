//! Wire shapes of the storefront REST API.
//!
//! Every successful response is wrapped in `{ statusCode, message, data }`.
//! Product search results carry their own `{ meta, data }` page inside that
//! envelope; the category dropdown returns a bare list.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use vitrine_model::{CategoryNode, FetchedPage, PageMeta, Product};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<Value>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// `message` may be a string or a list of validation messages.
    pub fn message_text(&self) -> String {
        message_text(self.message.as_ref())
    }
}

pub(crate) fn message_text(message: Option<&Value>) -> String {
    match message {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductPageDto {
    #[serde(default)]
    pub meta: Option<PageMeta>,
    #[serde(default, rename = "data")]
    pub items: Vec<ProductDto>,
}

impl From<ProductPageDto> for FetchedPage {
    fn from(dto: ProductPageDto) -> Self {
        let items: Vec<Product> = dto.items.into_iter().map(Product::from).collect();
        let page = FetchedPage::new(items);
        match dto.meta {
            Some(meta) => page.with_total(meta.total),
            None => page,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdRef {
    #[serde(alias = "brandId", alias = "categoryId")]
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub product_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub is_deleted: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub brand: Option<IdRef>,
    #[serde(default)]
    pub category: Option<IdRef>,
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        let mut product = Product::new(dto.product_id, dto.price)
            .with_name(dto.name)
            .deleted(dto.is_deleted.unwrap_or(false));
        if let Some(brand) = dto.brand {
            product = product.with_brand(brand.id);
        }
        if let Some(category) = dto.category {
            product = product.with_category(category.id);
        }
        if let Some(created_at) = dto.created_at.as_deref().and_then(parse_timestamp) {
            product = product.with_created_at(created_at);
        }
        product
    }
}

/// Accepts RFC 3339 instants and zone-less local timestamps (read as UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc()),
        Err(err) => {
            debug!(raw, error = %err, "ignoring unparseable createdAt");
            None
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub category_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent: Option<IdRef>,
}

impl From<CategoryDto> for CategoryNode {
    fn from(dto: CategoryDto) -> Self {
        match dto.parent {
            Some(parent) => CategoryNode::child(dto.category_id, dto.name, parent.id),
            None => CategoryNode::root(dto.category_id, dto.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vitrine_model::{BrandId, CategoryId};

    #[test]
    fn decodes_product_page_envelope() {
        let body = json!({
            "statusCode": 200,
            "message": "API OK",
            "data": {
                "meta": { "page": 1, "pageSize": 8, "pages": 3, "total": 17 },
                "data": [
                    {
                        "productId": 7,
                        "name": "Áo polo",
                        "price": 259000.0,
                        "isDeleted": false,
                        "createdAt": "2024-05-01T10:00:00Z",
                        "brand": { "brandId": 2, "name": "Coolmate" },
                        "category": { "categoryId": 11, "name": "Polo" }
                    },
                    { "productId": 8, "price": 10, "isDeleted": true }
                ]
            }
        });
        let envelope: ApiEnvelope<ProductPageDto> =
            serde_json::from_value(body).expect("valid envelope");
        assert_eq!(envelope.status_code, Some(200));
        assert_eq!(envelope.message_text(), "API OK");

        let page = FetchedPage::from(envelope.data.expect("data present"));
        assert_eq!(page.raw_count, 2);
        assert_eq!(page.total, Some(17));
        assert_eq!(page.items[0].brand_id, Some(BrandId(2)));
        assert_eq!(page.items[0].category_id, Some(CategoryId(11)));
        assert!(page.items[0].created_at.is_some());
        assert!(!page.items[1].is_live());
    }

    #[test]
    fn category_parent_reference_becomes_parent_id() {
        let nodes: Vec<CategoryDto> = serde_json::from_value(json!([
            { "categoryId": 1, "name": "Men", "parent": null, "subcategories": [] },
            { "categoryId": 2, "name": "Shirts", "parent": { "categoryId": 1, "name": "Men" } }
        ]))
        .expect("valid categories");
        let nodes: Vec<CategoryNode> = nodes.into_iter().map(CategoryNode::from).collect();
        assert_eq!(nodes[0], CategoryNode::root(1, "Men"));
        assert_eq!(nodes[1], CategoryNode::child(2, "Shirts", 1));
    }

    #[test]
    fn local_timestamps_are_read_as_utc() {
        let ts = parse_timestamp("2024-05-01T10:00:00.123").expect("parses");
        assert_eq!(ts.to_rfc3339(), "2024-05-01T10:00:00.123+00:00");
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn message_lists_are_joined() {
        let value = json!(["price must be positive", "name is required"]);
        assert_eq!(
            message_text(Some(&value)),
            "price must be positive; name is required"
        );
    }
}
