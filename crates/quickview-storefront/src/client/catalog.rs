//! Catalog queries: collections, grid cards and product detail.

use quickview_core::{Collection, Product, ProductCard};
use serde_json::json;

use crate::error::StorefrontError;
use crate::normalize::{normalize_card, normalize_product};
use crate::queries;
use crate::types::{CollectionProductsData, CollectionsData, ProductData};

use super::StorefrontClient;

impl StorefrontClient {
    /// Lists the first 20 collections of the shop.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying GraphQL request.
    pub async fn get_collections(&self) -> Result<Vec<Collection>, StorefrontError> {
        let data: CollectionsData = self
            .execute("collections", queries::COLLECTIONS, json!({}))
            .await?;
        Ok(data.collections.nodes)
    }

    /// Lists up to 12 product cards of the collection with `handle`.
    ///
    /// A collection that does not exist yields an empty list.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying GraphQL request.
    pub async fn get_products_from_collection(
        &self,
        handle: &str,
    ) -> Result<Vec<ProductCard>, StorefrontError> {
        let data: CollectionProductsData = self
            .execute(
                &format!("collection(handle={handle})"),
                queries::PRODUCTS_FROM_COLLECTION,
                json!({ "handle": handle }),
            )
            .await?;

        let Some(collection) = data.collection else {
            tracing::info!(handle, "collection not found; returning empty grid");
            return Ok(Vec::new());
        };

        Ok(collection
            .products
            .nodes
            .into_iter()
            .map(normalize_card)
            .collect())
    }

    /// Fetches the full detail record for the product with `handle`.
    ///
    /// Returns `Ok(None)` when the shop has no such product.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying GraphQL request.
    pub async fn get_product_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<Product>, StorefrontError> {
        let data: ProductData = self
            .execute(
                &format!("product(handle={handle})"),
                queries::PRODUCT_BY_HANDLE,
                json!({ "handle": handle }),
            )
            .await?;

        Ok(data.product.map(normalize_product))
    }
}
