use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use quickview_core::Product;
use serde::Serialize;

use crate::middleware::RequestId;

use super::AppState;

/// Error body of the product route: a bare `{"error": "..."}`, which is the
/// shape the quick-view loader expects.
#[derive(Debug, Serialize)]
pub(super) struct ProductError {
    #[serde(skip)]
    status: StatusCode,
    error: &'static str,
}

impl ProductError {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: "Not found",
        }
    }

    fn upstream() -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            error: "Failed to fetch product",
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<Product>, ProductError> {
    match state.storefront.get_product_by_handle(&handle).await {
        Ok(Some(product)) => Ok(Json(product)),
        Ok(None) => {
            tracing::info!(request_id = %req_id.0, handle = %handle, "product not found");
            Err(ProductError::not_found())
        }
        Err(e) => {
            tracing::error!(
                request_id = %req_id.0,
                handle = %handle,
                error = %e,
                "storefront product lookup failed"
            );
            Err(ProductError::upstream())
        }
    }
}
