use axum::{
    extract::{Path, State},
    Extension, Json,
};
use quickview_core::{Collection, ProductCard};

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, ApiResponse, AppState};

pub(super) async fn list_collections(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Collection>>>, ApiError> {
    let data = state
        .storefront
        .get_collections()
        .await
        .map_err(|e| map_storefront_error(&req_id, &e))?;

    Ok(ApiResponse::new(data, &req_id))
}

pub(super) async fn list_collection_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<ApiResponse<Vec<ProductCard>>>, ApiError> {
    let data = state
        .storefront
        .get_products_from_collection(&handle)
        .await
        .map_err(|e| map_storefront_error(&req_id, &e))?;

    tracing::debug!(request_id = %req_id.0, handle = %handle, count = data.len(), "collection listed");

    Ok(ApiResponse::new(data, &req_id))
}
