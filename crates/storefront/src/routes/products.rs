//! Product and category route handlers.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;
use zar_core::{FilterSpec, filter};

use crate::error::Result;
use crate::state::AppState;

/// List products matching the `category`, `style` and `search` query.
///
/// Answers 503 when the catalog is unavailable and `[]` when nothing matches.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(spec): Query<FilterSpec>,
) -> Result<Response> {
    let products = state.catalog().products().await?;
    let matching = filter(&products, &spec);
    tracing::debug!(total = products.len(), matching = matching.len(), "Filtered products");

    Ok(Json(matching).into_response())
}

/// List the distinct product categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Response> {
    let categories = state.catalog().categories().await?;
    Ok(Json(&*categories).into_response())
}
