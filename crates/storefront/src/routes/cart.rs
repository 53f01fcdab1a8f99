//! Cart route handlers.
//!
//! The session holds a cart id; the cart itself lives in the
//! [`CartRegistry`](crate::carts::CartRegistry). A cart is created on the
//! first add. Updates and removals on a missing cart or line are no-ops.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;
use zar_core::{CartLineItem, CartStore, Price, ProductId};

use crate::carts::SharedCart;
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Exact total, unrounded.
    pub total: rust_decimal::Decimal,
    /// Total rounded for display, e.g. "$49.99".
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&CartStore::new())
    }
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: cart.total_price(),
            subtotal: cart.subtotal().display(),
            item_count: cart.item_count(),
        }
    }
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id,
            size: line.size.clone(),
            color: line.color.clone(),
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            price: Price::new(line.price).display(),
            line_price: Price::new(line.line_total()).display(),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: Option<u32>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    /// New quantity; zero or less removes the line.
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// The session's cart, if it has one that is still live.
async fn current_cart(state: &AppState, session: &Session) -> Result<Option<SharedCart>> {
    let Some(cart_id) = session.get::<String>(session_keys::CART_ID).await? else {
        return Ok(None);
    };
    Ok(state.carts().get(&cart_id).await)
}

/// The session's cart, creating one (and its id) if needed.
async fn cart_for_update(state: &AppState, session: &Session) -> Result<SharedCart> {
    let cart_id = if let Some(id) = session.get::<String>(session_keys::CART_ID).await? {
        id
    } else {
        let id = Uuid::new_v4().to_string();
        session.insert(session_keys::CART_ID, &id).await?;
        id
    };
    Ok(state.carts().get_or_create(&cart_id).await)
}

/// Run `op` against the session's cart and return the resulting view.
///
/// Without a live cart there is nothing to change and an empty view is returned.
async fn with_existing_cart(
    state: &AppState,
    session: &Session,
    op: impl FnOnce(&mut CartStore),
) -> Result<Json<CartView>> {
    let Some(cart) = current_cart(state, session).await? else {
        return Ok(Json(CartView::empty()));
    };
    let mut cart = cart.lock().await;
    op(&mut cart);
    Ok(Json(CartView::from(&*cart)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    with_existing_cart(&state, &session, |_| {}).await
}

/// Item count for the cart badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Json<CartCount>> {
    let count = match current_cart(&state, &session).await? {
        Some(cart) => cart.lock().await.item_count(),
        None => 0,
    };
    Ok(Json(CartCount { count }))
}

/// Add an item, snapshotting the product's current name, image and price.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let quantity = request.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let products = state.catalog().products().await?;
    let product = products
        .iter()
        .find(|p| p.id == request.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let line = CartLineItem {
        product_id: product.id,
        size: request.size,
        color: request.color,
        quantity,
        price: product.price,
        name: product.name.clone(),
        image: product.image.clone(),
    };

    let cart = cart_for_update(&state, &session).await?;
    let mut cart = cart.lock().await;
    cart.add_item(line);
    Ok(Json(CartView::from(&*cart)))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    with_existing_cart(&state, &session, |cart| {
        cart.update_quantity(
            request.product_id,
            &request.size,
            &request.color,
            request.quantity,
        );
    })
    .await
}

/// Remove a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    with_existing_cart(&state, &session, |cart| {
        cart.remove_item(request.product_id, &request.size, &request.color);
    })
    .await
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    with_existing_cart(&state, &session, CartStore::clear).await
}
