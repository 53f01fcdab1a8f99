//! AI shopping assistant route handlers.
//!
//! Every endpoint answers even when the model is disabled or misbehaves; the
//! `source` field tells the client which path produced the result.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zar_core::{ChatTurn, Product};

use crate::error::{AppError, Result};
use crate::services::assistant::{
    self, FALLBACK_CHAT_REPLY, RecommendationQuery, Source, StyleAdvice, StyleQuery,
};
use crate::state::AppState;

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Chat response body.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub source: Source,
}

/// Recommendations response body.
#[derive(Debug, Serialize)]
pub struct RecommendationsReply {
    pub products: Vec<Product>,
    pub source: Source,
}

impl RecommendationsReply {
    fn new(products: &[&Product], source: Source) -> Self {
        Self {
            products: products.iter().copied().cloned().collect(),
            source,
        }
    }
}

/// Style advice response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleAdviceReply {
    pub body_type: String,
    pub tips: Vec<String>,
    pub recommendations: Vec<Product>,
    pub source: Source,
}

impl StyleAdviceReply {
    fn new(advice: StyleAdvice<'_>, source: Source) -> Self {
        Self {
            body_type: advice.body_type,
            tips: advice.tips,
            recommendations: advice.recommendations.into_iter().cloned().collect(),
            source,
        }
    }
}

/// Chat with the fashion assistant.
#[instrument(skip(state, request), fields(history = request.history.len()))]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message is required".to_string()));
    }

    let products = state.catalog().products_or_empty().await;
    let reply = assistant::chat(state.gemini(), message, &request.history, &products).await;

    Ok(Json(match reply {
        Some(reply) => ChatReply {
            reply,
            source: Source::Ai,
        },
        None => ChatReply {
            reply: FALLBACK_CHAT_REPLY.to_string(),
            source: Source::Fallback,
        },
    }))
}

/// Recommend up to six products.
#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    Json(query): Json<RecommendationQuery>,
) -> Result<Json<RecommendationsReply>> {
    let products = state.catalog().products_or_empty().await;

    let reply = match assistant::recommend_products(state.gemini(), &query, &products).await {
        Some(picks) => RecommendationsReply::new(&picks, Source::Ai),
        None => RecommendationsReply::new(
            &assistant::fallback_recommendations(&query, &products),
            Source::Fallback,
        ),
    };

    Ok(Json(reply))
}

/// Styling tips with up to three products.
#[instrument(skip(state))]
pub async fn style_advice(
    State(state): State<AppState>,
    Json(query): Json<StyleQuery>,
) -> Result<Json<StyleAdviceReply>> {
    let products = state.catalog().products_or_empty().await;

    let reply = match assistant::style_advice(state.gemini(), &query, &products).await {
        Some(advice) => StyleAdviceReply::new(advice, Source::Ai),
        None => StyleAdviceReply::new(
            assistant::fallback_style_advice(&query, &products),
            Source::Fallback,
        ),
    };

    Ok(Json(reply))
}
