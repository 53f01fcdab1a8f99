//! Shopping assistant backed by a text-completion model.
//!
//! Each flow builds a prompt from the shopper's request and a slice of the
//! catalog, asks the model, then normalizes and validates the reply against
//! the catalog. Every flow returns `None` when the model is disabled, fails,
//! or answers with something unparseable; callers then use the matching
//! `fallback_*` function.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use zar_core::{
    ChatTurn, Product, RECOMMENDATION_LIMIT, STYLE_ADVICE_LIMIT, Style, extract_advice_object,
    extract_id_list, recent_history, resolve,
};

use crate::gemini::{CompletionRequest, GenerationConfig, TextCompletion};

/// Products described in the chat system prompt.
const CHAT_CONTEXT_PRODUCTS: usize = 20;

/// Products offered to the model for recommendations.
const RECOMMENDATION_PROMPT_PRODUCTS: usize = 20;

/// Products offered to the model for styling advice.
const STYLE_PROMPT_PRODUCTS: usize = 10;

/// Body type assumed when the shopper gives none.
const DEFAULT_BODY_TYPE: &str = "regular";

/// Reply used when the model cannot answer a chat message.
pub const FALLBACK_CHAT_REPLY: &str = "I'm having trouble reaching our styling assistant right now. \
You can browse by category or style on the products page, and our size guide and \
returns policy are linked at the bottom of every page.";

/// Whether a result came from the model or from the rule-based fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Ai,
    Fallback,
}

/// What the shopper wants recommendations for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
    #[serde(default)]
    pub preferences: Vec<String>,
    pub budget: Option<Decimal>,
    pub occasion: Option<String>,
    pub style: Option<Style>,
}

/// What the shopper wants styling advice for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleQuery {
    pub body_type: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    pub occasion: Option<String>,
}

impl StyleQuery {
    /// The requested body type, or the default.
    #[must_use]
    pub fn body_type(&self) -> &str {
        self.body_type
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(DEFAULT_BODY_TYPE)
    }
}

/// Styling tips with the products they refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleAdvice<'a> {
    pub body_type: String,
    pub tips: Vec<String>,
    pub recommendations: Vec<&'a Product>,
}

// =============================================================================
// Model-backed flows
// =============================================================================

/// Answer a chat message.
#[instrument(skip_all, fields(history = history.len()))]
pub async fn chat<C: TextCompletion>(
    ai: Option<&C>,
    message: &str,
    history: &[ChatTurn],
    catalog: &[Product],
) -> Option<String> {
    let ai = ai?;

    let request = CompletionRequest {
        prompt: chat_prompt(message, &product_context(catalog)),
        history: recent_history(history).to_vec(),
        generation: Some(GenerationConfig::conversational()),
    };

    match ai.complete(request).await {
        Ok(reply) => Some(reply),
        Err(e) => {
            warn!(error = %e, "Assistant chat failed");
            None
        }
    }
}

/// Ask the model to pick products matching `query`.
///
/// Returns at most six catalog products, in the model's ranking.
#[instrument(skip_all, fields(catalog = catalog.len()))]
pub async fn recommend_products<'a, C: TextCompletion>(
    ai: Option<&C>,
    query: &RecommendationQuery,
    catalog: &'a [Product],
) -> Option<Vec<&'a Product>> {
    let ai = ai?;
    if catalog.is_empty() {
        return None;
    }

    let prompt = recommendation_prompt(query, catalog);
    let reply = match ai.complete(CompletionRequest::prompt(prompt)).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "Assistant recommendations failed");
            return None;
        }
    };

    let Some(ids) = extract_id_list(&reply) else {
        warn!("Assistant recommendations reply had no ID list");
        return None;
    };

    Some(resolve(&ids, catalog, RECOMMENDATION_LIMIT))
}

/// Ask the model for styling tips and up to three matching products.
#[instrument(skip_all, fields(catalog = catalog.len()))]
pub async fn style_advice<'a, C: TextCompletion>(
    ai: Option<&C>,
    query: &StyleQuery,
    catalog: &'a [Product],
) -> Option<StyleAdvice<'a>> {
    let ai = ai?;

    let prompt = style_advice_prompt(query, catalog);
    let reply = match ai.complete(CompletionRequest::prompt(prompt)).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "Assistant style advice failed");
            return None;
        }
    };

    let Some(advice) = extract_advice_object(&reply) else {
        warn!("Assistant style advice reply had no JSON object");
        return None;
    };

    Some(StyleAdvice {
        body_type: query.body_type().to_string(),
        tips: advice.tips,
        recommendations: resolve(
            &advice.recommended_product_ids,
            catalog,
            STYLE_ADVICE_LIMIT,
        ),
    })
}

// =============================================================================
// Rule-based fallbacks
// =============================================================================

/// Products in the requested style and within budget, in catalog order.
#[must_use]
pub fn fallback_recommendations<'a>(
    query: &RecommendationQuery,
    catalog: &'a [Product],
) -> Vec<&'a Product> {
    catalog
        .iter()
        .filter(|p| query.style.is_none_or(|style| p.style == style))
        .filter(|p| query.budget.is_none_or(|budget| p.price <= budget))
        .take(RECOMMENDATION_LIMIT)
        .collect()
}

/// Products whose style is named among the shopper's preferences.
///
/// Preferences that are not style names are ignored; with no usable
/// preference the first products of the catalog are returned.
#[must_use]
pub fn fallback_style_advice<'a>(query: &StyleQuery, catalog: &'a [Product]) -> StyleAdvice<'a> {
    let styles: Vec<Style> = query
        .preferences
        .iter()
        .filter_map(|pref| {
            Style::ALL
                .into_iter()
                .find(|s| s.as_str().eq_ignore_ascii_case(pref.trim()))
        })
        .collect();

    let recommendations = catalog
        .iter()
        .filter(|p| styles.is_empty() || styles.contains(&p.style))
        .take(STYLE_ADVICE_LIMIT)
        .collect();

    StyleAdvice {
        body_type: query.body_type().to_string(),
        tips: Vec::new(),
        recommendations,
    }
}

// =============================================================================
// Prompts
// =============================================================================

/// One line per product: `- name (category, style): $price - description`.
#[must_use]
pub fn product_context(catalog: &[Product]) -> String {
    catalog
        .iter()
        .take(CHAT_CONTEXT_PRODUCTS)
        .map(|p| {
            format!(
                "- {} ({}, {}): {} - {}",
                p.name,
                p.category,
                p.style,
                p.unit_price(),
                p.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn chat_prompt(message: &str, product_context: &str) -> String {
    format!(
        "You are a friendly AI fashion assistant for the ZAR clothing store. You help shoppers with:\n\
         - Product recommendations for their preferences, budget and occasion\n\
         - Size and fit advice\n\
         - Styling tips\n\
         - Returns and shipping questions\n\
         - General fashion advice\n\
         \n\
         Products currently in the catalog:\n\
         {product_context}\n\
         \n\
         Keep answers short and helpful. When asked about specific products, use the catalog above.\n\
         \n\
         User: {message}"
    )
}

fn recommendation_prompt(query: &RecommendationQuery, catalog: &[Product]) -> String {
    let preferences = if query.preferences.is_empty() {
        "None specified".to_string()
    } else {
        query.preferences.join(", ")
    };
    let budget = query
        .budget
        .map_or_else(|| "No limit".to_string(), |b| format!("${b}"));
    let occasion = query.occasion.as_deref().unwrap_or("General");
    let style = query.style.map_or("Any", Style::as_str);

    let mut products = String::new();
    for p in catalog.iter().take(RECOMMENDATION_PROMPT_PRODUCTS) {
        let _ = writeln!(
            products,
            "- {} (ID: {}, {}, {}): {} - {}",
            p.name,
            p.id,
            p.category,
            p.style,
            p.unit_price(),
            p.description
        );
    }

    format!(
        "You are a fashion recommendation assistant. Recommend the products that best fit these criteria:\n\
         \n\
         Preferences: {preferences}\n\
         Budget: {budget}\n\
         Occasion: {occasion}\n\
         Style: {style}\n\
         \n\
         Available products:\n\
         {products}\n\
         Reply with ONLY a JSON array of at most {RECOMMENDATION_LIMIT} product IDs, for example: [1, 3, 5]\n\
         Favor relevance, quality and fit with the shopper's needs."
    )
}

fn style_advice_prompt(query: &StyleQuery, catalog: &[Product]) -> String {
    let preferences = if query.preferences.is_empty() {
        "None".to_string()
    } else {
        query.preferences.join(", ")
    };
    let occasion = query.occasion.as_deref().unwrap_or("General");

    let mut products = String::new();
    for p in catalog.iter().take(STYLE_PROMPT_PRODUCTS) {
        let _ = writeln!(
            products,
            "- {} (ID: {}, {}, {}): {}",
            p.name,
            p.id,
            p.category,
            p.style,
            p.unit_price()
        );
    }

    format!(
        "You are a professional fashion stylist. Give personalized style advice:\n\
         \n\
         Body Type: {body_type}\n\
         Preferences: {preferences}\n\
         Occasion: {occasion}\n\
         \n\
         Available products:\n\
         {products}\n\
         Provide:\n\
         1. 2-3 styling tips for this body type and occasion\n\
         2. {STYLE_ADVICE_LIMIT} products from the list that would work well\n\
         \n\
         Format your response as JSON:\n\
         {{\n  \"tips\": [\"tip1\", \"tip2\", \"tip3\"],\n  \"recommendedProductIds\": [1, 2, 3]\n}}",
        body_type = query.body_type(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use zar_core::ProductId;

    use super::*;
    use crate::gemini::GeminiError;

    /// Completion stub that records prompts and replays a canned answer.
    struct FakeCompletion {
        reply: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl FakeCompletion {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> CompletionRequest {
            self.requests
                .lock()
                .expect("lock")
                .last()
                .cloned()
                .expect("no request")
        }
    }

    impl TextCompletion for FakeCompletion {
        async fn complete(&self, request: CompletionRequest) -> Result<String, GeminiError> {
            self.requests.lock().expect("lock").push(request);
            self.reply.clone().ok_or(GeminiError::EmptyResponse)
        }
    }

    fn product(id: i32, style: Style, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            category: "Tops".to_string(),
            style,
            price: Decimal::new(price, 0),
            description: format!("Description {id}"),
            image: String::new(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, Style::Casual, 20),
            product(2, Style::Edgy, 80),
            product(3, Style::Casual, 45),
            product(4, Style::Professional, 120),
            product(5, Style::Feminine, 60),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[tokio::test]
    async fn test_recommendations_follow_model_ranking() {
        let catalog = catalog();
        let ai = FakeCompletion::replying("Great picks: [4, 99, 2] for you");

        let result = recommend_products(Some(&ai), &RecommendationQuery::default(), &catalog)
            .await
            .expect("recommendations");
        assert_eq!(ids(&result), vec![4, 2]);

        let prompt = ai.last_request().prompt;
        assert!(prompt.contains("(ID: 3, Tops, Casual): $45.00"));
        assert!(prompt.contains("Budget: No limit"));
    }

    #[tokio::test]
    async fn test_recommendations_unparseable_reply_is_none() {
        let catalog = catalog();
        let ai = FakeCompletion::replying("I would suggest the denim jacket.");
        assert!(
            recommend_products(Some(&ai), &RecommendationQuery::default(), &catalog)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_recommendations_disabled_failed_or_empty_catalog_is_none() {
        let catalog = catalog();
        let query = RecommendationQuery::default();

        assert!(
            recommend_products::<FakeCompletion>(None, &query, &catalog)
                .await
                .is_none()
        );

        let failing = FakeCompletion::failing();
        assert!(recommend_products(Some(&failing), &query, &catalog).await.is_none());

        let ai = FakeCompletion::replying("[1]");
        assert!(recommend_products(Some(&ai), &query, &[]).await.is_none());
        assert!(ai.requests.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn test_style_advice_resolves_three_products() {
        let catalog = catalog();
        let ai = FakeCompletion::replying(
            r#"Here you go:
            {"tips": ["High waists", "Monochrome layers"], "recommendedProductIds": [5, 1, 3, 2]}"#,
        );
        let query = StyleQuery {
            body_type: None,
            preferences: vec!["Feminine".to_string()],
            occasion: Some("Brunch".to_string()),
        };

        let advice = style_advice(Some(&ai), &query, &catalog)
            .await
            .expect("advice");
        assert_eq!(advice.body_type, "regular");
        assert_eq!(advice.tips.len(), 2);
        assert_eq!(ids(&advice.recommendations), vec![5, 1, 3]);

        let prompt = ai.last_request().prompt;
        assert!(prompt.contains("Occasion: Brunch"));
        assert!(prompt.contains("\"recommendedProductIds\""));
    }

    #[tokio::test]
    async fn test_style_advice_malformed_reply_is_none() {
        let catalog = catalog();
        let ai = FakeCompletion::replying(r#"{"tips": ["unterminated"#);
        assert!(
            style_advice(Some(&ai), &StyleQuery::default(), &catalog)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_chat_sends_truncated_history_and_context() {
        let catalog = catalog();
        let ai = FakeCompletion::replying("Try the Item 3 tee!");
        let history: Vec<ChatTurn> = (0..7)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::user(format!("q{i}"))
                } else {
                    ChatTurn::assistant(format!("a{i}"))
                }
            })
            .collect();

        let reply = chat(Some(&ai), "Something casual?", &history, &catalog).await;
        assert_eq!(reply.as_deref(), Some("Try the Item 3 tee!"));

        let request = ai.last_request();
        assert!(request.history.len() <= 5);
        assert_eq!(request.history.first().map(|t| t.text.as_str()), Some("q2"));
        assert!(request.prompt.ends_with("User: Something casual?"));
        assert!(request.prompt.contains("- Item 2 (Tops, Edgy): $80.00 - Description 2"));
        assert_eq!(request.generation, Some(GenerationConfig::conversational()));
    }

    #[tokio::test]
    async fn test_chat_failure_is_none() {
        let ai = FakeCompletion::failing();
        assert!(chat(Some(&ai), "hi", &[], &catalog()).await.is_none());
        assert!(chat::<FakeCompletion>(None, "hi", &[], &catalog()).await.is_none());
    }

    #[test]
    fn test_fallback_recommendations_respect_style_and_budget() {
        let catalog = catalog();
        let query = RecommendationQuery {
            style: Some(Style::Casual),
            budget: Some(Decimal::new(30, 0)),
            ..RecommendationQuery::default()
        };
        assert_eq!(ids(&fallback_recommendations(&query, &catalog)), vec![1]);

        let query = RecommendationQuery::default();
        assert_eq!(fallback_recommendations(&query, &catalog).len(), 5);
    }

    #[test]
    fn test_fallback_style_advice_uses_style_preferences() {
        let catalog = catalog();
        let query = StyleQuery {
            body_type: Some("petite".to_string()),
            preferences: vec!["casual".to_string(), "comfort".to_string()],
            occasion: None,
        };

        let advice = fallback_style_advice(&query, &catalog);
        assert_eq!(advice.body_type, "petite");
        assert!(advice.tips.is_empty());
        assert_eq!(ids(&advice.recommendations), vec![1, 3]);

        let advice = fallback_style_advice(&StyleQuery::default(), &catalog);
        assert_eq!(ids(&advice.recommendations), vec![1, 2, 3]);
    }
}
