//! Extraction of structured data from free-form model output.
//!
//! Text-generation responses often wrap the requested JSON in prose. These
//! helpers pull out the first candidate structure and parse it. Any failure
//! yields `None`, which callers treat as "use the rule-based fallback".

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Maximum number of styling tips kept from a response.
pub const MAX_TIPS: usize = 3;

/// Maximum number of product IDs kept from a response.
pub const MAX_ADVICE_IDS: usize = 6;

/// A bracketed, comma-separated run of integers, e.g. `[1, 3, 5]`.
static ID_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[\d,\s]+\]").expect("Invalid regex"));

/// Everything from the first `{` to the last `}`.
static OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("Invalid regex"));

/// Styling advice returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAdvice {
    /// Up to [`MAX_TIPS`] tips, in the model's order.
    pub tips: Vec<String>,
    /// Distinct candidate IDs in ranking order, at most [`MAX_ADVICE_IDS`].
    pub recommended_product_ids: Vec<ProductId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAdvice {
    #[serde(default)]
    tips: Option<Vec<String>>,
    #[serde(default)]
    recommended_product_ids: Option<Vec<serde_json::Number>>,
}

/// Numbers that fit a product id. Others cannot name a product and are dropped.
fn product_ids(numbers: Vec<serde_json::Number>) -> impl Iterator<Item = ProductId> {
    numbers
        .into_iter()
        .filter_map(|n| n.as_i64())
        .filter_map(|n| i32::try_from(n).ok())
        .map(ProductId::new)
}

/// Find the first `[n, n, ...]` list in `raw` and parse it.
///
/// Returns `None` when there is no such list or it is not valid JSON.
/// Numbers too large to be a product id are skipped.
#[must_use]
pub fn extract_id_list(raw: &str) -> Option<Vec<ProductId>> {
    let found = ID_LIST_RE.find(raw)?;
    let numbers: Vec<serde_json::Number> = serde_json::from_str(found.as_str()).ok()?;
    Some(product_ids(numbers).collect())
}

/// Find the first `{...}` object in `raw` and parse it as advice.
///
/// Missing `tips` or `recommendedProductIds` default to empty. Returns `None`
/// when there is no object or it fails to parse.
#[must_use]
pub fn extract_advice_object(raw: &str) -> Option<AiAdvice> {
    let found = OBJECT_RE.find(raw)?;
    let parsed: RawAdvice = serde_json::from_str(found.as_str()).ok()?;

    let mut tips = parsed.tips.unwrap_or_default();
    tips.truncate(MAX_TIPS);

    let mut seen = HashSet::new();
    let recommended_product_ids = product_ids(parsed.recommended_product_ids.unwrap_or_default())
        .filter(|id| seen.insert(*id))
        .take(MAX_ADVICE_IDS)
        .collect();

    Some(AiAdvice {
        tips,
        recommended_product_ids,
    })
}
