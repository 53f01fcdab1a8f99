//! Joins model-suggested product IDs against the catalog.

use std::collections::{HashMap, HashSet};

use crate::types::{Product, ProductId};

/// Result cap for product recommendations.
pub const RECOMMENDATION_LIMIT: usize = 6;

/// Result cap for products attached to styling advice.
pub const STYLE_ADVICE_LIMIT: usize = 3;

/// Map candidate IDs to catalog products.
///
/// Output follows the candidates' order, not the catalog's. Unknown and
/// repeated IDs are skipped; the result holds at most `limit` products.
#[must_use]
pub fn resolve<'a>(
    candidate_ids: &[ProductId],
    catalog: &'a [Product],
    limit: usize,
) -> Vec<&'a Product> {
    let by_id: HashMap<ProductId, &Product> = catalog.iter().map(|p| (p.id, p)).collect();
    let mut seen = HashSet::new();

    candidate_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| by_id.get(id).copied())
        .take(limit)
        .collect()
}
