//! Product filter engine.
//!
//! Narrows a catalog snapshot by category, style and free-text search. All
//! active constraints are AND-combined and the input order is preserved.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Product, Style};

/// Filter criteria chosen by the shopper.
///
/// An absent or empty field places no constraint on the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub style: Option<Style>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
}

impl FilterSpec {
    /// Returns true when no field constrains the result.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category().is_none() && self.style.is_none() && self.search().is_none()
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether a single product satisfies every active constraint.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category()
            && product.category != category
        {
            return false;
        }

        if let Some(style) = self.style
            && product.style != style
        {
            return false;
        }

        if let Some(search) = self.search() {
            let needle = search.to_lowercase();
            return product.name.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle);
        }

        true
    }
}

/// Apply `spec` to `products`, keeping input order.
///
/// Returns an empty vector when nothing matches.
#[must_use]
pub fn filter<'a>(products: &'a [Product], spec: &FilterSpec) -> Vec<&'a Product> {
    products.iter().filter(|p| spec.matches(p)).collect()
}

/// Deserialize an optional value, treating an empty string as absent.
///
/// Query strings send `?style=` when a filter is cleared. Any other value is
/// kept verbatim, surrounding whitespace included.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::ProductId;

    fn product(id: i32, name: &str, category: &str, style: Style, description: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            style,
            price: Decimal::new(2500, 2),
            description: description.to_string(),
            image: format!("https://cdn.example.com/{id}.jpg"),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Linen Blazer", "Jackets", Style::Professional, "Breathable summer blazer"),
            product(2, "Leather Jacket", "Jackets", Style::Edgy, "Black biker jacket"),
            product(3, "Running Tee", "Tops", Style::Sporty, "Moisture-wicking LINEN blend"),
            product(4, "Wrap Dress", "Dresses", Style::Feminine, "Floral midi dress"),
            product(5, "Hoodie", "Tops", Style::Casual, "Soft fleece hoodie"),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_empty_spec_returns_input_unchanged() {
        let products = catalog();
        let result = filter(&products, &FilterSpec::default());
        assert_eq!(ids(&result), vec![1, 2, 3, 4, 5]);

        let blank = FilterSpec {
            category: Some(String::new()),
            style: None,
            search: Some(String::new()),
        };
        assert!(blank.is_empty());
        assert_eq!(filter(&products, &blank).len(), products.len());
    }

    #[test]
    fn test_category_filter_includes_every_member() {
        let products = catalog();
        for p in &products {
            let spec = FilterSpec {
                category: Some(p.category.clone()),
                ..FilterSpec::default()
            };
            assert!(filter(&products, &spec).iter().any(|r| r.id == p.id));
        }
    }

    #[test]
    fn test_filters_are_and_combined() {
        let products = catalog();
        let spec = FilterSpec {
            category: Some("Jackets".to_string()),
            style: Some(Style::Edgy),
            search: None,
        };
        assert_eq!(ids(&filter(&products, &spec)), vec![2]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let products = catalog();
        let spec = FilterSpec {
            search: Some("linen".to_string()),
            ..FilterSpec::default()
        };
        // name match on 1, description match on 3
        assert_eq!(ids(&filter(&products, &spec)), vec![1, 3]);
    }

    #[test]
    fn test_no_match_yields_empty() {
        let products = catalog();
        let spec = FilterSpec {
            category: Some("Dresses".to_string()),
            style: Some(Style::Sporty),
            search: None,
        };
        assert!(filter(&products, &spec).is_empty());
        assert!(filter(&[], &spec).is_empty());
    }

    #[test]
    fn test_deserialize_treats_empty_strings_as_absent() {
        let spec: FilterSpec =
            serde_json::from_str(r#"{"category":"","style":"","search":"dress"}"#)
                .expect("deserialize");
        assert_eq!(spec.category, None);
        assert_eq!(spec.style, None);
        assert_eq!(spec.search.as_deref(), Some("dress"));

        let spec: FilterSpec = serde_json::from_str(r#"{"style":"Casual"}"#).expect("deserialize");
        assert_eq!(spec.style, Some(Style::Casual));

        assert!(serde_json::from_str::<FilterSpec>(r#"{"style":"Boho"}"#).is_err());
    }

    #[test]
    fn test_deserialize_keeps_whitespace_in_values() {
        let products = vec![
            product(1, "Bored", "Tops", Style::Casual, "Cotton"),
            product(2, "Red Tee", "Tops ", Style::Casual, "Plain cotton"),
        ];

        let spec: FilterSpec = serde_json::from_str(r#"{"category":"Tops "}"#).expect("deserialize");
        assert_eq!(spec.category.as_deref(), Some("Tops "));
        assert_eq!(ids(&filter(&products, &spec)), vec![2]);

        let spec: FilterSpec = serde_json::from_str(r#"{"search":"red "}"#).expect("deserialize");
        assert_eq!(ids(&filter(&products, &spec)), vec![2]);

        let spec: FilterSpec = serde_json::from_str(r#"{"search":" "}"#).expect("deserialize");
        assert_eq!(spec.search.as_deref(), Some(" "));
        assert_eq!(ids(&filter(&products, &spec)), vec![2]);
    }
}
