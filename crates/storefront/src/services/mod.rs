//! Business logic services for storefront.
//!
//! # Services
//!
//! - `assistant` - AI chat, product recommendations and styling advice, with
//!   rule-based fallbacks when the model is unavailable

pub mod assistant;
