//! ZAR Core - catalog, cart and AI-response logic.
//!
//! This crate provides the pieces of the storefront that carry actual logic:
//! - [`filter`] - narrows a product list by category, style and search text
//! - [`cart`] - session-scoped cart store with change subscribers
//! - [`advice`] - tolerant extraction of structured data from model output
//! - [`recommend`] - joins model-suggested IDs against the catalog
//! - [`chat`] - conversation turns and history truncation
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The `storefront` binary wires these into request handlers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod advice;
pub mod cart;
pub mod chat;
pub mod filter;
pub mod recommend;
pub mod types;

pub use advice::{AiAdvice, extract_advice_object, extract_id_list};
pub use cart::{CartEvent, CartLineItem, CartStore, LineKey};
pub use chat::{ChatRole, ChatTurn, MAX_HISTORY_TURNS, recent_history};
pub use filter::{FilterSpec, filter};
pub use recommend::{RECOMMENDATION_LIMIT, STYLE_ADVICE_LIMIT, resolve};
pub use types::*;
