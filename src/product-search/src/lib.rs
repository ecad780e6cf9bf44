#![allow(clippy::missing_errors_doc, clippy::uninlined_format_args)]
//! Product Search - type-ahead product lookup for order-entry forms.
//!
//! This crate turns a plain text input into an asynchronous product lookup
//! with debouncing, keyboard navigation and commit-to-form semantics. The
//! document is abstracted behind [`dom::Document`], so the component runs
//! headless: a host feeds it [`DomEvent`]s and drives its timers and
//! responses with [`ProductSearch::process_next`].
//!
//! # Features
//!
//! - Debounced queries with a minimum length gate
//! - Out-of-order responses discarded by sequence number
//! - HTML-escaped rendering with localized prices
//! - Clamped arrow-key navigation, Enter auto-select, Escape to close
//! - Selection written into a visible and a hidden field, then focus handed on
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use product_search::dom::{Document, ElementSpec, MemoryDocument};
//! use product_search::{DispatchPhase, DomEvent, HttpSearchClient, ProductSearch, SearchConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> product_search::Result<()> {
//!     let config = SearchConfig::default();
//!     let mut document = MemoryDocument::new();
//!     let form = document.insert(ElementSpec::default());
//!     let input = document.insert(ElementSpec::with_id("product-search-input").child_of(form));
//!     document.insert(ElementSpec::with_id("search-results").child_of(form));
//!     document.insert(ElementSpec::with_id("selected-product-id").child_of(form));
//!
//!     let client = HttpSearchClient::new("https://shop.example.com", &config)?;
//!     let mut search = ProductSearch::initialize(config, document, Arc::new(client));
//!
//!     search.document_mut().set_value(input, "wid");
//!     search.handle_event(DomEvent::Input);
//!     while search.phase() != DispatchPhase::Idle && search.process_next().await {}
//!
//!     for product in search.results() {
//!         println!("{}: {}", product.id, product.name);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod component;
mod config;
mod dispatcher;
pub mod dom;
mod error;
pub mod http;
mod models;
mod navigator;
pub mod render;
mod timer;

pub use client::{HttpSearchClient, ProductSource, SearchOutcome};
pub use component::{ComponentStatus, ERROR_DISMISS_DELAY, FOCUS_DELAY, ProductSearch};
pub use config::{
    DEFAULT_QUANTITY_INPUT_NAME, DEFAULT_RESULTS_CONTAINER_ID, DEFAULT_SEARCH_INPUT_ID,
    DEFAULT_SEARCH_URL, DEFAULT_SELECTED_PRODUCT_INPUT_ID, DisplayText, PriceFormat, SearchConfig,
    SearchConfigBuilder, SearchOptions,
};
pub use dispatcher::{DispatchPhase, InputDecision, QueryDispatcher, QueryTicket};
pub use dom::{DomEvent, EventDisposition, Key};
pub use error::{ProductSearchError, Result};
pub use models::{Product, ProductId, SelectedProduct};
pub use navigator::Navigator;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
