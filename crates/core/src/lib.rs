//! Searchlight — client-side search overlay for statically generated blogs.
//!
//! This crate implements the overlay's lifecycle: lazy loading of its two
//! runtime dependencies, gated modal presentation, query dispatch to a hosted
//! search index, and rendering of results. Everything that touches the page
//! goes through the [`presenter::Surface`] trait and everything remote goes
//! through [`loader::ScriptFetcher`] and [`gateway::SearchConnector`], so the
//! state machine runs unchanged against a browser, a terminal, or test fakes.
//!
//! # Modules
//!
//! - [`controller`] — Open/close state machine and event loop
//! - [`loader`] — Exactly-once dependency fetching with a readiness countdown
//! - [`presenter`] — Idempotent spinner/modal/backdrop visibility and scroll-lock
//! - [`gateway`] — Wrapper over the hosted index client
//! - [`render`] — Pure mapping from result sets to render instructions
//! - [`markup`] — HTML for rendered result entries
//! - [`datefmt`] — Locale-aware short date formatting
//! - [`config`] — `searchlight.toml` loading and validation
//! - [`event`] — Event loop messages
//! - [`error`] — Error types
//! - [`types`] — Shared data types

pub mod config;
pub mod controller;
pub mod datefmt;
pub mod error;
pub mod event;
pub mod gateway;
pub mod loader;
pub mod markup;
pub mod presenter;
pub mod render;
pub mod types;

pub use config::{load_config, parse_config, OverlayConfig};
pub use controller::{Controller, Flow, SessionStats};
pub use event::OverlayEvent;
