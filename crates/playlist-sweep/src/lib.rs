//! playlist-sweep: scrape a lazily rendered playlist page with a headless browser.
//!
//! # Architecture
//!
//! - [`renderer`] - browser abstraction and the Chromium implementation
//! - [`stealth`] - fingerprint patches and human-like pacing
//! - [`extraction`] - structured query of the rendered list into raw items
//! - [`collect`] - item records and the deduplicating collected set
//! - [`scroll`] - the scroll / settle / extract loop
//! - [`export`] - JSON, CSV and XLSX writers
//! - [`pipeline`] - orchestration of a whole run
//! - [`config`] - environment-driven configuration
//! - [`cli`] - subcommands of the `playlist-sweep` binary

pub mod cli;
pub mod collect;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod pipeline;
pub mod renderer;
pub mod scroll;
pub mod stealth;

pub use collect::{CollectedSet, Item, RawItem, Toggle};
pub use config::ScrapeConfig;
pub use error::ScrapeError;
pub use pipeline::{Orchestrator, ScrapeSummary};
