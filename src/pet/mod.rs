//! # Pet Chat Module
//!
//! This module implements the virtual pet companion: a chat loop over the
//! backend's conversation endpoint, layered on local persistence for the
//! transcript and the pet's four care stats. The stats decay with wall-clock
//! time whether or not the program is running, so the pet you come back to
//! is hungrier than the one you left.
//!
//! ## Components
//!
//! - [`session`] - Interactive chat loop, commands, and the send pipeline
//! - [`status`] - Stat records, decay math, and level/condition bands
//! - [`cache`] - Persisted status with catch-up decay on load
//! - [`history`] - Persisted transcript and the context window sent upstream
//! - [`ticker`] - Background task applying decay at a fixed interval
//!
//! ## Status Lifecycle
//!
//! 1. [`cache::StatusCache::load`] reads the saved record and charges for the
//!    time since the saved stamp, in memory only
//! 2. [`ticker::start_ticker`] decays and persists on a fixed cadence while
//!    the session runs
//! 3. Chat replies carrying a full set of stat values replace the record via
//!    [`cache::StatusCache::reconcile`]
//! 4. Session exit persists once more so the next load charges from now
//!
//! ## Usage
//!
//! ```rust,no_run
//! use petshell::config::Config;
//! use petshell::pet;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     pet::session::run(&config).await
//! }
//! ```

pub mod cache;
pub mod history;
pub mod session;
pub mod status;
pub mod ticker;

pub use status::StatusRecord;
