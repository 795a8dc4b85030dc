//! # Petshell - Terminal Client for a Virtual Pet and Its Adventure World
//!
//! Petshell talks to a small REST backend that hosts two experiences: an
//! LLM-driven virtual pet you chat with, and a text adventure with
//! characters, combat, and shops. The crate renders both as plain terminal
//! sessions and keeps the pet's slowly decaying care stats in a local
//! embedded store so the pet ages even while the program is closed.
//!
//! ## Features
//!
//! - **Pet Chat**: Conversation with scene awareness, transcript replay, and
//!   backend tool commands surfaced as slash commands.
//! - **Care Stats**: Hunger, energy, happiness, and health decay per minute
//!   of wall-clock time, are persisted with a timestamp, and reconcile
//!   against authoritative values the backend returns.
//! - **Text Adventure**: Cookie-session login, character creation from
//!   server templates, exploration, turn-based combat, inventory, and shops.
//! - **Offline View**: `petshell status` renders the cached stats without
//!   touching the network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use petshell::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("petshell.toml").await?;
//!     petshell::pet::session::run(&config).await
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`api`] - HTTP client and the wire types for every consumed endpoint
//! - [`config`] - TOML configuration with full defaults
//! - [`store`] - Sled-backed client cache with JSON values
//! - [`pet`] - Pet chat session, status decay model, transcript history
//! - [`game`] - Adventure session and combat mode

pub mod api;
pub mod config;
pub mod game;
pub mod pet;
pub mod store;
