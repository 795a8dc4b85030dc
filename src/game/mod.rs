//! # Adventure Game Module
//!
//! Text-adventure front end for the RPG backend. Unlike the pet chat, all
//! game state lives server-side behind a cookie session; this module only
//! keeps working copies of what the server last said.
//!
//! ## Components
//!
//! - [`session`] - Login, character creation, world commands, and combat mode
//!
//! ```rust,no_run
//! use petshell::config::Config;
//! use petshell::game;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     game::session::run(&config).await
//! }
//! ```

pub mod session;
