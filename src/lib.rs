//! Prayer Tracker
//!
//! Record prayer requests for unbelievers and for brethren in hardship, mark
//! them answered, and delete them. The [`server`] module exposes the
//! ownership-scoped HTTP API over the [`db`] store; the [`client`] module
//! mirrors a user's list locally and applies writes optimistically.

pub mod client;
pub mod config;
pub mod db;
pub mod models;
pub mod server;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
