//! Remote session driver for the Aternos hosting panel.
//!
//! The panel has no public API, so every operation drives its web UI
//! through a real browser: one isolated session per call covering login,
//! server selection, action choreography, and teardown, with the page's
//! status indicators normalized into [`ServerStatus`].
//!
//! [`AternosClient`] is the entry point. Its operations never error;
//! failures surface on [`ServerInfo::error`] and partial results are
//! expected and valid.

mod actions;
pub mod browser;
pub mod config;
mod error;
pub mod info;
pub mod selectors;
pub mod session;
pub mod status;
pub mod testing;

mod client;

pub use client::AternosClient;
pub use config::{Config, Credentials, DEFAULT_HOSTNAME, SERVER_DOMAIN, Timeouts};
pub use error::{Error, Result};
pub use info::{Players, ServerInfo};
pub use selectors::SiteSelectors;
pub use session::{ActionFuture, SessionContext, SessionManager};
pub use status::{QueueStatus, ServerState, ServerStatus, parse_queue, read_status};
