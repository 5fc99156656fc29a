//! GitLab REST API integration
//!
//! [`client`] is the transport core (auth, status mapping, paging),
//! [`api`] the typed per-operation surface, and [`types`] the response
//! contracts they decode into.

pub mod api;
pub mod client;
pub mod types;

pub use client::GitLabClient;
pub use types::*;
