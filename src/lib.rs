//! Teamspace Core - Organization Membership Backend
//!
//! This crate provides the organization, membership, and invitation
//! lifecycle for the Teamspace platform: organizations with owners and
//! slugs, token-bearing invitations with expiry, and exactly-once
//! redemption into membership records.

pub mod api;
pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod queue;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
