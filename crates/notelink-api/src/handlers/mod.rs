//! HTTP handlers for notelink-api.

pub mod health;
pub mod links;
