//! State API server for Worldtap.
//!
//! This crate provides an Axum HTTP server that exposes the live engine
//! state as ten read-only JSON documents:
//!
//! - **Player**: `/player`
//! - **Scene**: `/npcs`, `/objects`, `/grounditems`, `/projectiles`
//! - **Containers**: `/inventory`, `/equipment`, `/bank`
//! - **Progress**: `/stats`, `/tick`
//!
//! # Architecture
//!
//! Handlers never touch world state. Each request submits one projector
//! to the engine thread through the [`EngineBridge`], suspends until the
//! engine has run it, then serializes the document it produced. Requests
//! are independent: a failure in one never affects another.
//!
//! [`EngineBridge`]: worldtap_core::bridge::EngineBridge

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve, start_server};
pub use state::AppState;
