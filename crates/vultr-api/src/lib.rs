//! # Vultr API
//!
//! HTTP client for the Vultr v1 API.
//! This crate provides typed access to server lifecycle management:
//! listing, creation, power actions, reinstalls, OS and ISO changes,
//! deletion and bandwidth reporting.

pub mod client;
pub mod errors;
pub mod sdk;
pub mod servers;

// Re-export common types for convenience
pub use client::*;
pub use errors::*;
pub use sdk::*;
pub use servers::create_server_params;

// Re-export core types that API consumers will need
pub use vultr_core::{
    BandwidthRecord, DecodeError, IsoStatus, Os, Server, ServerOptions, V6Network,
    ValidationError,
};
