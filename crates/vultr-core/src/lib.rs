//! # Vultr Core
//!
//! Core domain logic for the Vultr server client.
//!
//! This crate contains pure logic with no I/O dependencies:
//! - Domain models for servers, operating systems, ISO state and bandwidth
//! - Tolerant decoding of the API's inconsistently typed JSON
//! - Joining of the incoming/outgoing bandwidth series
//! - Input validation shared by every request
//!
//! Every function here is a pure function of its input, so it is safe to
//! call from any number of threads or tasks at once.

pub mod bandwidth;
pub mod decode;
pub mod errors;
pub mod models;
pub mod validation;
pub mod wire;

// Re-export commonly used types
pub use bandwidth::join_bandwidth;
pub use decode::{decode_keyed, decode_model, decode_server};
pub use errors::{DecodeError, Result, ValidationError};
pub use models::{
    BandwidthRecord, BandwidthReport, BandwidthSample, IsoStatus, Os, Server, ServerOptions,
    V6Network,
};
pub use wire::{WireValue, MISSING_PLACEHOLDER};
