//! Client library and CLI for the Vultr v1 API.
//!
//! The work is split across the workspace crates; this crate re-exports
//! the pieces most callers need.

pub use vultr_api::{
    ApiConfig, ApiError, BandwidthTotals, HttpError, Result, Vultr, VultrApiClient,
    DEFAULT_BASE_URL,
};
pub use vultr_core::{
    join_bandwidth, BandwidthRecord, BandwidthSample, DecodeError, IsoStatus, Os, Server,
    ServerOptions, V6Network, ValidationError,
};
pub use vultr_utils::{format_bytes, parse_byte_count};
