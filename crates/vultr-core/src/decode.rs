//! Decoding of server payloads.
//!
//! `Server` implements `Deserialize` through [`Server::from_fields`], so any
//! serde-driven decode of a structure containing servers (a map keyed by
//! SUBID, a response wrapper, ...) runs the same tolerant coercion.

use crate::errors::{DecodeError, Result};
use crate::models::{Server, V6Network};
use crate::wire::{number, text, Fields};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

impl Server {
    /// Build a server from an already parsed JSON object
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Server {
            id: text(fields, "SUBID"),
            name: text(fields, "label"),
            os: text(fields, "os"),
            ram: text(fields, "ram"),
            disk: text(fields, "disk"),
            main_ip: text(fields, "main_ip"),
            vcpus: number(fields, "vcpu_count")?,
            location: text(fields, "location"),
            region_id: number(fields, "DCID")?,
            default_password: text(fields, "default_password"),
            created: text(fields, "date_created"),
            pending_charges: number(fields, "pending_charges")?,
            status: text(fields, "status"),
            cost: text(fields, "cost_per_month"),
            current_bandwidth: number(fields, "current_bandwidth_gb")?,
            allowed_bandwidth: number(fields, "allowed_bandwidth_gb")?,
            netmask_v4: text(fields, "netmask_v4"),
            gateway_v4: text(fields, "gateway_v4"),
            power_status: text(fields, "power_status"),
            server_state: text(fields, "server_state"),
            plan_id: number(fields, "VPSPLANID")?,
            v6_networks: v6_networks(fields),
            internal_ip: text(fields, "internal_ip"),
            kvm_url: text(fields, "kvm_url"),
            auto_backups: text(fields, "auto_backups"),
            tag: text(fields, "tag"),
        })
    }

    /// Build a server from a JSON value, which must be an object
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            other => Err(DecodeError::MalformedPayload(format!(
                "expected a server object, found {}",
                json_kind(other)
            ))),
        }
    }
}

// Elements that are not objects are skipped; a missing or non-array
// field yields no networks.
fn v6_networks(fields: &Fields) -> Vec<V6Network> {
    match fields.get("v6_networks") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(|network| V6Network {
                network: text(network, "v6_network"),
                main_ip: text(network, "v6_main_ip"),
                network_size: text(network, "v6_network_size"),
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl<'de> Deserialize<'de> for Server {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Fields::deserialize(deserializer)?;
        Server::from_fields(&fields).map_err(serde::de::Error::custom)
    }
}

/// Decode one server from raw response bytes
pub fn decode_server(bytes: &[u8]) -> Result<Server> {
    let value: Value = serde_json::from_slice(bytes)?;
    Server::from_value(&value)
}

/// Decode a collection the API returns as an object keyed by id.
///
/// The API answers with `[]` instead of `{}` when there is nothing to list,
/// so an empty array is accepted as well. Entries come back ordered by key.
pub fn decode_keyed<T, F>(value: Value, decode: F) -> Result<Vec<T>>
where
    F: Fn(&Value) -> Result<T>,
{
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            entries.iter().map(|(_, entry)| decode(entry)).collect()
        }
        Value::Array(items) if items.is_empty() => Ok(Vec::new()),
        other => Err(DecodeError::MalformedPayload(format!(
            "expected an object keyed by id, found {}",
            json_kind(&other)
        ))),
    }
}

/// Decode any plain serde model, reporting failures as malformed payloads
pub fn decode_model<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value).map_err(DecodeError::from)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
