use crate::wire::{
    deserialize_flag, deserialize_integer, deserialize_text, missing_text, null_to_default,
    WireValue,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A virtual machine on a Vultr account.
///
/// Built by [`crate::decode`]; the API's field names are noted per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Server {
    pub id: String, // SUBID
    pub name: String, // label
    pub os: String,
    pub ram: String,
    pub disk: String,
    pub main_ip: String,
    pub vcpus: i64, // vcpu_count
    pub location: String,
    pub region_id: i64, // DCID
    pub default_password: String,
    pub created: String, // date_created
    pub pending_charges: f64,
    pub status: String,
    pub cost: String, // cost_per_month
    pub current_bandwidth: f64, // current_bandwidth_gb
    pub allowed_bandwidth: f64, // allowed_bandwidth_gb
    pub netmask_v4: String,
    pub gateway_v4: String,
    pub power_status: String,
    pub server_state: String,
    pub plan_id: i64, // VPSPLANID
    pub v6_networks: Vec<V6Network>,
    pub internal_ip: String,
    pub kvm_url: String,
    pub auto_backups: String,
    pub tag: String,
}

impl Server {
    /// Active subscription with the VM powered on
    pub fn is_running(&self) -> bool {
        self.status == "active" && self.power_status == "running"
    }

    /// Remaining bandwidth allowance in GB, never negative
    pub fn remaining_bandwidth(&self) -> f64 {
        (self.allowed_bandwidth - self.current_bandwidth).max(0.0)
    }
}

/// An IPv6 network assigned to a server
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct V6Network {
    pub network: String, // v6_network
    pub main_ip: String, // v6_main_ip
    pub network_size: String, // v6_network_size
}

/// ISO image state of a server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsoStatus {
    #[serde(default = "missing_text", deserialize_with = "deserialize_text")]
    pub state: String,
    #[serde(
        rename = "ISOID",
        default = "missing_text",
        deserialize_with = "deserialize_text"
    )]
    pub iso_id: String,
}

/// An operating system a server can be switched to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Os {
    #[serde(rename = "OSID", default, deserialize_with = "deserialize_integer")]
    pub id: i64,
    #[serde(default = "missing_text", deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(default = "missing_text", deserialize_with = "deserialize_text")]
    pub arch: String,
    #[serde(default = "missing_text", deserialize_with = "deserialize_text")]
    pub family: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub windows: bool,
    #[serde(default = "missing_text", deserialize_with = "deserialize_text")]
    pub surcharge: String,
}

/// Optional parameters for server creation.
///
/// Empty strings and zero ids are treated as unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerOptions {
    pub ipxe_chain_url: Option<String>,
    pub iso_id: Option<i64>,
    pub script_id: Option<i64>,
    /// Sent base64-encoded
    pub user_data: Option<String>,
    pub snapshot_id: Option<String>,
    pub ssh_key_id: Option<String>,
    pub ipv6: bool,
    pub private_networking: bool,
    pub auto_backups: bool,
    pub dont_notify_on_activate: bool,
}

/// One `[date, value]` pair of a bandwidth series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandwidthSample {
    pub date: String,
    pub bytes: String,
}

impl BandwidthSample {
    pub fn new(date: impl Into<String>, bytes: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            bytes: bytes.into(),
        }
    }
}

impl<'de> Deserialize<'de> for BandwidthSample {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pair = Vec::<Value>::deserialize(deserializer)?;
        match pair.as_slice() {
            [date, bytes, ..] => Ok(BandwidthSample {
                date: WireValue::from_value(date).render(),
                bytes: WireValue::from_value(bytes).render(),
            }),
            _ => Err(serde::de::Error::custom(format!(
                "bandwidth sample needs a date and a value, got {} element(s)",
                pair.len()
            ))),
        }
    }
}

/// Raw `server/bandwidth` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandwidthReport {
    #[serde(default, deserialize_with = "null_to_default")]
    pub incoming_bytes: Vec<BandwidthSample>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub outgoing_bytes: Vec<BandwidthSample>,
}

impl BandwidthReport {
    /// Merge both series into daily records
    pub fn into_records(self) -> Vec<BandwidthRecord> {
        crate::bandwidth::join_bandwidth(&self.incoming_bytes, &self.outgoing_bytes)
    }
}

/// Traffic of one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandwidthRecord {
    pub date: String,
    pub incoming: String,
    pub outgoing: Option<String>,
}
