use crate::client::VultrApiClient;
use crate::errors::Result;
use vultr_core::{BandwidthRecord, Server};
use vultr_utils::{parse_byte_count, ParseError};

/// Bytes transferred over a reporting period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandwidthTotals {
    pub incoming: u64,
    pub outgoing: u64,
}

impl BandwidthTotals {
    /// Sum a joined series. Days without an outgoing value count as zero.
    /// A sum that does not fit in a `u64` is an error.
    pub fn from_records(records: &[BandwidthRecord]) -> vultr_utils::Result<Self> {
        let mut totals = BandwidthTotals::default();
        for record in records {
            totals.incoming = add_bytes(totals.incoming, &record.incoming)?;
            if let Some(outgoing) = &record.outgoing {
                totals.outgoing = add_bytes(totals.outgoing, outgoing)?;
            }
        }
        Ok(totals)
    }

    /// Incoming plus outgoing, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.incoming.saturating_add(self.outgoing)
    }
}

fn add_bytes(sum: u64, raw: &str) -> vultr_utils::Result<u64> {
    let bytes = parse_byte_count(raw)?;
    sum.checked_add(bytes)
        .ok_or_else(|| ParseError::InvalidValue("byte total overflows".to_string()).into())
}

/// Main SDK struct for Vultr
pub struct Vultr {
    api_client: VultrApiClient,
}

impl Vultr {
    /// Create new Vultr instance with API key
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self::from_client(VultrApiClient::new(api_key, None)?))
    }

    /// Create from the `VULTR_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_client(VultrApiClient::from_env()?))
    }

    pub fn from_client(api_client: VultrApiClient) -> Self {
        Self { api_client }
    }

    /// Underlying client, for the operations not wrapped here
    pub fn client(&self) -> &VultrApiClient {
        &self.api_client
    }

    /// List servers, optionally only those carrying `tag`
    pub async fn list_servers(&self, tag: Option<&str>) -> Result<Vec<Server>> {
        match tag {
            Some(tag) => self.api_client.list_servers_by_tag(tag).await,
            None => self.api_client.list_servers().await,
        }
    }

    /// Servers that are active and powered on
    pub async fn running_servers(&self) -> Result<Vec<Server>> {
        let mut servers = self.list_servers(None).await?;
        servers.retain(Server::is_running);
        Ok(servers)
    }

    /// Get server by SUBID or label
    pub async fn find_server(&self, id_or_label: &str) -> Result<Option<Server>> {
        let servers = self.list_servers(None).await?;
        Ok(select_server(servers, id_or_label))
    }

    /// Daily bandwidth of a server
    pub async fn bandwidth(&self, id: &str) -> Result<Vec<BandwidthRecord>> {
        self.api_client.server_bandwidth(id).await
    }
}

// An exact SUBID match wins over a label match
fn select_server(servers: Vec<Server>, id_or_label: &str) -> Option<Server> {
    let (by_id, rest): (Vec<Server>, Vec<Server>) =
        servers.into_iter().partition(|s| s.id == id_or_label);

    by_id
        .into_iter()
        .next()
        .or_else(|| rest.into_iter().find(|s| s.name == id_or_label))
}
