use crate::client::{Params, VultrApiClient};
use crate::errors::Result;
use log::{debug, info};
use vultr_core::validation::{require_positive, require_value};
use vultr_core::{
    decode_keyed, decode_model, BandwidthRecord, BandwidthReport, IsoStatus, Os, Server,
    ServerOptions,
};
use serde_json::Value;
use vultr_utils::{encode_user_data, yes_no};

/// Form fields for `server/create`.
///
/// The optional switches are only sent when `options` is given.
pub fn create_server_params(
    name: &str,
    region_id: i64,
    plan_id: i64,
    os_id: i64,
    options: Option<&ServerOptions>,
) -> Params {
    let mut params: Params = vec![
        ("label", name.to_string()),
        ("DCID", region_id.to_string()),
        ("VPSPLANID", plan_id.to_string()),
        ("OSID", os_id.to_string()),
    ];

    let Some(options) = options else {
        return params;
    };

    let text = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let id = |value: Option<i64>| value.filter(|v| *v != 0).map(|v| v.to_string());

    if let Some(url) = text(&options.ipxe_chain_url) {
        params.push(("ipxe_chain_url", url));
    }
    if let Some(iso) = id(options.iso_id) {
        params.push(("ISOID", iso));
    }
    if let Some(script) = id(options.script_id) {
        params.push(("SCRIPTID", script));
    }
    if let Some(user_data) = text(&options.user_data) {
        params.push(("userdata", encode_user_data(&user_data)));
    }
    if let Some(snapshot) = text(&options.snapshot_id) {
        params.push(("SNAPSHOTID", snapshot));
    }
    if let Some(key) = text(&options.ssh_key_id) {
        params.push(("SSHKEYID", key));
    }

    params.push(("enable_ipv6", yes_no(options.ipv6).to_string()));
    params.push((
        "enable_private_network",
        yes_no(options.private_networking).to_string(),
    ));
    params.push(("auto_backups", yes_no(options.auto_backups).to_string()));
    params.push((
        "notify_activate",
        yes_no(!options.dont_notify_on_activate).to_string(),
    ));

    params
}

/// Server answered by `server/create`, completed with the request's label,
/// region and plan
fn created_server(value: &Value, name: &str, region_id: i64, plan_id: i64) -> Result<Server> {
    let mut server = Server::from_value(value)?;
    server.name = name.to_string();
    server.region_id = region_id;
    server.plan_id = plan_id;
    Ok(server)
}

fn subid(id: &str) -> Result<Params> {
    require_value("SUBID", id)?;
    Ok(vec![("SUBID", id.to_string())])
}

impl VultrApiClient {
    /// List every server on the account, ordered by SUBID
    pub async fn list_servers(&self) -> Result<Vec<Server>> {
        debug!("Fetching servers");
        let value = self.get_value("server/list", &[]).await?;
        let servers = decode_keyed(value, Server::from_value)?;

        info!("Successfully fetched {} servers", servers.len());
        Ok(servers)
    }

    /// List the servers carrying `tag`
    pub async fn list_servers_by_tag(&self, tag: &str) -> Result<Vec<Server>> {
        require_value("tag", tag)?;
        debug!("Fetching servers tagged '{}'", tag);

        let value = self
            .get_value("server/list", &[("tag", tag.to_string())])
            .await?;
        let servers = decode_keyed(value, Server::from_value)?;

        info!("Successfully fetched {} servers tagged '{}'", servers.len(), tag);
        Ok(servers)
    }

    /// Get one server by SUBID
    pub async fn get_server(&self, id: &str) -> Result<Server> {
        let params = subid(id)?;
        debug!("Fetching server {}", id);

        let value = self.get_value("server/list", &params).await?;
        Ok(Server::from_value(&value)?)
    }

    /// Create a server.
    ///
    /// The API only answers with the new SUBID, so the returned server holds
    /// the placeholder for every other text field; name, region and plan are
    /// filled in from the request.
    pub async fn create_server(
        &self,
        name: &str,
        region_id: i64,
        plan_id: i64,
        os_id: i64,
        options: Option<&ServerOptions>,
    ) -> Result<Server> {
        require_positive("DCID", region_id)?;
        require_positive("VPSPLANID", plan_id)?;
        require_positive("OSID", os_id)?;

        debug!("Creating server");
        debug!("  label: {}", name);
        debug!("  DCID: {}, VPSPLANID: {}, OSID: {}", region_id, plan_id, os_id);

        let params = create_server_params(name, region_id, plan_id, os_id, options);
        let value = self.post_value("server/create", &params).await?;
        let server = created_server(&value, name, region_id, plan_id)?;

        info!("Successfully created server {}", server.id);
        Ok(server)
    }

    /// Set a server's label
    pub async fn rename_server(&self, id: &str, name: &str) -> Result<()> {
        let mut params = subid(id)?;
        params.push(("label", name.to_string()));

        self.post("server/label_set", &params).await?;
        info!("Renamed server {} to '{}'", id, name);
        Ok(())
    }

    pub async fn start_server(&self, id: &str) -> Result<()> {
        self.server_action("server/start", id).await
    }

    pub async fn halt_server(&self, id: &str) -> Result<()> {
        self.server_action("server/halt", id).await
    }

    pub async fn reboot_server(&self, id: &str) -> Result<()> {
        self.server_action("server/reboot", id).await
    }

    /// Reinstall the current operating system, wiping the disk
    pub async fn reinstall_server(&self, id: &str) -> Result<()> {
        self.server_action("server/reinstall", id).await
    }

    /// Destroy a server. Irreversible.
    pub async fn delete_server(&self, id: &str) -> Result<()> {
        self.server_action("server/destroy", id).await
    }

    /// Switch a server to another operating system
    pub async fn change_os(&self, id: &str, os_id: i64) -> Result<()> {
        let mut params = subid(id)?;
        require_positive("OSID", os_id)?;
        params.push(("OSID", os_id.to_string()));

        self.post("server/os_change", &params).await?;
        info!("Changed OS of server {} to {}", id, os_id);
        Ok(())
    }

    /// Operating systems server `id` can be switched to
    pub async fn list_os_for_server(&self, id: &str) -> Result<Vec<Os>> {
        let params = subid(id)?;
        debug!("Fetching OS change list for server {}", id);

        let value = self.get_value("server/os_change_list", &params).await?;
        let systems = decode_keyed(value, decode_model::<Os>)?;

        info!("Successfully fetched {} operating systems", systems.len());
        Ok(systems)
    }

    pub async fn attach_iso(&self, id: &str, iso_id: i64) -> Result<()> {
        let mut params = subid(id)?;
        require_positive("ISOID", iso_id)?;
        params.push(("ISOID", iso_id.to_string()));

        self.post("server/iso_attach", &params).await?;
        info!("Attached ISO {} to server {}", iso_id, id);
        Ok(())
    }

    pub async fn detach_iso(&self, id: &str) -> Result<()> {
        self.server_action("server/iso_detach", id).await
    }

    pub async fn iso_status(&self, id: &str) -> Result<IsoStatus> {
        let params = subid(id)?;
        let value = self.get_value("server/iso_status", &params).await?;
        Ok(decode_model(&value)?)
    }

    /// Daily traffic of a server, joined from the incoming and outgoing
    /// series of the report
    pub async fn server_bandwidth(&self, id: &str) -> Result<Vec<BandwidthRecord>> {
        let params = subid(id)?;
        debug!("Fetching bandwidth for server {}", id);

        let value = self.get_value("server/bandwidth", &params).await?;
        let report: BandwidthReport = decode_model(&value)?;
        let records = report.into_records();

        info!("Successfully fetched {} bandwidth records", records.len());
        Ok(records)
    }

    async fn server_action(&self, endpoint: &str, id: &str) -> Result<()> {
        let params = subid(id)?;
        debug!("POST {} for server {}", endpoint, id);

        self.post(endpoint, &params).await?;
        info!("{} succeeded for server {}", endpoint, id);
        Ok(())
    }
}
