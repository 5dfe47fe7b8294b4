use crate::{
    config::Config,
    display::{
        display_bandwidth_table, display_iso_status, display_os_table, display_server_details,
        display_servers_table, print_info, print_success, print_warning, prompt_confirm,
    },
    CliError, Result, ServerCommands,
};
use clap::Args;
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use vultr_api::{Vultr, VultrApiClient};
use vultr_core::ServerOptions;

/// Arguments for `server create`
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Label of the new server
    #[arg(short, long)]
    pub name: String,

    /// Region (DCID)
    #[arg(short, long)]
    pub region: i64,

    /// Plan (VPSPLANID)
    #[arg(short, long)]
    pub plan: i64,

    /// Operating system (OSID)
    #[arg(short, long)]
    pub os: i64,

    /// iPXE chain URL, for custom OS installs
    #[arg(long)]
    pub ipxe_chain_url: Option<String>,

    /// ISO to boot from (ISOID)
    #[arg(long)]
    pub iso: Option<i64>,

    /// Startup script (SCRIPTID)
    #[arg(long)]
    pub script: Option<i64>,

    /// Snapshot to restore (SNAPSHOTID)
    #[arg(long)]
    pub snapshot: Option<String>,

    /// SSH key(s) to install (SSHKEYID, comma separated)
    #[arg(long)]
    pub ssh_key: Option<String>,

    /// Cloud-init user data
    #[arg(long, conflicts_with = "user_data_file")]
    pub user_data: Option<String>,

    /// Read cloud-init user data from a file
    #[arg(long)]
    pub user_data_file: Option<PathBuf>,

    /// Assign an IPv6 subnet
    #[arg(long)]
    pub ipv6: bool,

    /// Attach to the private network
    #[arg(long)]
    pub private_networking: bool,

    /// Enable automatic backups
    #[arg(long)]
    pub auto_backups: bool,

    /// Don't send the activation email
    #[arg(long)]
    pub no_notify: bool,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

impl CreateArgs {
    /// Collect the optional create parameters
    pub fn options(&self) -> Result<ServerOptions> {
        let user_data = match (&self.user_data, &self.user_data_file) {
            (Some(data), _) => Some(data.clone()),
            (None, Some(path)) => {
                debug!("Reading user data from {}", path.display());
                Some(fs::read_to_string(path)?)
            }
            (None, None) => None,
        };

        Ok(ServerOptions {
            ipxe_chain_url: self.ipxe_chain_url.clone(),
            iso_id: self.iso,
            script_id: self.script,
            user_data,
            snapshot_id: self.snapshot.clone(),
            ssh_key_id: self.ssh_key.clone(),
            ipv6: self.ipv6,
            private_networking: self.private_networking,
            auto_backups: self.auto_backups,
            dont_notify_on_activate: self.no_notify,
        })
    }
}

/// Handles the `server` command
pub async fn handle(action: ServerCommands, config: &Config) -> Result<()> {
    let client = VultrApiClient::from_config(config)?;

    match action {
        ServerCommands::List { tag, running, json } => {
            handle_list(&client, tag.as_deref(), running, json).await
        }
        ServerCommands::Show { target, json } => handle_show(&client, &target, json).await,
        ServerCommands::Create(args) => handle_create(&client, args).await,
        ServerCommands::Rename { id, name } => {
            client.rename_server(&id, &name).await?;
            print_success(&format!("Server {} renamed to '{}'", id, name));
            Ok(())
        }
        ServerCommands::Start { id } => {
            client.start_server(&id).await?;
            print_success(&format!("Server {} started", id));
            Ok(())
        }
        ServerCommands::Halt { id } => {
            client.halt_server(&id).await?;
            print_success(&format!("Server {} halted", id));
            Ok(())
        }
        ServerCommands::Reboot { id } => {
            client.reboot_server(&id).await?;
            print_success(&format!("Server {} rebooting", id));
            Ok(())
        }
        ServerCommands::Reinstall { id, yes } => {
            let prompt = format!("Reinstall server {}? All data on it will be lost", id);
            if !confirmed(&prompt, yes)? {
                return Ok(());
            }
            client.reinstall_server(&id).await?;
            print_success(&format!("Server {} is being reinstalled", id));
            Ok(())
        }
        ServerCommands::Delete { id, yes } => {
            let prompt = format!("Destroy server {}? This cannot be undone", id);
            if !confirmed(&prompt, yes)? {
                return Ok(());
            }
            client.delete_server(&id).await?;
            print_success(&format!("Server {} destroyed", id));
            Ok(())
        }
        ServerCommands::OsChange { id, os_id } => {
            client.change_os(&id, os_id).await?;
            print_success(&format!("Server {} is switching to OSID {}", id, os_id));
            Ok(())
        }
        ServerCommands::OsList { id } => {
            let systems = client.list_os_for_server(&id).await?;
            display_os_table(&systems);
            Ok(())
        }
        ServerCommands::IsoAttach { id, iso_id } => {
            client.attach_iso(&id, iso_id).await?;
            print_success(&format!("ISO {} attached to server {}", iso_id, id));
            Ok(())
        }
        ServerCommands::IsoDetach { id } => {
            client.detach_iso(&id).await?;
            print_success(&format!("ISO detached from server {}", id));
            Ok(())
        }
        ServerCommands::IsoStatus { id } => {
            let status = client.iso_status(&id).await?;
            display_iso_status(&status);
            Ok(())
        }
        ServerCommands::Bandwidth { id, json } => {
            let records = client.server_bandwidth(&id).await?;
            if json {
                print_json(&records)
            } else {
                display_bandwidth_table(&records);
                Ok(())
            }
        }
    }
}

async fn handle_list(
    client: &VultrApiClient,
    tag: Option<&str>,
    running: bool,
    json: bool,
) -> Result<()> {
    let vultr = Vultr::from_client(client.clone());
    let servers = if running {
        vultr.running_servers().await?
    } else {
        vultr.list_servers(tag).await?
    };
    debug!("Listed {} server(s)", servers.len());

    if json {
        return print_json(&servers);
    }
    display_servers_table(&servers);
    Ok(())
}

async fn handle_show(client: &VultrApiClient, target: &str, json: bool) -> Result<()> {
    let vultr = Vultr::from_client(client.clone());
    let server = vultr.find_server(target).await?.ok_or_else(|| {
        CliError::NotFound(format!("No server with SUBID or label '{}'", target))
    })?;

    if json {
        return print_json(&server);
    }
    display_server_details(&server);
    Ok(())
}

async fn handle_create(client: &VultrApiClient, args: CreateArgs) -> Result<()> {
    if args.name.trim().is_empty() {
        return Err(CliError::InvalidInput("--name must not be empty".to_string()));
    }
    let options = args.options()?;

    let server = client
        .create_server(&args.name, args.region, args.plan, args.os, Some(&options))
        .await?;

    if args.json {
        return print_json(&server);
    }
    print_success(&format!("Created server '{}' with SUBID {}", server.name, server.id));
    print_info(&format!("Check progress with `vultr server show {}`", server.id));
    Ok(())
}

fn confirmed(prompt: &str, yes: bool) -> Result<bool> {
    if yes || prompt_confirm(prompt, false)? {
        return Ok(true);
    }
    print_warning("Cancelled");
    Ok(false)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use clap::Parser;
    use std::io::Write;

    fn create_args(args: &[&str]) -> CreateArgs {
        let mut argv = vec!["vultr", "server", "create"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            crate::Commands::Server {
                action: ServerCommands::Create(args),
            } => args,
            _ => panic!("expected server create"),
        }
    }

    #[test]
    fn test_create_options() {
        let args = create_args(&[
            "--name", "web", "--region", "1", "--plan", "29", "--os", "127", "--ssh-key",
            "541b4960f23bd", "--ipv6", "--no-notify",
        ]);
        let options = args.options().unwrap();

        assert_eq!(args.name, "web");
        assert_eq!((args.region, args.plan, args.os), (1, 29, 127));
        assert_eq!(options.ssh_key_id.as_deref(), Some("541b4960f23bd"));
        assert!(options.ipv6);
        assert!(options.dont_notify_on_activate);
        assert!(!options.auto_backups);
        assert!(options.user_data.is_none());
    }

    #[test]
    fn test_create_requires_ids() {
        let argv = ["vultr", "server", "create", "--name", "web", "--region", "1"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_user_data_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"#cloud-config\n").unwrap();
        let path = file.path().to_str().unwrap();

        let args = create_args(&[
            "--name", "web", "--region", "1", "--plan", "29", "--os", "127",
            "--user-data-file", path,
        ]);
        assert_eq!(
            args.options().unwrap().user_data.as_deref(),
            Some("#cloud-config\n")
        );

        let argv = [
            "vultr", "server", "create", "--name", "web", "--region", "1", "--plan", "29",
            "--os", "127", "--user-data", "x", "--user-data-file", path,
        ];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_missing_user_data_file() {
        let args = create_args(&[
            "--name", "web", "--region", "1", "--plan", "29", "--os", "127",
            "--user-data-file", "/nonexistent/user-data",
        ]);
        assert!(matches!(args.options(), Err(CliError::Io(_))));
    }
}
