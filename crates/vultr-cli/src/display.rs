use crate::Result;
use colored::{ColoredString, Colorize};
use dialoguer::{theme::ColorfulTheme, Confirm};
use vultr_api::BandwidthTotals;
use vultr_core::{BandwidthRecord, IsoStatus, Os, Server, MISSING_PLACEHOLDER};
use vultr_utils::{
    format_age, format_bandwidth_usage, format_bytes, parse_bandwidth_date, parse_byte_count,
    parse_created_at,
};

type CellStyle = fn(&str) -> ColoredString;

/// Table formatting utilities
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_widths: Vec<usize>,
    styles: Vec<Option<CellStyle>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let max_widths = headers.iter().map(|h| h.chars().count()).collect();
        let styles = vec![None; headers.len()];
        Self {
            headers,
            rows: Vec::new(),
            max_widths,
            styles,
        }
    }

    /// Colour a column's cells by value
    pub fn style_column(mut self, column: usize, style: CellStyle) -> Self {
        if column < self.styles.len() {
            self.styles[column] = Some(style);
        }
        self
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, cell) in row.iter().enumerate() {
            if i < self.max_widths.len() {
                self.max_widths[i] = self.max_widths[i].max(cell.chars().count());
            }
        }
        self.rows.push(row);
    }

    pub fn print(&self) {
        print!("{}", self.render(true));
    }

    /// Render the table, with or without colours
    pub fn render(&self, styled: bool) -> String {
        let mut out = String::new();
        out.push_str(&self.separator('┌', '┬', '┐'));
        out.push_str(&self.line(&self.headers, styled, true));
        out.push_str(&self.separator('├', '┼', '┤'));
        for row in &self.rows {
            out.push_str(&self.line(row, styled, false));
        }
        out.push_str(&self.separator('└', '┴', '┘'));
        out
    }

    fn separator(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self
            .max_widths
            .iter()
            .map(|&width| "─".repeat(width + 2))
            .collect();
        format!("{}{}{}\n", left, segments.join(&middle.to_string()), right)
    }

    fn line(&self, cells: &[String], styled: bool, header: bool) -> String {
        let mut out = String::from("│");
        for (i, &width) in self.max_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let padded = format!("{:<width$}", cell, width = width);
            let padded = match (styled, header, self.styles[i]) {
                (false, _, _) => padded,
                (true, true, _) => padded.bold().to_string(),
                (true, false, Some(style)) => {
                    // style by the cell's value, pad with plain spaces
                    let fill = " ".repeat(padded.len() - cell.len());
                    format!("{}{}", style(cell), fill)
                }
                (true, false, None) => padded,
            };
            out.push(' ');
            out.push_str(&padded);
            out.push_str(" │");
        }
        out.push('\n');
        out
    }
}

/// Green for healthy states, red for stopped ones, yellow for the rest
pub fn colorize_state(state: &str) -> ColoredString {
    match state {
        "active" | "running" | "ok" | "ready" => state.green(),
        "stopped" | "suspended" | "closed" => state.red(),
        "" | MISSING_PLACEHOLDER => state.dimmed(),
        _ => state.yellow(),
    }
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value == MISSING_PLACEHOLDER
}

fn or_dash(value: &str) -> String {
    if is_missing(value) {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn dollars(amount: &str) -> String {
    if is_missing(amount) {
        "-".to_string()
    } else {
        format!("${}", amount)
    }
}

fn server_title(server: &Server) -> String {
    if is_missing(&server.name) {
        server.id.clone()
    } else {
        format!("{} ({})", server.name, server.id)
    }
}

/// Display servers in a formatted table
pub fn display_servers_table(servers: &[Server]) {
    if servers.is_empty() {
        println!("{}", "No servers found.".yellow());
        return;
    }

    servers_table(servers).print();
    println!("{} server(s)", servers.len());
}

fn servers_table(servers: &[Server]) -> Table {
    let mut table = Table::new([
        "SUBID", "LABEL", "STATUS", "POWER", "MAIN IP", "LOCATION", "VCPUS", "RAM", "COST",
    ])
    .style_column(2, colorize_state)
    .style_column(3, colorize_state);

    for server in servers {
        table.add_row(vec![
            server.id.clone(),
            or_dash(&server.name),
            server.status.clone(),
            server.power_status.clone(),
            or_dash(&server.main_ip),
            or_dash(&server.location),
            server.vcpus.to_string(),
            or_dash(&server.ram),
            dollars(&server.cost),
        ]);
    }

    table
}

/// Display detailed server information
pub fn display_server_details(server: &Server) {
    println!("{}", format!("Server: {}", server_title(server)).bold().blue());

    let field = |name: &str, value: String| {
        let label = format!("{:<18}", format!("{}:", name));
        println!("  {} {}", label.bold(), value);
    };

    field("Status", colorize_state(&server.status).to_string());
    field("Power", colorize_state(&server.power_status).to_string());
    field("Server state", colorize_state(&server.server_state).to_string());
    field("OS", or_dash(&server.os));
    field(
        "Location",
        format!("{} (DCID {})", or_dash(&server.location), server.region_id),
    );
    field("Plan", server.plan_id.to_string());
    field("vCPUs", server.vcpus.to_string());
    field("RAM", or_dash(&server.ram));
    field("Disk", or_dash(&server.disk));
    field("Main IP", or_dash(&server.main_ip));
    field("Netmask", or_dash(&server.netmask_v4));
    field("Gateway", or_dash(&server.gateway_v4));
    field("Internal IP", or_dash(&server.internal_ip));
    for network in &server.v6_networks {
        field(
            "IPv6",
            format!("{} ({}/{})", network.main_ip, network.network, network.network_size),
        );
    }
    let mut bandwidth = format_bandwidth_usage(server.current_bandwidth, server.allowed_bandwidth);
    if server.allowed_bandwidth > 0.0 {
        bandwidth.push_str(&format!(", {:.2} GB left", server.remaining_bandwidth()));
    }
    field("Bandwidth", bandwidth);
    let cost = if is_missing(&server.cost) {
        "-".to_string()
    } else {
        format!("${}/month", server.cost)
    };
    field("Cost", cost);
    field("Pending charges", format!("${:.2}", server.pending_charges));
    field("Auto backups", or_dash(&server.auto_backups));
    field("Tag", or_dash(&server.tag));
    field("Created", created_with_age(&server.created));
    if !is_missing(&server.kvm_url) {
        field("Console", server.kvm_url.clone());
    }

    println!();
}

fn created_with_age(created: &str) -> String {
    match parse_created_at(created) {
        Ok(at) => {
            let age = chrono::Local::now().naive_local() - at;
            format!("{} ({} ago)", created, format_age(age.num_seconds()))
        }
        Err(_) => or_dash(created),
    }
}

/// Display daily bandwidth with a total line
pub fn display_bandwidth_table(records: &[BandwidthRecord]) {
    if records.is_empty() {
        println!("{}", "No bandwidth data.".yellow());
        return;
    }

    bandwidth_table(records).print();

    match BandwidthTotals::from_records(records) {
        Ok(totals) => println!(
            "Total: {} in, {} out, {} combined",
            format_bytes(totals.incoming),
            format_bytes(totals.outgoing),
            format_bytes(totals.total())
        ),
        Err(e) => print_warning(&format!("Could not total bandwidth: {}", e)),
    }
}

fn bandwidth_table(records: &[BandwidthRecord]) -> Table {
    let mut table = Table::new(["DATE", "INCOMING", "OUTGOING"]);
    for record in records {
        table.add_row(vec![
            date_with_weekday(&record.date),
            human_bytes(&record.incoming),
            record
                .outgoing
                .as_deref()
                .map(human_bytes)
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

fn date_with_weekday(date: &str) -> String {
    match parse_bandwidth_date(date) {
        Ok(day) => day.format("%Y-%m-%d %a").to_string(),
        Err(_) => date.to_string(),
    }
}

// Raw text is kept when the value is not a byte count
fn human_bytes(raw: &str) -> String {
    parse_byte_count(raw)
        .map(format_bytes)
        .unwrap_or_else(|_| raw.to_string())
}

/// Display operating systems in a formatted table
pub fn display_os_table(systems: &[Os]) {
    if systems.is_empty() {
        println!("{}", "No operating systems available.".yellow());
        return;
    }

    let mut table = Table::new(["OSID", "NAME", "ARCH", "FAMILY", "WINDOWS", "SURCHARGE"]);
    for os in systems {
        table.add_row(vec![
            os.id.to_string(),
            os.name.clone(),
            or_dash(&os.arch),
            or_dash(&os.family),
            vultr_utils::yes_no(os.windows).to_string(),
            or_dash(&os.surcharge),
        ]);
    }
    table.print();
}

/// Display the mounted ISO image
pub fn display_iso_status(status: &IsoStatus) {
    println!("  {} {}", "State:".bold(), colorize_state(&status.state));
    println!("  {} {}", "ISOID:".bold(), or_dash(&status.iso_id));
}

/// Ask a yes/no question
pub fn prompt_confirm(message: &str, default: bool) -> Result<bool> {
    let result = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(default)
        .interact()?;

    Ok(result)
}

/// Status messages
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Server {
        Server {
            id: "576965".to_string(),
            name: "my new server".to_string(),
            status: "active".to_string(),
            power_status: "running".to_string(),
            main_ip: "123.123.123.123".to_string(),
            location: "New Jersey".to_string(),
            vcpus: 1,
            ram: "768 MB".to_string(),
            cost: "5.00".to_string(),
            ..Server::default()
        }
    }

    #[test]
    fn test_table_render() {
        let mut table = Table::new(["ID", "NAME"]);
        table.add_row(vec!["1".to_string(), "web".to_string()]);
        table.add_row(vec!["200".to_string(), "db".to_string()]);

        let rendered = table.render(false);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "┌─────┬──────┐");
        assert_eq!(lines[1], "│ ID  │ NAME │");
        assert_eq!(lines[3], "│ 1   │ web  │");
        assert_eq!(lines[4], "│ 200 │ db   │");
        assert_eq!(lines[5], "└─────┴──────┘");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(["A", "B"]);
        table.add_row(vec!["x".to_string()]);
        assert!(table.render(false).contains("│ x │   │"));
    }

    #[test]
    fn test_servers_table() {
        let mut stopped = server();
        stopped.id = "576966".to_string();
        stopped.name = MISSING_PLACEHOLDER.to_string();
        stopped.power_status = "stopped".to_string();

        let rendered = servers_table(&[server(), stopped]).render(false);
        assert!(rendered.contains("576965"));
        assert!(rendered.contains("my new server"));
        assert!(rendered.contains("$5.00"));
        assert!(!rendered.contains(MISSING_PLACEHOLDER));
    }

    #[test]
    fn test_missing_label_and_cost() {
        let mut unnamed = server();
        unnamed.name = MISSING_PLACEHOLDER.to_string();
        unnamed.cost = MISSING_PLACEHOLDER.to_string();

        assert_eq!(server_title(&unnamed), "576965");
        assert_eq!(server_title(&server()), "my new server (576965)");
        assert_eq!(dollars(&unnamed.cost), "-");
        assert_eq!(dollars("5.00"), "$5.00");

        let rendered = servers_table(&[unnamed]).render(false);
        assert!(!rendered.contains('$'));
    }

    #[test]
    fn test_bandwidth_table() {
        let records = vec![
            BandwidthRecord {
                date: "2014-06-10".to_string(),
                incoming: "81072581".to_string(),
                outgoing: Some("1059417".to_string()),
            },
            BandwidthRecord {
                date: "2014-06-11".to_string(),
                incoming: MISSING_PLACEHOLDER.to_string(),
                outgoing: None,
            },
        ];

        let rendered = bandwidth_table(&records).render(false);
        assert!(rendered.contains("2014-06-10 Tue"));
        assert!(rendered.contains("81.07 MB"));
        assert!(rendered.contains("1.06 MB"));
        assert!(rendered.contains(MISSING_PLACEHOLDER));
    }

    #[test]
    fn test_created_with_age() {
        assert_eq!(created_with_age(MISSING_PLACEHOLDER), "-");
        assert!(created_with_age("2013-12-19 14:45:41").starts_with("2013-12-19 14:45:41 ("));
    }
}
