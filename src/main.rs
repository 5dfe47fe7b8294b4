use log::debug;
use tracing_subscriber::EnvFilter;
use vultr_cli::display::print_error;

#[tokio::main]
async fn main() {
    // RUST_LOG=vultr_api=debug shows each request; warnings only by default
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    debug!("vultr {} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = vultr_cli::run().await {
        print_error(&format!("Error: {}", e));
        std::process::exit(1);
    }
}
