// ABOUTME: CLI entrypoint for the crosspost command
// ABOUTME: Fatal setup errors exit with codes; per-unit failures only log

use clap::Parser;
use crosspost::{
    backend::Backend,
    cli::Cli,
    config::Config,
    devto::{DevtoBackend, DevtoClient},
    hashnode::HashnodeBackend,
    sync::sync_all,
    Result,
};

fn main() {
    let log_environ = env_logger::Env::new()
        .filter("CROSSPOST_LOG")
        .write_style("CROSSPOST_LOG_STYLE");
    let mut log_builder = env_logger::Builder::new();
    log_builder.filter_level(log::LevelFilter::Info);
    log_builder.parse_env(log_environ);
    log_builder.init();

    if let Err(e) = run() {
        eprintln!("crosspost: [E{}] {}", e.exit_code(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env(cli.site_base);
    if let Some(base) = cli.devto_api_base {
        if let Some(devto) = config.devto.as_mut() {
            devto.api_base = base;
        }
    }
    if let Some(endpoint) = cli.hashnode_endpoint {
        if let Some(hashnode) = config.hashnode.as_mut() {
            hashnode.endpoint = endpoint;
        }
    }

    let devto = match &config.devto {
        Some(cfg) => {
            let mut client = DevtoClient::new(cfg)?;
            if cli.no_throttle {
                client = client.disable_throttle();
            }
            DevtoBackend::with_client(client)
        }
        None => DevtoBackend::from_config(None)?,
    };
    let hashnode = HashnodeBackend::from_config(config.hashnode.as_ref())?;

    let backends: Vec<Box<dyn Backend>> = vec![Box::new(devto), Box::new(hashnode)];

    // Partial failures are logged per unit, never escalated to the exit code.
    sync_all(&cli.files, &config, &backends);

    Ok(())
}
