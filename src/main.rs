use clap::Parser;
use psycho_client::cli::commands::{Settings, build_controller, cmd_action, cmd_run};
use psycho_client::cli::config::{
    BASE_URL_ENV, Cli, Commands, load_config, resolve_base_url, resolve_credentials,
    resolve_trace_path,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());

    // Resolve settings: CLI > config > env > defaults
    let env_url = std::env::var(BASE_URL_ENV).ok();
    let settings = Settings {
        base_url: resolve_base_url(cli.base_url.as_deref(), &config, env_url.as_deref()),
        credentials: resolve_credentials(cli.user.as_deref(), cli.password.as_deref(), &config),
        trace_path: resolve_trace_path(cli.trace.as_deref(), &config),
    };
    tracing::debug!(base_url = %settings.base_url, "settings resolved");

    let ok = match &cli.command {
        Commands::Run {
            script,
            format,
            output,
        } => cmd_run(script, format, output.as_deref(), &settings)?,
        action => {
            let mut controller = build_controller(&settings);
            cmd_action(&mut controller, action, cli.save_page.as_deref())?
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` flags raise the level from `warn`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
