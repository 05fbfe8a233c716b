use anyhow::{Context, Result};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use mazecast::app::App;
use mazecast::config::MazeConfig;
use mazecast::constants::LOOP_TIME;
use mazecast::formatter::SessionFormatter;

/// The main entry point of the demo.
///
/// Sets up logging, loads the configuration, then walks a generated maze until it is cleared
/// or the frame limit runs out.
pub fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stdout()))
                .event_format(SessionFormatter),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default())
        .try_init()
        .context("Could not install tracing subscriber")?;

    let config = MazeConfig::load().context("Could not load configuration")?;
    let mut app = App::new(config).context("Could not create app")?;

    info!(loop_time = ?LOOP_TIME, "Starting maze loop");
    while app.run() {}

    Ok(())
}
