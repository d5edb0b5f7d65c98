mod app;
mod app_state;
mod cli;
mod config;
mod errors;
mod event_handlers;
mod logging;
mod rendering;

use app::App;
use clap::Parser;
use cli::CliArgs;
use fltr_filters::FilterPanel;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();

    let log_dir = config::project_dirs()?.data_local_dir().join("logs");
    let _log_guard = logging::init(&args.log_level, &log_dir)?;

    let config = config::load(&args)?;
    tracing::info!(
        object = %config.filter.object_type,
        gateway = ?config.gateway,
        "starting"
    );
    let gateway = config.gateway.build()?;
    let panel = FilterPanel::new(gateway, config.filter);

    let terminal = ratatui::init();
    let result = App::new(panel).run(terminal).await;
    ratatui::restore();
    result
}
