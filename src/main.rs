mod app;
mod app_state;
mod config;
mod errors;
mod event_handlers;
mod filtering;
mod rendering;
mod services;
mod tables;

use std::fs::File;

use app::App;
use config::Settings;
use log::info;
use simplelog::{Config, WriteLogger};
use staffgrid_db::paths;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let settings = Settings::load()?;
    paths::rotate_logs();
    WriteLogger::init(
        settings.level_filter(),
        Config::default(),
        File::create(paths::log_file()?)?,
    )?;
    let settings = settings.validated();
    info!("starting {} {}", app::APP_NAME, env!("CARGO_PKG_VERSION"));

    let app = App::new(settings).await?;
    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}
