use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::KeyResolver;
use crate::data::{Dataset, source};

mod app;
mod cli;
mod command;
mod config;
mod data;
mod screen;
mod session;
mod table;
mod theme;
mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting lazyrent");

    let args = cli::Args::parse();
    let config = config::load()?;

    let data_path = args
        .data
        .clone()
        .or_else(|| config.data_path.clone())
        .ok_or_else(|| eyre!("No dataset given: pass --data <PATH> or set data_path in the config file"))?;

    let mut table_options = config.table.clone();
    if let Some(size) = args.page_size {
        table_options = table_options.with_default_page_size(size);
    }

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);

    let (dataset, load_error) = match source::load(&data_path) {
        Ok(dataset) => (dataset, None),
        Err(err) => {
            error!(error = ?err, "failed to load dataset");
            (Dataset::default(), Some(format!("{err:#}")))
        }
    };

    let mut app = App::new(&config, table_options, dataset, data_path, theme, resolver);
    if let Some(collection) = args.screen {
        app.select_collection(collection);
    }
    if let Some(message) = load_error {
        app.show_error(message);
    }
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("lazyrent").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "lazyrent.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
