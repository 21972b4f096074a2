mod api;
mod config;
mod error;
mod format;
mod forms;
mod http;
mod logging;
mod models;
mod session;
mod storage;
mod store;
mod summary;
#[cfg(test)]
mod test_utils;
mod views;

use tracing::level_filters::LevelFilter;

fn main() {
    let configured = config::log_level();
    let level = configured.as_ref().copied().unwrap_or(LevelFilter::INFO);
    logging::init(level);
    if let Err(error) = configured {
        tracing::warn!(%error, %level, "invalid log level, using the default");
    }
    tracing::info!(%level, "starting FCS Finance");

    yew::Renderer::<views::App>::new().render();
}
