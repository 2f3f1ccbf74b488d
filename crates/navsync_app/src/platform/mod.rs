mod app;
mod config;
mod host;

pub(crate) use app::run;
pub(crate) use config::{load_config, DEFAULT_CONFIG_FILE};
