use std::fs::OpenOptions;

use color_eyre::{Result, eyre::WrapErr};
use env_logger::{Builder, Env, Target};

use crate::settings::Settings;

/// Routes `log` output to the settings' log file, truncating it on startup.
/// `RUST_LOG` overrides the configured filter.
pub fn init(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&settings.log_file)
        .wrap_err_with(|| format!("failed to open log file {}", settings.log_file.display()))?;

    Builder::from_env(Env::default().default_filter_or(settings.log_filter.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .wrap_err("logger already initialized")?;

    Ok(())
}
