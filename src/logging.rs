//! `tracing` subscriber setup.
use crate::config::LabConfig;
use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SECLAB_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Where log lines may go when no log file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Line and script modes: stderr is free.
    Line,
    /// Full-screen mode owns the terminal.
    Fullscreen,
}

/// Filter precedence: environment, then config, then `warn`.
pub fn filter_directive(env: Option<String>, config: &LabConfig) -> String {
    env.filter(|value| !value.trim().is_empty())
        .or_else(|| config.log_filter.clone())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

pub fn init(config: &LabConfig, mode: Mode) -> Result<()> {
    let directive = filter_directive(std::env::var(LOG_ENV).ok(), config);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("parse log filter {directive:?}"))?;

    let (writer, ansi) = match (&config.log_file, mode) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        (None, Mode::Line) => (BoxMakeWriter::new(std::io::stderr), true),
        (None, Mode::Fullscreen) => return Ok(()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(ansi)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|err| anyhow!("install tracing subscriber: {err}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_beats_config_beats_default() {
        let mut config = LabConfig::default();
        assert_eq!(filter_directive(None, &config), "warn");

        config.log_filter = Some("seclab=debug".to_string());
        assert_eq!(filter_directive(None, &config), "seclab=debug");
        assert_eq!(
            filter_directive(Some("trace".to_string()), &config),
            "trace"
        );
        assert_eq!(
            filter_directive(Some(" ".to_string()), &config),
            "seclab=debug"
        );
    }
}
