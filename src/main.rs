mod cli;
mod config;
mod driver;
mod lab;
mod logging;
mod scenarios;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Command, ConfigArgs, ListArgs, RootArgs, RunArgs, ScriptArgs};
use config::LabConfig;
use lab::Console;
use scenarios::Catalog;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    let config = config::resolve_config(args.config.as_deref())?;

    match args.command {
        Command::List(list) => cmd_list(&config, &args.lab_dirs, &list),
        Command::Run(run) => cmd_run(&config, &args.lab_dirs, &run),
        Command::Script(script) => cmd_script(&config, &args.lab_dirs, &script),
        Command::Config(config_args) => cmd_config(&config, &config_args),
    }
}

/// Built-in labs plus labs from config dirs, then `--labs` dirs.
fn load_catalog(config: &LabConfig, extra_dirs: &[PathBuf]) -> Result<Catalog> {
    let mut catalog = Catalog::builtin();
    for dir in config.lab_dirs.iter().chain(extra_dirs) {
        catalog.load_dir(dir)?;
    }
    Ok(catalog)
}

fn cmd_list(config: &LabConfig, extra_dirs: &[PathBuf], args: &ListArgs) -> Result<()> {
    logging::init(config, logging::Mode::Line)?;
    let catalog = load_catalog(config, extra_dirs)?;
    let summaries = catalog.summaries();
    let mut out = io::stdout().lock();
    if args.json {
        let text = serde_json::to_string_pretty(&summaries).context("serialize lab list")?;
        writeln!(out, "{text}").context("write lab list")?;
        return Ok(());
    }
    for summary in summaries {
        writeln!(
            out,
            "{:<24} {} ({} files, {} tasks)",
            summary.id, summary.title, summary.files, summary.tasks
        )
        .context("write lab list")?;
    }
    Ok(())
}

fn cmd_run(config: &LabConfig, extra_dirs: &[PathBuf], args: &RunArgs) -> Result<()> {
    let interactive = tui::is_interactive();
    let mode = if interactive {
        logging::Mode::Fullscreen
    } else {
        logging::Mode::Line
    };
    logging::init(config, mode)?;
    let catalog = load_catalog(config, extra_dirs)?;
    let scenario = driver::select_scenario(&catalog, &args.lab, config)?;
    let console = Console::new(scenario);
    if interactive {
        return tui::run(console);
    }
    let stdin = io::stdin().lock();
    let mut out = io::stdout().lock();
    driver::run_lines(console, stdin, &mut out)
}

fn cmd_script(config: &LabConfig, extra_dirs: &[PathBuf], args: &ScriptArgs) -> Result<()> {
    logging::init(config, logging::Mode::Line)?;
    let catalog = load_catalog(config, extra_dirs)?;
    let scenario = driver::select_scenario(&catalog, &args.lab, config)?;
    let console = Console::new(scenario);
    let driver = match args.input.as_deref() {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("open script {}", path.display()))?;
            driver::run_script(console, BufReader::new(file))?
        }
        None => driver::run_script(console, io::stdin().lock())?,
    };
    let mut out = io::stdout().lock();
    if args.json {
        driver::write_report(driver.console(), &mut out)
    } else {
        driver::write_transcript(driver.console(), &mut out)
    }
}

fn cmd_config(config: &LabConfig, args: &ConfigArgs) -> Result<()> {
    let text = if args.stub {
        config::config_stub()?
    } else {
        serde_json::to_string_pretty(config).context("serialize config")?
    };
    writeln!(io::stdout().lock(), "{text}").context("write config")?;
    Ok(())
}
