//! Developer preview: build the template data for a settings file and print
//! it as JSON. This is what the host renderer receives each cycle.
//!
//! Usage: agenda-weather <settings.json> [device.json]

use std::env;
use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use agenda_weather::{AgendaWeatherPlugin, DeviceConfig, PluginSettings};

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let settings_path = args
        .next()
        .context("usage: agenda-weather <settings.json> [device.json]")?;

    let settings: PluginSettings = serde_json::from_str(
        &fs::read_to_string(&settings_path)
            .with_context(|| format!("failed to read {settings_path}"))?,
    )
    .with_context(|| format!("failed to parse {settings_path}"))?;

    let device = match args.next() {
        Some(device_path) => serde_json::from_str(
            &fs::read_to_string(&device_path)
                .with_context(|| format!("failed to read {device_path}"))?,
        )
        .with_context(|| format!("failed to parse {device_path}"))?,
        None => DeviceConfig::default(),
    };

    let params = AgendaWeatherPlugin::generate_template_params(&settings, &device)?;
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
