use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use ripen_core::config::EffectiveConfig;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `ripen config`.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {}

pub fn run_config(_args: &ConfigArgs, effective: &EffectiveConfig, output: OutputMode) -> Result<()> {
    let table = toml::to_string_pretty(&effective.chart).context("serialize configuration")?;

    render_mode(
        output,
        effective,
        |effective, w| {
            if let Some(source) = &effective.source {
                writeln!(w, "# source: {}", source.display())?;
            }
            write!(w, "{table}")
        },
        |effective, w| render_config_pretty(effective, &table, w),
    )
}

fn render_config_pretty(
    effective: &EffectiveConfig,
    table: &str,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    pretty_section(w, "Configuration")?;
    let source = effective
        .source
        .as_ref()
        .map_or_else(|| "built-in defaults".to_string(), |path| path.display().to_string());
    pretty_kv(w, "source", source)?;
    writeln!(w)?;

    for line in table.lines().filter(|line| !line.trim().is_empty()) {
        match line.split_once(" = ") {
            Some((key, value)) => pretty_kv(w, key.trim(), value.trim())?,
            None => writeln!(w, "{line}")?,
        }
    }
    Ok(())
}
