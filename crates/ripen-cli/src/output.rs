//! Output formatting for `ripen` commands.
//!
//! A report is printed one of three ways: a pretty table for a terminal,
//! tab-separated rows for `cut`/`awk`, or the JSON chart spec for a
//! rendering layer. Failures carrying an [`ErrorCode`] are printed the same
//! way on stderr.
//!
//! Mode precedence: `--format`, then hidden `--json`, then the `FORMAT`
//! environment variable, then pretty on a TTY and text otherwise.

use clap::ValueEnum;
use ripen_core::ReportError;
use ripen_core::error::ErrorCode;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

pub const PRETTY_RULE_WIDTH: usize = 72;

/// Heading plus a dashed rule.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// One `key: value` line with the values aligned in a column.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<32} {}", format!("{key}:"), value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Aligned tables with section headings.
    Pretty,
    /// One tab-separated row per bucket or day.
    Text,
    /// The serialized report.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    fn from_env_value(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn pick_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    stdout_is_tty: bool,
) -> OutputMode {
    format_flag
        .or_else(|| json_flag.then_some(OutputMode::Json))
        .or_else(|| format_env.and_then(OutputMode::from_env_value))
        .unwrap_or(if stdout_is_tty {
            OutputMode::Pretty
        } else {
            OutputMode::Text
        })
}

pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let format_env = std::env::var("FORMAT").ok();
    pick_output_mode(
        format_flag,
        json_flag,
        format_env.as_deref(),
        io::stdout().is_terminal(),
    )
}

/// Write `value` to stdout as JSON, or through the text or pretty renderer.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// A failure as shown to the user: `error[E3001]: ...` or a JSON object.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub error_code: &'static str,
}

impl CliError {
    /// Attach `code` and its stock hint to `message`.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: code.hint().map(str::to_string),
            error_code: code.code(),
        }
    }
}

impl From<&ReportError> for CliError {
    fn from(err: &ReportError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

fn write_error(mode: OutputMode, error: &CliError, w: &mut dyn Write) -> io::Result<()> {
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut *w, &serde_json::json!({ "error": error }))?;
        return writeln!(w);
    }

    writeln!(w, "error[{}]: {}", error.error_code, error.message)?;
    if let Some(hint) = &error.hint {
        writeln!(w, "  hint: {hint}")?;
    }
    Ok(())
}

/// Print `error` to stderr in `mode`.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    write_error(mode, error, &mut stderr.lock())?;
    Ok(())
}
