//! Printer listing parsed from `lpstat -p`.

use serde::Serialize;
use utoipa::ToSchema;

/// Whether a printer accepts jobs right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrinterState {
    Enabled,
    Disabled,
}

/// One printer known to the spooler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInfo {
    pub name: String,
    pub status: PrinterState,
    /// Status text exactly as `lpstat` printed it.
    pub raw_status: String,
}

/// Parse `lpstat -p` output.
///
/// ```text
/// printer HP_LaserJet is idle.  enabled since Tue 01 Oct 2024 09:00:00
/// printer Brother_Printer disabled since Mon 30 Sep 2024 17:12:03 -
///         Paused
/// ```
///
/// Continuation lines and anything not starting with `printer` are skipped.
pub fn parse_lpstat(output: &str) -> Vec<PrinterInfo> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<PrinterInfo> {
    let rest = line.strip_prefix("printer")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let name_end = rest.find(char::is_whitespace)?;
    let (name, status) = rest.split_at(name_end);
    let raw_status = status.trim_start().to_string();

    let state = if raw_status.contains("idle") || raw_status.contains("printing") {
        PrinterState::Enabled
    } else {
        PrinterState::Disabled
    };

    Some(PrinterInfo {
        name: name.to_string(),
        status: state,
        raw_status,
    })
}
