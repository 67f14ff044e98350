//! Human-readable console report. Clean files print nothing.

use std::fmt::Write as _;
use std::io::IsTerminal;

use colored::Colorize;

use crate::validate::finding::{FileReport, Finding};

/// Color only when stderr is a terminal and `NO_COLOR` is unset.
pub fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

pub fn render(reports: &[FileReport], use_color: bool) -> String {
    let mut out = String::new();
    for report in reports.iter().filter(|report| !report.is_clean()) {
        let header = report.path.display().to_string();
        if use_color {
            let _ = writeln!(out, "{}", header.as_str().red().bold().underline());
        } else {
            let _ = writeln!(out, "{header}");
        }
        for finding in &report.findings {
            render_finding(&mut out, finding);
        }
        out.push('\n');
    }
    out
}

fn render_finding(out: &mut String, finding: &Finding) {
    let _ = writeln!(out, "  {}", finding.message);
    if !finding.has_extra_fields() {
        return;
    }
    let _ = writeln!(out, "    kind: {}", finding.kind);
    if let Some(url) = &finding.reference_url {
        let _ = writeln!(out, "    reference: {url}");
    }
    if let Some(detail) = &finding.detail {
        let pretty = serde_json::to_string_pretty(detail).unwrap_or_else(|_| detail.to_string());
        let _ = writeln!(out, "    detail:");
        for line in pretty.lines() {
            let _ = writeln!(out, "      {line}");
        }
    }
}

/// Writes the report to stderr. Returns whether any file had findings.
pub fn print(reports: &[FileReport]) -> bool {
    let rendered = render(reports, use_color());
    eprint!("{rendered}");
    reports.iter().any(|report| !report.is_clean())
}
