//! Output formatting.
//!
//! The scan engine only produces data; everything user-facing lives here.
//! Plain output streams one tab-separated line per settled probe while the
//! scan runs, then a styled footer. JSON and CSV serialize the final
//! summary.

use crate::banner;
use crate::cli::OutputFormat;
use crate::probe::ProbeResult;
use crate::scan::ScanSummary;
use console::style;
use std::io::{self, Write};

/// One streamed result line: `port<TAB>state<TAB>service<TAB>banner`.
///
/// Only the first banner line is shown; the full text stays in the
/// summary.
pub fn event_line(result: &ProbeResult) -> String {
    let state = if result.open { "open" } else { "closed" };
    let service = result.service.as_deref().unwrap_or("-");
    let banner = result
        .banner
        .as_deref()
        .map(banner::first_line)
        .unwrap_or("");

    format!("{}\t{}\t{}\t{}", result.port, state, service, banner)
}

/// Render the final summary in the requested format.
///
/// Plain mode assumes per-port lines were already streamed and only prints
/// the footer.
pub fn print_results(summary: &ScanSummary, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_footer(summary),
        OutputFormat::Json => print_json(summary),
        OutputFormat::Csv => print_csv(summary),
    }
}

/// Styled footer after a plain-text scan.
fn print_footer(summary: &ScanSummary) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    write!(out, "{} {}", style("Target:").bold(), summary.target)?;
    if summary.target != summary.addr.to_string() {
        write!(out, " ({})", summary.addr)?;
    }
    if let Some(name) = &summary.reverse_name {
        write!(out, " [{}]", style(name).dim())?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "{} {} ports scanned in {:.2}s, {} open",
        style("Done:").bold(),
        summary.ports_scanned,
        summary.duration_ms as f64 / 1000.0,
        style(summary.open_count).green().bold(),
    )?;

    Ok(())
}

/// Serialize the summary as pretty-printed JSON.
fn print_json(summary: &ScanSummary) -> io::Result<()> {
    let json = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

/// Write open results as CSV rows.
fn print_csv(summary: &ScanSummary) -> io::Result<()> {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    wtr.write_record(["port", "state", "service", "banner"])?;
    for result in &summary.open {
        wtr.write_record([
            result.port.to_string().as_str(),
            "open",
            result.service.as_deref().unwrap_or(""),
            result.banner.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Print a scan header before probing begins.
pub fn print_scan_header(target: &str, addr: &str, reverse: Option<&str>, ports: usize) {
    println!(
        "{} {} ({}){}",
        style("Scanning").cyan().bold(),
        style(target).white().bold(),
        addr,
        reverse.map(|r| format!(" [{}]", r)).unwrap_or_default(),
    );
    println!("{} {} ports", style("•").dim(), ports);
}

/// Print an error message to stderr.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message to stderr.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
