//! Binary entry point: argument handling, wiring, and rendering around the
//! scan engine.

use anyhow::Context;
use clap::Parser;
use coracle::cli::{Args, OutputFormat};
use coracle::config::AppSettings;
use coracle::probe::TcpProber;
use coracle::scan::{self, ScanOptions};
use coracle::{output, ports, resolver};
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let settings = AppSettings::load().unwrap_or_else(|e| {
        output::print_warning(&format!("ignoring settings file: {}", e));
        AppSettings::default()
    });

    let format = args
        .output
        .or_else(|| settings.output.parse().ok())
        .unwrap_or(OutputFormat::Plain);
    let concurrency = args.concurrency.unwrap_or(settings.concurrency);
    let timeout_ms = args.timeout.unwrap_or(settings.timeout_ms).max(1);
    let grab_banners = args.banner || settings.banner;

    let port_list = ports::expand(&args.ports);
    if port_list.is_empty() {
        output::print_warning("port specification matched no valid ports");
    }

    // Resolution failure is the one fatal scan error; nothing gets probed.
    let target = match resolver::resolve(&args.target).await {
        Ok(target) => target,
        Err(e) => {
            output::print_error(&e.to_string());
            return Ok(ExitCode::from(2));
        }
    };

    if format == OutputFormat::Plain {
        output::print_scan_header(
            &target.host,
            &target.addr.to_string(),
            target.reverse_name.as_deref(),
            port_list.len(),
        );
    }

    let options = ScanOptions {
        concurrency,
        timeout: Duration::from_millis(timeout_ms),
        grab_banners,
        ..Default::default()
    };
    let prober = Arc::new(TcpProber::new(options.timeout, options.grab_banners));

    let progress = args.verbose.then(|| {
        let pb = ProgressBar::new(port_list.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb
    });

    // The live channel drives the progress bar and plain-mode lines while
    // the scan is still running.
    let (tx, mut rx) = mpsc::unbounded_channel::<coracle::ProbeResult>();
    let stream_lines = format == OutputFormat::Plain;
    let show_closed = args.show_closed;
    let live_progress = progress.clone();
    let printer = tokio::spawn(async move {
        while let Some(result) = rx.recv().await {
            if let Some(pb) = &live_progress {
                pb.inc(1);
            }
            if stream_lines && (result.open || show_closed) {
                let line = output::event_line(&result);
                match &live_progress {
                    Some(pb) => pb.println(line),
                    None => println!("{}", line),
                }
            }
        }
    });

    let summary = scan::run_scan(prober, &target, &port_list, &options, Some(tx)).await;

    // run_scan dropped its sender, so the printer drains and exits.
    printer.await.ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    output::print_results(&summary, format).context("failed to render results")?;

    Ok(ExitCode::SUCCESS)
}
