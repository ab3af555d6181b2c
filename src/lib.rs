//! # Coracle - A Concurrent TCP Connect Scanner
//!
//! Coracle probes a host for open TCP ports, optionally grabs service
//! banners, and annotates open ports with well-known service names.
//!
//! ## Features
//!
//! - **Bounded concurrency**: a FIFO admission gate caps simultaneous probes
//! - **Banner grabbing**: one passive read per open port, deadline-bounded
//! - **Service identification**: static well-known-port lookup
//! - **Streaming results**: settled probes stream out as they complete
//! - **Multiple output formats**: plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use coracle::probe::TcpProber;
//! use coracle::scan::{run_scan, ScanOptions};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let target = coracle::resolver::resolve("example.com").await.unwrap();
//!     let prober = Arc::new(TcpProber::new(Duration::from_secs(2), true));
//!     let ports = coracle::ports::expand("1-1024");
//!
//!     let summary = run_scan(prober, &target, &ports, &ScanOptions::default(), None).await;
//!     for result in &summary.open {
//!         println!("{} is open", result.port);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`resolver`] - forward and reverse target resolution
//! - [`ports`] - lenient port specification parsing
//! - [`gate`] - the bounded-concurrency admission gate
//! - [`probe`] - the per-port connect/banner prober
//! - [`scan`] - orchestration and the final summary
//! - [`services`] - well-known port/service table
//! - [`output`] - result rendering
//! - [`config`] - persistent defaults
//! - [`error`] - error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod output;
pub mod ports;
pub mod probe;
pub mod resolver;
pub mod scan;
pub mod services;

// Re-export commonly used types
pub use error::{ConfigError, ResolveError};
pub use probe::{ProbeResult, Prober, TcpProber};
pub use resolver::ScanTarget;
pub use scan::{run_scan, ScanOptions, ScanSummary};
