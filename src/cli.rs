//! Command-line interface definitions.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags left
//! unset fall back to the settings file, then to built-in defaults.

use clap::{Parser, ValueEnum};

/// A concurrent TCP connect scanner with banner grabbing.
#[derive(Parser, Debug)]
#[command(name = "coracle")]
#[command(version)]
#[command(about = "Scan a host for open TCP ports", long_about = None)]
pub struct Args {
    /// Target hostname or IP address to scan
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan (e.g. "80", "80,443", "1-1000", "22,80,8000-9000");
    /// invalid tokens are ignored, default is 1-1024
    #[arg(short, long, default_value = "")]
    pub ports: String,

    /// Maximum number of simultaneous probes
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Per-port timeout in milliseconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Grab service banners from open ports
    #[arg(short = 'b', long)]
    pub banner: bool,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Also stream closed ports in plain output
    #[arg(long)]
    pub show_closed: bool,

    /// Show a progress bar while scanning
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Streamed tab-separated lines plus a summary footer
    Plain,
    /// JSON serialization of the final summary
    Json,
    /// CSV rows for open ports
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_defaults() {
        let args = Args::parse_from(["coracle", "example.com"]);
        assert_eq!(args.target, "example.com");
        assert_eq!(args.ports, "");
        assert!(args.concurrency.is_none());
        assert!(!args.banner);
    }

    #[test]
    fn test_args_parse_full() {
        let args = Args::parse_from([
            "coracle",
            "10.0.0.1",
            "-p",
            "22,80",
            "-c",
            "50",
            "-t",
            "500",
            "-b",
            "-o",
            "json",
        ]);
        assert_eq!(args.ports, "22,80");
        assert_eq!(args.concurrency, Some(50));
        assert_eq!(args.timeout, Some(500));
        assert!(args.banner);
        assert_eq!(args.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
