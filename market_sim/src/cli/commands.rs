use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::timeframe::Timeframe;

#[derive(Parser)]
#[command(author, version, about = "Synthetic market data for chart dashboards")]
pub struct Cli {
    /// Path to a TOML config file (falls back to $MARKET_SIM_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Where the live feed sends its redraws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// One JSON line per redraw on stdout
    Json,
    /// Redraws as log events on stderr
    Log,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a series once and print it
    Generate {
        /// Timeframe: LIVE, 1D, 7D, 1M, 3M or 1Y (defaults to the configured one)
        #[arg(short, long)]
        timeframe: Option<Timeframe>,

        /// Seed for a reproducible series
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Run the live feed, printing one JSON line per redraw
    Live {
        #[arg(long, value_enum, default_value = "json")]
        sink: SinkKind,

        #[arg(short, long)]
        timeframe: Option<Timeframe>,

        /// Stop after this many ticks (runs until Ctrl-C when omitted)
        #[arg(long)]
        ticks: Option<u64>,

        #[arg(long)]
        seed: Option<u64>,

        /// Override the tick period in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
    },

    /// Print the static order list
    Orders {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}
