//! CLI Module
//!
//! Command-line configuration for the Pareidolia service. Every server
//! option can also come from the environment.

pub mod commands;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::neural::Topology;
use crate::server::DEFAULT_BODY_LIMIT;

/// Pareidolia - mock neural audio hallucination service
#[derive(Parser, Debug)]
#[command(name = "pareidolia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    #[command(name = "serve")]
    Serve(ServeArgs),

    /// Process a local WAV file and print the JSON result
    #[command(name = "process")]
    Process(ProcessArgs),
}

/// Network construction options
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Seed for weight initialization (random per run when omitted)
    #[arg(long, env = "PAREIDOLIA_SEED")]
    pub seed: Option<u64>,

    /// Number of stacked one-second output segments
    #[arg(long, default_value_t = 1, env = "PAREIDOLIA_SEGMENTS")]
    pub segments: usize,
}

impl ModelArgs {
    pub fn topology(&self) -> Topology {
        Topology::default().with_segments(self.segments)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "PAREIDOLIA_HOST")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000, env = "PORT")]
    pub port: u16,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = DEFAULT_BODY_LIMIT, env = "PAREIDOLIA_BODY_LIMIT")]
    pub body_limit: usize,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    /// Input WAV file (16-bit PCM)
    pub input: PathBuf,

    /// Gain applied to the network output (default 0.5)
    #[arg(long)]
    pub delirium: Option<String>,

    /// Standard deviation of the added noise (default 0.3)
    #[arg(long)]
    pub chaos: Option<String>,

    /// Run one deep-dream pass after the noise
    #[arg(long)]
    pub deep_dream: bool,

    /// Seed for the noise generator (random when omitted)
    #[arg(long)]
    pub noise_seed: Option<u64>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}
