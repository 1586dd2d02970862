use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::error::GenError;
use crate::output::stream_len;
use crate::pipeline::DEFAULT_CHUNK_LEN;
use crate::rng::{DEFAULT_SEED1, DEFAULT_SEED2};
use crate::topk::DEFAULT_TOP_K;

/// zipfgen: write a Zipf-distributed sample stream for benchmark workloads.
#[derive(Debug, Clone, Parser)]
#[command(name = "zipfgen", version)]
pub struct Config {
    /// File to write to
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Zipf exponent; 0 gives uniform weights
    #[arg(short = 'a', long, default_value_t = 0.5, allow_negative_numbers = true)]
    pub alpha: f64,

    /// Number of samples to draw
    #[arg(short = 'c', long, default_value_t = 1 << 25)]
    pub count: u64,

    /// Number of elements with mass
    #[arg(short = 'N', long, default_value_t = 1 << 20)]
    pub elements: u32,

    /// Number of elements in the universe
    #[arg(short = 'm', long, default_value_t = u32::MAX)]
    pub universe: u32,

    /// First seed value (PCG state)
    #[arg(short = '1', long, default_value_t = DEFAULT_SEED1)]
    pub seed1: u32,

    /// Second seed value (PCG stream)
    #[arg(short = '2', long, default_value_t = DEFAULT_SEED2)]
    pub seed2: u32,

    /// Entries in the top-K summary block
    #[arg(short = 'k', long = "top-k", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Samples buffered in memory per staging write
    #[arg(long = "buffer", default_value_t = DEFAULT_CHUNK_LEN)]
    pub chunk_len: usize,

    /// Re-read the output and check it against the in-memory tallies
    #[arg(long)]
    pub verify: bool,

    /// Shows this guideline
    #[arg(short = 'i', long = "info", action = ArgAction::Help)]
    pub info: Option<bool>,
}

impl Config {
    /// Defaults for everything but the output path.
    pub fn with_file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            alpha: 0.5,
            count: 1 << 25,
            elements: 1 << 20,
            universe: u32::MAX,
            seed1: DEFAULT_SEED1,
            seed2: DEFAULT_SEED2,
            top_k: DEFAULT_TOP_K,
            chunk_len: DEFAULT_CHUNK_LEN,
            verify: false,
            info: None,
        }
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.file.as_os_str().is_empty() {
            return Err(GenError::InvalidConfig("output filename is empty".into()));
        }
        if !self.alpha.is_finite() {
            return Err(GenError::InvalidConfig(format!(
                "alpha must be finite, got {}",
                self.alpha
            )));
        }
        if self.elements == 0 {
            return Err(GenError::InvalidConfig(
                "number of weighted elements must be at least 1".into(),
            ));
        }
        if self.universe < self.elements {
            return Err(GenError::InvalidConfig(format!(
                "universe ({}) must be at least the number of weighted elements ({})",
                self.universe, self.elements
            )));
        }
        if self.chunk_len == 0 {
            return Err(GenError::InvalidConfig("buffer must hold at least one sample".into()));
        }
        if stream_len(self.count).is_none() {
            return Err(GenError::InvalidConfig(format!(
                "count {} is too large: the sample stream would exceed u64::MAX bytes",
                self.count
            )));
        }
        Ok(())
    }
}
