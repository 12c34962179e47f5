//! Command-line argument parsing.
//!
//! Flags override the matching config file values.

use crate::config::Config;
use crate::dataset::Split;
use clap::Parser;
use std::path::PathBuf;

/// Flags problems in a text2cypher dataset and writes the clean records.
#[derive(Parser, Debug)]
#[command(name = "t2c-cleanup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Dataset file (.jsonl or .json), or a directory holding <split>.jsonl
    #[arg(short, long, value_name = "PATH", default_value = "data")]
    pub input: PathBuf,

    /// Split to clean (test or train); prompted for when omitted
    #[arg(short, long, value_name = "SPLIT")]
    pub split: Option<Split>,

    /// Directory for the output files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// LLM provider to use: openai, ollama or mock
    #[arg(long, value_name = "PROVIDER")]
    pub llm: Option<String>,

    /// Query timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Only process the first N records
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Also write every record with its issues column
    #[arg(long)]
    pub annotated: bool,

    /// Halt on the first failed model call instead of skipping its checks
    #[arg(long)]
    pub strict_llm: bool,

    /// Skip the model-driven checks
    #[arg(long)]
    pub no_semantic: bool,

    /// Use scripted in-memory graph clients (dry run, no network)
    #[arg(long)]
    pub mock_graph: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Write the issue summary as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub summary_json: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies flag overrides on top of the file config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(provider) = &self.llm {
            config.llm.provider = provider.clone();
        }
        if let Some(timeout) = self.timeout {
            config.graph.timeout_secs = timeout;
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if self.annotated {
            config.output.annotated = true;
        }
        if self.strict_llm {
            config.detection.fail_on_llm_error = true;
        }
        if self.no_semantic {
            config.detection.semantic_checks = false;
        }
    }
}
