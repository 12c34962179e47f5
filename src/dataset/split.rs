//! Dataset split selection.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::{CleanupError, Result};

/// Which half of the dataset to clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Split {
    #[default]
    Test,
    Train,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Train => "train",
        }
    }

    /// File name of the split inside a dataset directory.
    pub fn input_file_name(&self) -> String {
        format!("{}.jsonl", self.as_str())
    }

    /// Asks on `output` and reads the answer from `input` until it names a split.
    ///
    /// End of input is an error.
    pub fn prompt<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<Self> {
        loop {
            write!(output, "Which split do you want to clean? (test/train): ")
                .and_then(|_| output.flush())
                .map_err(|e| CleanupError::internal(format!("Failed to write prompt: {}", e)))?;

            let mut line = String::new();
            let read = input
                .read_line(&mut line)
                .map_err(|e| CleanupError::internal(format!("Failed to read answer: {}", e)))?;
            if read == 0 {
                return Err(CleanupError::config("No split selected"));
            }

            match line.trim().parse() {
                Ok(split) => return Ok(split),
                Err(e) => {
                    writeln!(output, "{}", e).map_err(|e| {
                        CleanupError::internal(format!("Failed to write prompt: {}", e))
                    })?;
                }
            }
        }
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "train" => Ok(Self::Train),
            _ => Err(format!("Unknown split '{}', expected test or train", s)),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
