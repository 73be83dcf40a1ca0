//! Reading branch execution traces.
//!
//! A trace is plain text with one executed branch per line: a decimal
//! byte address and a 0/1 taken flag, separated by whitespace. The
//! address is divided by 4 on the way in, since the low two bits of a
//! word-aligned instruction address are always zero.
//!
//! Records are decoded lazily, one line at a time; a malformed line is
//! reported when it is reached, not when the file is opened. A reader
//! is a single forward pass and cannot be rewound.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::branch::{BranchRecord, Outcome};

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: expected `<address> <0|1>`, got {found:?}")]
    Format {
        path: String,
        /// 1-based line number of the offending line.
        line: usize,
        found: String,
    },
}

/// Lazy decoder for one trace.
pub struct TraceReader<R> {
    name: String,
    lines: io::Lines<R>,
    line_no: usize,
}

impl TraceReader<BufReader<File>> {
    /// Open a trace file for a single replay pass.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|source| TraceError::Read {
            path: name.clone(),
            source,
        })?;
        Ok(Self::from_reader(name, BufReader::new(file)))
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Decode records from any buffered reader, reported as `name` in
    /// errors.
    pub fn from_reader(name: impl ToString, reader: R) -> Self {
        Self {
            name: name.to_string(),
            lines: reader.lines(),
            line_no: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, line: &str) -> Result<BranchRecord, TraceError> {
        let mut tokens = line.split_whitespace();
        let (Some(addr), Some(flag), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(self.format_err(line));
        };
        let addr: usize = addr.parse().map_err(|_| self.format_err(line))?;
        let outcome = match flag {
            "0" => Outcome::N,
            "1" => Outcome::T,
            _ => return Err(self.format_err(line)),
        };
        Ok(BranchRecord::new(addr / 4, outcome))
    }

    fn format_err(&self, line: &str) -> TraceError {
        TraceError::Format {
            path: self.name.clone(),
            line: self.line_no,
            found: line.to_string(),
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<BranchRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(source) => {
                return Some(Err(TraceError::Read {
                    path: self.name.clone(),
                    source,
                }))
            }
        };
        self.line_no += 1;
        Some(self.parse(&line))
    }
}
