//! Serialized output for predictions: JSON and JSON Lines.
//!
//! Plain-text tag strings go straight to stdout in the CLI; this writer
//! handles the structured formats for single results and batches.

use serde::Serialize;
use std::io::{self, Write};

/// Structured output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Serializes prediction records to JSON or JSONL.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    records_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer. `pretty` only affects JSON format;
    /// JSONL is always one compact object per line.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            records_written: 0,
        }
    }

    /// Write a single record.
    pub fn write<T: Serialize>(&mut self, record: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Json if self.pretty => {
                serde_json::to_writer_pretty(&mut self.writer, record).map_err(io::Error::other)?;
            }
            OutputFormat::Json | OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
            }
        }
        writeln!(self.writer)?;
        self.records_written += 1;
        Ok(())
    }

    /// Write a batch of records.
    ///
    /// JSON renders one array; JSONL renders one object per line.
    pub fn write_all<T: Serialize>(&mut self, records: &[T]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, records)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, records).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.records_written += records.len();
            }
            OutputFormat::JsonLines => {
                for record in records {
                    self.write(record)?;
                }
            }
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Number of records written so far.
    pub fn count(&self) -> usize {
        self.records_written
    }
}
