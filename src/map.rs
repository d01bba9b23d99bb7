//! The map side: one `(source, 1)` record per input line.
use std::io::{BufRead, Write};

use crate::error::Result;
use crate::record::{OutputFormat, Record};
use crate::source::KeyStyle;

/// Emits `<key>\t1` for every line read, the key fixed for the whole run.
#[derive(Debug, Clone)]
pub struct LineMapper {
    key: String,
}

impl LineMapper {
    pub fn new(key: impl Into<String>) -> Self {
        LineMapper { key: key.into() }
    }

    /// Mapper keyed by `source` rewritten with `style`.
    pub fn for_source(source: &str, style: KeyStyle) -> Self {
        LineMapper::new(style.apply(source))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The record emitted for each line.
    pub fn record(&self) -> Record {
        Record::new(self.key.clone(), 1)
    }

    /// Maps the whole of `input` into `output` and returns the number of
    /// lines seen. Line content is never decoded.
    pub fn map_stream<R, W>(&self, mut input: R, output: &mut W) -> Result<u64>
    where
        R: BufRead,
        W: Write,
    {
        let record = self.record();
        let mut line = Vec::new();
        let mut lines = 0;

        // a trailing line without '\n' still counts
        while input.read_until(b'\n', &mut line)? > 0 {
            record.write_to(output, OutputFormat::Tab)?;
            lines += 1;
            line.clear();
        }

        log::debug!("mapped {} lines for `{}`", lines, self.key);
        Ok(lines)
    }
}
