//! The `key\tvalue` records passed between mapper and reducer.
use std::io::Write;

use crate::error::{Error, Result};

/// Separator between key and value on the wire.
pub const FIELD_SEPARATOR: char = '\t';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: i64,
}

impl Record {
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Record {
            key: key.into(),
            value,
        }
    }

    /// Parses one input line, `line` being its 1-based position for error
    /// reporting. Blank lines yield `Ok(None)`.
    pub fn parse(raw: &[u8], line: usize) -> Result<Option<Record>> {
        let text = std::str::from_utf8(raw).map_err(|_| Error::InvalidUtf8 { line })?;
        let text = text.trim_end_matches(['\n', '\r']);
        if text.trim().is_empty() {
            return Ok(None);
        }

        let (key, value) = text
            .split_once(FIELD_SEPARATOR)
            .ok_or(Error::MissingSeparator { line })?;
        let value = value
            .trim()
            .parse::<i64>()
            .map_err(|source| Error::InvalidValue {
                line,
                value: value.to_string(),
                source,
            })?;

        Ok(Some(Record::new(key, value)))
    }

    pub fn write_to<W: Write>(&self, out: &mut W, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Tab => writeln!(out, "{}{}{}", self.key, FIELD_SEPARATOR, self.value)?,
            OutputFormat::Quoted => writeln!(out, "\"{}\": {}", self.key, self.value)?,
        }
        Ok(())
    }
}

/// How the reducer prints its totals.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `key<TAB>total`, readable by another streaming stage.
    #[default]
    Tab,
    /// `"key": total`
    Quoted,
}
