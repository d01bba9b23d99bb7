//! The reduce side: summing values per key over a record stream.
use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, Write};

use crate::error::{Error, Result};
use crate::options::{Grouping, ParsePolicy, ReducerOptions};
use crate::record::Record;

/// Running total for the current run of equal keys.
///
/// Input is expected grouped by key: a new key closes the previous group,
/// which `push` hands back for output.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Accumulator {
    #[default]
    Empty,
    Accumulating { key: String, total: i64 },
}

impl Accumulator {
    /// Adds `record`, returning the finished group when its key differs from
    /// the current one.
    pub fn push(&mut self, record: Record) -> Result<Option<Record>> {
        match self {
            Accumulator::Accumulating { key, total } if *key == record.key => {
                *total = total
                    .checked_add(record.value)
                    .ok_or_else(|| Error::Overflow { key: key.clone() })?;
                Ok(None)
            }
            _ => {
                let next = Accumulator::Accumulating {
                    key: record.key,
                    total: record.value,
                };
                Ok(std::mem::replace(self, next).finish())
            }
        }
    }

    /// The last group, if any record was ever pushed.
    pub fn finish(self) -> Option<Record> {
        match self {
            Accumulator::Empty => None,
            Accumulator::Accumulating { key, total } => Some(Record::new(key, total)),
        }
    }
}

/// Totals for every key seen, kept in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct GlobalTotals {
    totals: Vec<Record>,
    index: HashMap<String, usize>,
}

impl GlobalTotals {
    pub fn push(&mut self, record: Record) -> Result<()> {
        match self.index.get(&record.key) {
            Some(&i) => {
                let slot = &mut self.totals[i];
                slot.value = slot
                    .value
                    .checked_add(record.value)
                    .ok_or_else(|| Error::Overflow {
                        key: record.key.clone(),
                    })?;
            }
            None => {
                self.index.insert(record.key.clone(), self.totals.len());
                self.totals.push(record);
            }
        }
        Ok(())
    }

    pub fn into_records(self) -> Vec<Record> {
        self.totals
    }
}

/// Counters for one reducer run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReduceSummary {
    pub records: u64,
    pub skipped: u64,
    pub groups: u64,
}

impl fmt::Display for ReduceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records, {} skipped, {} groups",
            self.records, self.skipped, self.groups
        )
    }
}

enum Groups {
    Contiguous(Accumulator),
    Global(GlobalTotals),
}

/// Reads `key\tvalue` lines and writes one total per group.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamReducer {
    options: ReducerOptions,
}

impl StreamReducer {
    pub fn new(options: ReducerOptions) -> Self {
        StreamReducer { options }
    }

    pub fn reduce_stream<R, W>(&self, mut input: R, output: &mut W) -> Result<ReduceSummary>
    where
        R: BufRead,
        W: Write,
    {
        let format = self.options.format;
        let mut summary = ReduceSummary::default();
        let mut groups = match self.options.grouping {
            Grouping::Contiguous => Groups::Contiguous(Accumulator::default()),
            Grouping::Global => Groups::Global(GlobalTotals::default()),
        };

        let mut line = Vec::new();
        let mut line_no = 0;
        while input.read_until(b'\n', &mut line)? > 0 {
            line_no += 1;
            let parsed = Record::parse(&line, line_no);
            line.clear();

            let record = match parsed {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e)
                    if e.is_malformed_record() && self.options.policy == ParsePolicy::Permissive =>
                {
                    log::warn!("skipping malformed record: {e}");
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            summary.records += 1;

            match &mut groups {
                Groups::Contiguous(acc) => {
                    if let Some(done) = acc.push(record)? {
                        done.write_to(output, format)?;
                        summary.groups += 1;
                    }
                }
                Groups::Global(totals) => totals.push(record)?,
            }
        }

        let remaining: Vec<Record> = match groups {
            Groups::Contiguous(acc) => acc.finish().into_iter().collect(),
            Groups::Global(totals) => totals.into_records(),
        };
        for record in remaining {
            record.write_to(output, format)?;
            summary.groups += 1;
        }
        output.flush()?;

        log::info!("reduced {summary}");
        Ok(summary)
    }
}
