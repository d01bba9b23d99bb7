//! Line counting over Hadoop Streaming.
//!
//! The mapper turns every input line into a `<source>\t1` record and the
//! reducer sums records per key. Both work on any `BufRead`/`Write` pair so
//! the same code backs the streaming binaries and the local pipeline.
pub mod error;
pub mod map;
pub mod options;
pub mod record;
pub mod reduce;
pub mod source;

pub use error::{Error, Result};
pub use map::LineMapper;
pub use options::{Grouping, MapperOptions, ParsePolicy, ReducerOptions};
pub use record::{OutputFormat, Record};
pub use reduce::{Accumulator, GlobalTotals, ReduceSummary, StreamReducer};
pub use source::{resolve_source, KeyStyle, DEFAULT_SOURCE, INPUT_FILE_VARS};
