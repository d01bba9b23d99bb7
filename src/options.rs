//! Run options, read from `LINECOUNT_*` variables for the streaming binaries.
//!
//! Hadoop Streaming forwards these to the tasks with `-cmdenv NAME=value`,
//! e.g. `LINECOUNT_GROUPING=global`. Unset or empty variables keep the
//! defaults; a value that names no variant fails the run.
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::record::OutputFormat;
use crate::source::KeyStyle;

pub const ENV_PREFIX: &str = "LINECOUNT";

/// Which records the reducer sums together.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// One total per run of equal adjacent keys, as the Hadoop shuffle
    /// delivers them.
    #[default]
    Contiguous,
    /// One total per distinct key regardless of input order.
    Global,
}

/// What to do with a line that is not a `key\tinteger` record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Fail the run.
    Strict,
    /// Log it and carry on.
    #[default]
    Permissive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ReducerOptions {
    pub grouping: Grouping,
    pub format: OutputFormat,
    pub policy: ParsePolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct MapperOptions {
    pub key_style: KeyStyle,
}

/// Loads `T` from the `LINECOUNT_*` variables of the process environment.
pub fn get_configuration<T: DeserializeOwned>() -> Result<T> {
    load(None)
}

/// Same as `get_configuration`, reading `vars` instead of the process
/// environment.
pub fn configuration_from<T: DeserializeOwned>(vars: config::Map<String, String>) -> Result<T> {
    load(Some(vars))
}

fn load<T: DeserializeOwned>(vars: Option<config::Map<String, String>>) -> Result<T> {
    let settings = config::Config::builder()
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .ignore_empty(true)
                .source(vars),
        )
        .build()?;
    Ok(settings.try_deserialize::<T>()?)
}
