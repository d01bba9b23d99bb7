//! Naming the input file that a mapper is reading.
//!
//! Hadoop Streaming exports the path of the current split's file as an
//! environment variable whose name depends on the Hadoop version.
use std::sync::OnceLock;

use regex::Regex;

/// Variables naming the input file, newest Hadoop first.
pub const INPUT_FILE_VARS: [&str; 2] = ["mapreduce_map_input_file", "map_input_file"];

/// Key used when no input file variable is set.
pub const DEFAULT_SOURCE: &str = "UNKNOWN";

/// Returns the first non-empty value among `INPUT_FILE_VARS`, or
/// `DEFAULT_SOURCE`.
pub fn resolve_source<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    INPUT_FILE_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|value| !value.is_empty()))
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
}

/// Process environment lookup for `resolve_source`.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn uri_prefix() -> &'static Regex {
    static URI_PREFIX: OnceLock<Regex> = OnceLock::new();
    URI_PREFIX.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:(?://[^/]*)?(?P<path>/.*)$")
            .expect("static uri regex")
    })
}

/// How a source identifier is turned into the emitted key.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum KeyStyle {
    /// The identifier exactly as Hadoop exported it.
    #[default]
    Raw,
    /// URI scheme and authority removed: `hdfs://nn:8020/in/a.txt` gives `/in/a.txt`.
    Path,
    /// Last path segment only: `a.txt`.
    Basename,
}

impl KeyStyle {
    pub fn apply(&self, source: &str) -> String {
        match self {
            KeyStyle::Raw => source.to_string(),
            KeyStyle::Path => strip_uri(source).to_string(),
            KeyStyle::Basename => {
                let path = strip_uri(source).trim_end_matches('/');
                match path.rsplit('/').next() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => source.to_string(),
                }
            }
        }
    }
}

fn strip_uri(source: &str) -> &str {
    uri_prefix()
        .captures(source)
        .and_then(|caps| caps.name("path"))
        .map_or(source, |path| path.as_str())
}
