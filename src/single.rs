use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use line_counter::source::{env_lookup, resolve_source};
use line_counter::{
    Grouping, KeyStyle, LineMapper, OutputFormat, ParsePolicy, ReducerOptions, StreamReducer,
};

/// Counts lines per input file on a single machine, running the streaming
/// mapper and reducer back to back.
#[derive(Parser, Debug)]
#[command(name = "linecount_single")]
struct Cli {
    /// Input files; standard input when empty.
    files: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = Stage::Pipeline)]
    stage: Stage,

    /// Key for lines read from standard input. Defaults to the Hadoop input
    /// file variables, then UNKNOWN.
    #[arg(long)]
    source: Option<String>,

    #[arg(long, value_enum, default_value_t = KeyStyle::Raw)]
    key_style: KeyStyle,

    #[arg(long, value_enum, default_value_t = Grouping::Contiguous)]
    grouping: Grouping,

    #[arg(long, value_enum, default_value_t = OutputFormat::Tab)]
    format: OutputFormat,

    #[arg(long, value_enum, default_value_t = ParsePolicy::Permissive)]
    policy: ParsePolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Stage {
    /// Emit `<file>\t1` per line.
    Map,
    /// Sum `key\tvalue` records.
    Reduce,
    /// Map every input, then reduce the result.
    Pipeline,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            // usage errors share the exit status of every other failure
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut handle = BufWriter::new(stdout.lock());

    match cli.stage {
        Stage::Map => map_inputs(&cli, &mut handle)?,
        Stage::Reduce => {
            let input = read_inputs(&cli.files)?;
            reducer(&cli)
                .reduce_stream(input.as_slice(), &mut handle)
                .context("failed to reduce input")?;
        }
        Stage::Pipeline => {
            // the intermediate records stay in memory, grouped per input
            let mut mapped = Vec::new();
            map_inputs(&cli, &mut mapped)?;
            reducer(&cli)
                .reduce_stream(mapped.as_slice(), &mut handle)
                .context("failed to reduce mapped records")?;
        }
    }

    handle.flush()?;
    Ok(())
}

fn reducer(cli: &Cli) -> StreamReducer {
    StreamReducer::new(ReducerOptions {
        grouping: cli.grouping,
        format: cli.format,
        policy: cli.policy,
    })
}

fn map_inputs<W: Write>(cli: &Cli, output: &mut W) -> anyhow::Result<()> {
    if cli.files.is_empty() {
        let source = cli
            .source
            .clone()
            .unwrap_or_else(|| resolve_source(env_lookup));
        let stdin = io::stdin();
        LineMapper::for_source(&source, cli.key_style)
            .map_stream(stdin.lock(), output)
            .context("failed to map standard input")?;
        return Ok(());
    }

    for path in &cli.files {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        LineMapper::for_source(&path.to_string_lossy(), cli.key_style)
            .map_stream(BufReader::new(file), output)
            .with_context(|| format!("failed to map {}", path.display()))?;
    }
    Ok(())
}

fn read_inputs(files: &[PathBuf]) -> anyhow::Result<Vec<u8>> {
    let mut input = Vec::new();
    if files.is_empty() {
        io::stdin()
            .lock()
            .read_to_end(&mut input)
            .context("failed to read standard input")?;
    }
    for path in files {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        input.extend_from_slice(&bytes);
        // keep the last record of one file apart from the first of the next
        if !input.is_empty() && !input.ends_with(b"\n") {
            input.push(b'\n');
        }
    }
    Ok(input)
}
