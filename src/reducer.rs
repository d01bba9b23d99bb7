use std::io::{self, BufWriter};

use anyhow::Context;
use line_counter::options::get_configuration;
use line_counter::{ReducerOptions, StreamReducer};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options: ReducerOptions =
        get_configuration().context("invalid reducer configuration")?;
    log::debug!("reducing with {:?}", options);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut handle = BufWriter::new(stdout.lock());

    StreamReducer::new(options)
        .reduce_stream(stdin.lock(), &mut handle)
        .context("failed to reduce standard input")?;

    Ok(())
}
