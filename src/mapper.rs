extern crate efflux;

use anyhow::Context as _;
use efflux::prelude::{Context, Mapper};
use line_counter::options::get_configuration;
use line_counter::source::{env_lookup, resolve_source};
use line_counter::{LineMapper, MapperOptions};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // the input file is fixed for the lifetime of a streaming map task
    let options: MapperOptions = get_configuration().context("invalid mapper configuration")?;
    let source = resolve_source(env_lookup);
    let mapper = LineMapper::for_source(&source, options.key_style);
    log::info!("counting lines of `{}` as `{}`", source, mapper.key());

    efflux::run_mapper(LineCountMapper::from(mapper));
    Ok(())
}

/// Streaming mapper writing `<file>\t1` for each line of its split.
struct LineCountMapper {
    key: Vec<u8>,
    value: Vec<u8>,
}

impl From<LineMapper> for LineCountMapper {
    fn from(mapper: LineMapper) -> Self {
        let record = mapper.record();
        LineCountMapper {
            key: record.key.into_bytes(),
            value: record.value.to_string().into_bytes(),
        }
    }
}

// Mapping stage implementation.
impl Mapper for LineCountMapper {
    fn map(&mut self, _offset: usize, _line: &[u8], ctx: &mut Context) {
        // the content never matters, only that a line was read
        ctx.write(&self.key, &self.value);
    }
}
