use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_arena::prelude::*;

fn main() -> Result<()> {
    // Initialize program options and environment. Argument problems report
    // themselves and exit cleanly with status 0.
    dotenvy::dotenv().ok();
    let options = match ArenaOptions::try_parse() {
        Ok(options) => options,
        Err(e) => {
            let _ = e.print();
            return Ok(());
        }
    };
    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or("info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(
            match cfg!(debug_assertions) {
                true => AdaptiveFormat::WithThread,
                _    => AdaptiveFormat::Default
            })
        .set_palette("b196;208;195;111;67".to_owned())
        .start()?;

    // Fight the two contestants until told to stop.
    Arena::new(options).run()
}
