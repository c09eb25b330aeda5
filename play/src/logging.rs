use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Send log lines to stderr, keeping stdout for the board.
///
/// Only the puzzle library is raised to `debug` by `--verbose`; everything else stays at `warn`.
/// A `RUST_LOG` setting is applied last and overrides both.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let library_level = match verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info,
    };

    Builder::new()
        .target(Target::Stderr)
        .format_timestamp(None)
        .filter_level(LevelFilter::Warn)
        .filter_module("pipewright", library_level)
        .parse_env(Env::default())
        .try_init()?;

    Ok(())
}
