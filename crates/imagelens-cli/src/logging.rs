// Logging and verbosity control

use tracing::Level;

/// Level for the given flags; quiet wins over verbose
pub fn level_for(verbose: bool, quiet: bool) -> Level {
    if quiet {
        Level::WARN
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Initialize logging based on CLI flags.
///
/// Everything goes to stderr so stdout carries only JSON.
pub fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::fmt;

    fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), Level::INFO);
        assert_eq!(level_for(true, false), Level::DEBUG);
        assert_eq!(level_for(false, true), Level::WARN);
        assert_eq!(level_for(true, true), Level::WARN);
    }
}
