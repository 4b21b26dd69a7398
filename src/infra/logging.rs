//! Diagnostic logging to stderr via tracing-subscriber.

use tracing_subscriber::EnvFilter;

use crate::cli::AppContext;

/// Environment variable holding an explicit filter directive
pub const LOG_ENV: &str = "AMALGAM_LOG";

/// Default filter for the given global flags.
pub fn default_directive(ctx: &AppContext) -> &'static str {
    match (ctx.quiet, ctx.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Install the global subscriber. `AMALGAM_LOG` wins over the flags.
pub fn init(ctx: &AppContext) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(ctx)));

    // Ignore a second initialization (tests may install their own)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!ctx.no_color)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(quiet: bool, verbose: u8) -> AppContext {
        AppContext { quiet, no_color: true, dry_run: false, verbose }
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(&ctx(false, 0)), "info");
        assert_eq!(default_directive(&ctx(false, 1)), "debug");
        assert_eq!(default_directive(&ctx(false, 5)), "trace");
        assert_eq!(default_directive(&ctx(true, 2)), "warn");
    }
}
