//! Log output for the command-line tool.
//!
//! The library only emits `tracing` events. `tilemap_cli` installs a stderr
//! subscriber through [`init_cli_tracing`]; `RUST_LOG` overrides the default
//! filter.

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "tilemapview=debug,tilemap_cli=debug"
    } else {
        "tilemapview=info,tilemap_cli=info"
    }
}

/// Install the stderr subscriber. Returns `false` when the `telemetry`
/// feature is off or a global subscriber is already set.
#[must_use]
pub fn init_cli_tracing(verbose: bool) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(verbose)));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(verbose)
            .without_time()
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = verbose;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_crate_level() {
        assert!(default_filter(false).contains("tilemapview=info"));
        assert!(default_filter(true).contains("tilemapview=debug"));
    }

    #[test]
    fn second_install_is_refused() {
        let _ = init_cli_tracing(false);
        assert!(!init_cli_tracing(true));
    }
}
