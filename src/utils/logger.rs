use std::io::Stderr;
use tracing_subscriber::fmt::{self, format::DefaultFields, format::Format};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type StderrLayer<S> = fmt::Layer<S, DefaultFields, Format, fn() -> Stderr>;

/// Filter used when `RUST_LOG` is not set.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "bintray_cleanup=debug,info"
    } else {
        "bintray_cleanup=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Logs go to stderr; stdout is reserved for the cleanup report.
fn stderr_layer<S>() -> StderrLayer<S> {
    fmt::layer()
        .with_writer(std::io::stderr as fn() -> Stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(stderr_layer().compact())
        .init();
}

/// JSON-formatted logs for unattended runs (CI jobs pruning on a schedule).
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(env_filter(false))
        .with(stderr_layer().json())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_adds_debug_for_this_crate_only() {
        assert_eq!(default_directive(false), "bintray_cleanup=info");
        assert_eq!(default_directive(true), "bintray_cleanup=debug,info");
    }
}
