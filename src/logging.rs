//! Diagnostics setup for the binary.
//!
//! Everything goes to stderr; stdout carries only prompts and the result
//! line. `RUST_LOG` wins over the built-in filter when set.

#[cfg(feature = "logging")]
pub fn init_logging(verbose: bool) {
    // ---
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default = if verbose {
        "concat_rpc=debug"
    } else {
        "concat_rpc=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

#[cfg(not(feature = "logging"))]
pub fn init_logging(_verbose: bool) {}
