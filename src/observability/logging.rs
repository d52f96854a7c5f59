//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Map the `verbose` config flag to a default filter
//! - Swap the filter when a reload flips `verbose`
//!
//! # Design Decisions
//! - `RUST_LOG` always wins over the config flag, including on reload
//! - Quiet mode still reports warnings and errors
//! - The filter sits behind a `reload` layer; the rest of the subscriber
//!   is built once

use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "front_door=debug,tower_http=debug"
    } else {
        "front_door=warn"
    }
}

/// Handle to the installed log filter.
#[derive(Clone)]
pub struct LogFilter {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogFilter {
    /// Filter layer and its handle, honouring `RUST_LOG` when set.
    pub fn new(verbose: bool) -> (reload::Layer<EnvFilter, Registry>, Self) {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Self::build(filter, true),
            Err(_) => Self::from_config(verbose),
        }
    }

    /// Filter layer driven by `verbose` alone.
    pub fn from_config(verbose: bool) -> (reload::Layer<EnvFilter, Registry>, Self) {
        Self::build(EnvFilter::new(default_filter(verbose)), false)
    }

    fn build(filter: EnvFilter, from_env: bool) -> (reload::Layer<EnvFilter, Registry>, Self) {
        let (layer, handle) = reload::Layer::new(filter);
        (layer, Self { handle, from_env })
    }

    /// Switch to the default filter for `verbose`.
    ///
    /// No-op when the filter came from `RUST_LOG`.
    pub fn set_verbose(&self, verbose: bool) -> Result<(), reload::Error> {
        if self.from_env {
            return Ok(());
        }
        self.handle.reload(EnvFilter::new(default_filter(verbose)))
    }

    /// Directives of the active filter.
    pub fn current(&self) -> Option<String> {
        self.handle.with_current(|filter| filter.to_string()).ok()
    }
}

/// Install the global subscriber.
pub fn init(verbose: bool) -> LogFilter {
    let (filter_layer, filter) = LogFilter::new(verbose);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_selects_debug() {
        assert!(default_filter(true).contains("front_door=debug"));
        assert_eq!(default_filter(false), "front_door=warn");
        // Both must parse as filter directives.
        EnvFilter::try_new(default_filter(true)).unwrap();
        EnvFilter::try_new(default_filter(false)).unwrap();
    }

    #[test]
    fn set_verbose_swaps_the_active_filter() {
        let (_layer, filter) = LogFilter::from_config(true);
        assert!(filter.current().unwrap().contains("front_door=debug"));

        filter.set_verbose(false).unwrap();
        let current = filter.current().unwrap();
        assert!(current.contains("front_door=warn"));
        assert!(!current.contains("debug"));

        filter.set_verbose(true).unwrap();
        assert!(filter.current().unwrap().contains("front_door=debug"));
    }

    #[test]
    fn env_filter_is_never_replaced() {
        let (_layer, filter) = LogFilter::build(EnvFilter::new("front_door=trace"), true);

        filter.set_verbose(false).unwrap();
        assert_eq!(filter.current().unwrap(), "front_door=trace");
    }
}
