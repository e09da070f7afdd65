use std::{any::Any, backtrace::Backtrace};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig, defaults::DEFAULT_RUST_LOG};

/// Installs the global subscriber and the panic hook.
///
/// `RUST_LOG` wins over `cfg.rust_log`. A directive string that does not
/// parse falls back to the default filter instead of aborting startup.
pub fn init_tracing(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.rust_log))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_RUST_LOG));

    let output = fmt::layer().with_target(false);
    let registry = tracing_subscriber::registry().with(filter);
    let installed = match cfg.format {
        LogFormat::Full => registry.with(output).try_init(),
        LogFormat::Compact => registry.with(output.compact()).try_init(),
    };

    match installed {
        Ok(()) => install_panic_hook(),
        Err(err) => tracing::debug!(error = %err, "subscriber already installed"),
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = panic_message(info.payload());
        let location = info
            .location()
            .map(ToString::to_string)
            .unwrap_or_else(|| "<unknown>".to_string());

        tracing::error!(
            panic = %message,
            %location,
            backtrace = %Backtrace::capture(),
            "thread panicked"
        );
    }));
}

/// Text of a panic payload, for `&str` and `String` payloads.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::panic_message;

    #[test]
    fn reads_str_and_string_payloads() {
        let from_str: Box<dyn std::any::Any + Send> = Box::new("boom");
        let from_string: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        let other: Box<dyn std::any::Any + Send> = Box::new(42_u8);

        assert_eq!(panic_message(from_str.as_ref()), "boom");
        assert_eq!(panic_message(from_string.as_ref()), "bang");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
