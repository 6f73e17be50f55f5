//! Tracing subscriber setup for console output.
//!
//! Library code only emits [`tracing`] events; the binary installs the
//! subscriber once at startup. Events with the [`STAGE`] target render as
//! section headers and events with the [`DRY_RUN`] target are tagged so that
//! a dry run is unmistakable in the output.
use tracing_subscriber::EnvFilter;

/// Target for stage headers (`==> Converting`).
pub const STAGE: &str = "cloudcmd::stage";
/// Target for actions skipped because of `--dry-run`.
pub const DRY_RUN: &str = "cloudcmd::dry_run";
/// Environment variable overriding the console filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "CLOUDCMD_LOG";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Formats one event the way the console expects it, without ANSI colors
/// when `ansi` is false.
fn format_line(level: tracing::Level, target: &str, msg: &str, ansi: bool) -> String {
    let paint = |code: &str, text: &str| {
        if ansi {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    };

    match level {
        tracing::Level::ERROR => format!("{} {msg}", paint("31", "ERROR")),
        tracing::Level::WARN => format!("{}  {msg}", paint("33", "WARN")),
        tracing::Level::INFO if target == STAGE => {
            format!("{} {}", paint("1;34", "==>"), paint("1", msg))
        }
        tracing::Level::INFO if target == DRY_RUN => {
            format!("  {} {msg}", paint("33", "[DRY RUN]"))
        }
        tracing::Level::INFO => format!("  {msg}"),
        _ => format!("  {}", paint("2", msg)),
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits cloudcmd-style
/// console output.
struct ConsoleFormatter {
    ansi: bool,
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(
            writer,
            "{}",
            format_line(*metadata.level(), metadata.target(), &extractor.message, self.ansi)
        )
    }
}

/// Build the console filter: `CLOUDCMD_LOG` if set and valid, otherwise
/// `info` (or `debug` when verbose).
fn console_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    })
}

/// Initialise the global [`tracing`] subscriber.
///
/// All console output goes to stderr so that stdout carries only the
/// converted commands. Must be called once at program startup, before any
/// logging.
pub fn init_subscriber(verbose: bool) {
    use std::io::IsTerminal as _;
    use tracing_subscriber::{Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

    let ansi = std::io::stderr().is_terminal();
    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter { ansi })
        .with_writer(std::io::stderr)
        .with_filter(console_filter(verbose));

    tracing_subscriber::registry().with(console_layer).init();
}
