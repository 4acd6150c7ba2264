use std::fmt;
use std::str::FromStr;

use anstream::ColorChoice;
use anyhow::Context;
use owo_colors::OwoColorize;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    /// Suppress all tracing output by default (overridable by `RUST_LOG`).
    #[default]
    Default,
    /// Show debug messages by default (overridable by `RUST_LOG`).
    Verbose,
}

/// A message-only event format: the level, then the message, without timestamps or spans.
struct FlakedexFormat;

impl<S, N> FormatEvent<S, N> for FlakedexFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let level = meta.level();
        // Same colors as tracing
        if ansi {
            match *level {
                tracing::Level::TRACE => write!(writer, "{} ", level.purple())?,
                tracing::Level::DEBUG => write!(writer, "{} ", level.blue())?,
                tracing::Level::INFO => write!(writer, "{} ", level.green())?,
                tracing::Level::WARN => write!(writer, "{} ", level.yellow())?,
                tracing::Level::ERROR => write!(writer, "{} ", level.red())?,
            }
        } else {
            write!(writer, "{level} ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Configure `tracing` based on the given [`Level`], taking into account the `RUST_LOG`
/// environment variable.
///
/// The [`Level`] dictates the default filter (which can be overridden by `RUST_LOG`):
/// [`Level::Verbose`] shows `flakedex=debug` messages by default.
pub(crate) fn setup_logging(level: Level) -> anyhow::Result<()> {
    let default_directive = match level {
        Level::Default => {
            // Show nothing, but allow `RUST_LOG` to override.
            tracing::level_filters::LevelFilter::OFF.into()
        }
        Level::Verbose => {
            // Show `DEBUG` messages from the CLI crate, but allow `RUST_LOG` to override.
            Directive::from_str("flakedex=debug").unwrap()
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_directive)
        .from_env()
        .context("Invalid RUST_LOG directives")?;

    let ansi = match anstream::Stderr::choice(&std::io::stderr()) {
        ColorChoice::Always | ColorChoice::AlwaysAnsi => true,
        ColorChoice::Never => false,
        // We just asked anstream for a choice, that can't be auto
        ColorChoice::Auto => unreachable!(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(FlakedexFormat)
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_filter(filter),
        )
        .init();

    Ok(())
}
