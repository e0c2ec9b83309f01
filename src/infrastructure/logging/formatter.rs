use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Bracketed single-line event format:
/// `[TIMESTAMP] [LEVEL] [SPANS] [TARGET: FILE:LINE]: MESSAGE`.
///
/// `SPANS` is the instrumented call chain from the outermost span, e.g.
/// `run > populate`. Source locations are only written for warnings and
/// errors.
pub struct BracketedFormatter;

impl<S, N> FormatEvent<S, N> for BracketedFormatter
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
        let metadata = event.metadata();

        write!(
            writer,
            "[{}] [{:5}] ",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            metadata.level()
        )?;

        let spans: Vec<&str> = ctx
            .event_scope()
            .map(|scope| scope.from_root().map(|span| span.name()).collect())
            .unwrap_or_default();
        if spans.is_empty() {
            write!(writer, "[-] ")?;
        } else {
            write!(writer, "[{}] ", spans.join(" > "))?;
        }

        match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) if *metadata.level() <= Level::WARN => {
                write!(writer, "[{}: {}:{}]: ", metadata.target(), file, line)?
            }
            _ => write!(writer, "[{}]: ", metadata.target())?,
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
