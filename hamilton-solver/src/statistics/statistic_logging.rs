//! Writes statistics as `PREFIX NAME=VALUE` lines to a configurable writer.
//!
//! Nothing is written until [`configure_statistic_logging`] has been called.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// How statistic lines look.
#[derive(Debug, Clone)]
pub struct StatisticOptions {
    prefix: String,
    closing_line: Option<String>,
    casing: Option<Case>,
}

impl StatisticOptions {
    pub fn new(prefix: impl Into<String>) -> Self {
        StatisticOptions {
            prefix: prefix.into(),
            closing_line: None,
            casing: None,
        }
    }

    /// A line written after every block of statistics, e.g. a separator expected by a script
    /// reading the output.
    pub fn with_closing_line(mut self, closing_line: impl Into<String>) -> Self {
        self.closing_line = Some(closing_line.into());
        self
    }

    /// Converts the statistic names (which are snake case) to `casing`.
    pub fn with_casing(mut self, casing: Case) -> Self {
        self.casing = Some(casing);
        self
    }

    fn format(&self, name: impl Display, value: impl Display) -> String {
        let name = name.to_string();
        let name = match self.casing {
            Some(casing) => name.to_case(casing),
            None => name,
        };
        format!("{} {name}={value}", self.prefix)
    }
}

struct StatisticSink {
    options: StatisticOptions,
    writer: Box<dyn Write + Send>,
}

impl Debug for StatisticSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticSink")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

static STATISTIC_SINK: OnceLock<Mutex<StatisticSink>> = OnceLock::new();

/// Enables statistic logging; only the first call has an effect.
///
/// Statistics go to stdout unless a writer is provided.
pub fn configure_statistic_logging(
    options: StatisticOptions,
    writer: Option<Box<dyn Write + Send>>,
) {
    let _ = STATISTIC_SINK.get_or_init(|| {
        Mutex::new(StatisticSink {
            options,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

fn with_sink(action: impl FnOnce(&mut StatisticSink)) {
    if let Some(sink) = STATISTIC_SINK.get() {
        if let Ok(mut sink) = sink.lock() {
            action(&mut sink)
        }
    }
}

pub fn log_statistic(name: impl Display, value: impl Display) {
    with_sink(|sink| {
        let line = sink.options.format(name, value);
        let _ = writeln!(sink.writer, "{line}");
    })
}

/// Writes the closing line, if one is configured.
pub fn log_statistic_postfix() {
    with_sink(|sink| {
        if let Some(closing_line) = &sink.options.closing_line {
            let _ = writeln!(sink.writer, "{closing_line}");
        }
    })
}

pub fn should_log_statistics() -> bool {
    STATISTIC_SINK.get().is_some()
}

#[cfg(test)]
mod tests {
    use convert_case::Case;

    use super::StatisticOptions;

    #[test]
    fn names_are_cased_after_the_prefix() {
        let options = StatisticOptions::new("%%").with_casing(Case::Camel);

        assert_eq!(
            options.format("num_iterations", 12),
            "%% numIterations=12"
        );
    }

    #[test]
    fn names_are_kept_without_a_casing() {
        let options = StatisticOptions::new("c").with_closing_line("----------");

        assert_eq!(options.format("num_decisions", 3), "c num_decisions=3");
    }
}
