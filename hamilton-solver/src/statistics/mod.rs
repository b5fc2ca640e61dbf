//! Statistics of the solver, its propagators and its branchers.
mod statistic_logger;
mod statistic_logging;

use std::fmt::Display;

pub use statistic_logger::StatisticLogger;
pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;
pub use statistic_logging::should_log_statistics;
pub use statistic_logging::StatisticOptions;

/// Something which can write itself through a [`StatisticLogger`].
///
/// Structs of counters get an implementation from
/// [`create_statistics_struct!`](crate::create_statistics_struct).
pub trait Statistic {
    fn log(&self, statistic_logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, statistic_logger: StatisticLogger) {
        statistic_logger.log_statistic(self);
    }
}

/// Declares a struct of counters; logging it writes one line per field, named after the field.
///
/// ```rust
/// # use hamilton_solver::create_statistics_struct;
/// create_statistics_struct!(
///     /// Counters of a cut generator.
///     CutStatistics {
///         num_rounds: usize,
///         best_bound: i64,
///     }
/// );
///
/// let mut statistics = CutStatistics::default();
/// statistics.num_rounds += 1;
///
/// assert_eq!(statistics.num_rounds, 1);
/// assert_eq!(statistics.best_bound, 0);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    (
        $(#[$doc:meta])*
        $name:ident { $($(#[$field_doc:meta])* $field:ident : $type:ident),+ $(,)? }
    ) => {
        $(#[$doc])*
        #[derive(Default, Debug, Copy, Clone)]
        pub(crate) struct $name {
            $($(#[$field_doc])* pub(crate) $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $(
                    let field_logger = statistic_logger.attach_to_prefix(stringify!($field));
                    $crate::statistics::Statistic::log(&self.$field, field_logger);
                )+
            }
        }
    };
}
