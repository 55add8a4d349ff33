use crate::config::Config;
use log::LevelFilter;
use simplelog::{self, ConfigBuilder, SharedLogger};

/// Crates whose logs are hidden below Trace. The database driver logs every
/// statement and the session layers log every request.
const QUIET_CRATES: &[&str] = &[
    "sqlx",
    "sea_orm",
    "tower_sessions",
    "tower_sessions_sqlx_store",
    "axum_login",
    "hyper",
];

pub struct Logger {}

impl Logger {
    /// Starts the terminal logger at the configured level. At Trace nothing is hidden.
    pub fn init_logger(config: &Config) -> Result<(), log::SetLoggerError> {
        simplelog::CombinedLogger::init(vec![Self::terminal(config.log_level_filter)])
    }

    fn terminal(level: LevelFilter) -> Box<dyn SharedLogger> {
        simplelog::TermLogger::new(
            level,
            Self::build_log_config(level != LevelFilter::Trace),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
    }

    fn build_log_config(quiet_dependencies: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if quiet_dependencies {
            for module in QUIET_CRATES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}
