use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::{fmt, str::FromStr};

use crate::error::LoanError;

/// What to do when the fixed payment leaves a balance after `term` periods.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ShortfallPolicy {
    /// The installment due on the last period retires whatever is left.
    #[default]
    Balloon,
    /// Stop at `term` rows and keep the open balance.
    Accept,
    /// As `Accept`, but log a warning.
    Warn,
    /// Refuse to produce the schedule.
    Reject,
}

impl fmt::Display for ShortfallPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShortfallPolicy::Balloon => "balloon",
            ShortfallPolicy::Accept => "accept",
            ShortfallPolicy::Warn => "warn",
            ShortfallPolicy::Reject => "reject",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ShortfallPolicy {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balloon" => Ok(ShortfallPolicy::Balloon),
            "accept" => Ok(ShortfallPolicy::Accept),
            "warn" => Ok(ShortfallPolicy::Warn),
            "reject" => Ok(ShortfallPolicy::Reject),
            other => Err(LoanError::invalid(
                "shortfall",
                format!("unknown policy '{other}' (expected balloon, accept, warn or reject)"),
            )),
        }
    }
}

/// Runtime settings shared by the loan office and the command line.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Config {
    pub shortfall: ShortfallPolicy,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shortfall: ShortfallPolicy::default(),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn new(shortfall: ShortfallPolicy, log_level: LevelFilter) -> Self {
        Self {
            shortfall,
            log_level,
        }
    }

    pub fn init_logging(&self) -> Result<(), log::SetLoggerError> {
        SimpleLogger::new().with_level(self.log_level).init()
    }
}
