use crate::config::TimeMode;
use time::format_description::{parse_owned, OwnedFormatItem};
use time::OffsetDateTime;

const ABSOLUTE_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]";
const UNKNOWN: &str = "unknown";

/// Formats commit times for the commit list
#[derive(Debug, Clone)]
pub struct CommitTimeFormatter {
    mode: TimeMode,
    absolute_format: Option<OwnedFormatItem>,
}

impl Default for CommitTimeFormatter {
    fn default() -> Self {
        Self::new(TimeMode::default())
    }
}

impl CommitTimeFormatter {
    pub fn new(mode: TimeMode) -> Self {
        Self {
            mode,
            absolute_format: parse_owned::<2>(ABSOLUTE_FORMAT).ok(),
        }
    }

    pub fn format(&self, epoch: Option<i64>, now: i64) -> String {
        let Some(epoch) = epoch else {
            return UNKNOWN.to_string();
        };
        match self.mode {
            TimeMode::Relative => format_age(epoch, now),
            TimeMode::Absolute => self
                .absolute_format
                .as_ref()
                .and_then(|format| {
                    OffsetDateTime::from_unix_timestamp(epoch)
                        .ok()?
                        .format(format)
                        .ok()
                })
                .unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// Short age like `5m`, `3h`, `2d`, `4mo`, `1y`
pub fn format_age(epoch: i64, now: i64) -> String {
    let secs = now.saturating_sub(epoch).max(0);
    let (value, unit) = match secs {
        s if s < 60 => return "now".to_string(),
        s if s < 3_600 => (s / 60, "m"),
        s if s < 86_400 => (s / 3_600, "h"),
        s if s < 86_400 * 30 => (s / 86_400, "d"),
        s if s < 86_400 * 365 => (s / (86_400 * 30), "mo"),
        s => (s / (86_400 * 365), "y"),
    };
    format!("{value}{unit} ago")
}
