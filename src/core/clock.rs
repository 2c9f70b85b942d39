//! Day keys and rendered timestamps.
//!
//! A [`Clock`] decides which calendar a message timestamp is bucketed into.
//! Timestamp `0` means "unknown" and is never rendered as the epoch.
//!
//! ```
//! use chatfold::core::clock::Clock;
//!
//! let clock = Clock::Utc;
//! assert_eq!(clock.day_key(90_000), "1970-01-02");
//! assert_eq!(clock.render(90_000), "1970-01-02 01:00:00");
//! assert_eq!(clock.day_key(0), "unknown");
//! assert_eq!(clock.render(0), "");
//! ```

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Key used for messages without a usable timestamp.
pub const UNKNOWN_KEY: &str = "unknown";

/// Format of a day key (`YYYY-MM-DD`).
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Format of a rendered timestamp (`YYYY-MM-DD HH:MM:SS`).
pub const RENDER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time zone used for day keys and rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clock {
    /// Coordinated Universal Time.
    #[default]
    Utc,
    /// The zone of the machine running the conversion.
    Local,
}

impl Clock {
    /// Formats `ts` with `fmt`, or `None` when it is unknown or out of range.
    pub fn format(self, ts: i64, fmt: &str) -> Option<String> {
        if ts == 0 {
            return None;
        }
        let utc = DateTime::<Utc>::from_timestamp(ts, 0)?;
        Some(match self {
            Clock::Utc => utc.format(fmt).to_string(),
            Clock::Local => utc.with_timezone(&Local).format(fmt).to_string(),
        })
    }

    /// Day bucket for `ts`: `YYYY-MM-DD`, or `"unknown"`.
    pub fn day_key(self, ts: i64) -> String {
        self.format(ts, DAY_FORMAT)
            .unwrap_or_else(|| UNKNOWN_KEY.to_string())
    }

    /// Wall-clock rendering of `ts`, empty when unknown.
    pub fn render(self, ts: i64) -> String {
        self.format(ts, RENDER_FORMAT).unwrap_or_default()
    }
}
