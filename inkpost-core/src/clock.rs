//! Civil-time formatting for post timestamps and ids
//!
//! Stamps are wall-clock minutes in a fixed zone (Asia/Shanghai by default),
//! independent of the server's local zone. If the zone name cannot be
//! resolved the clock falls back to a fixed +08:00 offset; Shanghai has no
//! DST so output is identical either way.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

/// `created`/`updated` format: `YYYY-MM-DD HH:MM`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Id prefix format: `YYYY-MM-DDTHH-MM`
pub const ID_PREFIX_FORMAT: &str = "%Y-%m-%dT%H-%M";

const FALLBACK_OFFSET_SECS: i32 = 8 * 3600;

#[derive(Debug, Clone, Copy)]
enum Zone {
    Named(Tz),
    Fixed(FixedOffset),
}

/// Converts instants into civil-time strings
#[derive(Debug, Clone, Copy)]
pub struct CivilClock {
    zone: Zone,
}

impl CivilClock {
    /// Resolve an IANA zone name, falling back to +08:00.
    pub fn new(zone_name: &str) -> Self {
        match zone_name.parse::<Tz>() {
            Ok(tz) => Self {
                zone: Zone::Named(tz),
            },
            Err(e) => {
                tracing::warn!(zone = zone_name, "Failed to load time zone ({}), using fixed +08:00", e);
                Self::fixed_fallback()
            }
        }
    }

    /// The fixed +08:00 clock used when no zone database entry is available
    pub fn fixed_fallback() -> Self {
        let offset = FixedOffset::east_opt(FALLBACK_OFFSET_SECS).expect("+08:00 is a valid offset");
        Self {
            zone: Zone::Fixed(offset),
        }
    }

    /// `YYYY-MM-DD HH:MM` for the given instant
    pub fn timestamp(&self, at: DateTime<Utc>) -> String {
        self.format(at, TIMESTAMP_FORMAT)
    }

    /// `YYYY-MM-DDTHH-MM` for the given instant
    pub fn id_prefix(&self, at: DateTime<Utc>) -> String {
        self.format(at, ID_PREFIX_FORMAT)
    }

    /// Human-readable zone description (for startup logs)
    pub fn zone_name(&self) -> String {
        match self.zone {
            Zone::Named(tz) => tz.name().to_string(),
            Zone::Fixed(offset) => offset.to_string(),
        }
    }

    fn format(&self, at: DateTime<Utc>, fmt: &str) -> String {
        match self.zone {
            Zone::Named(tz) => at.with_timezone(&tz).format(fmt).to_string(),
            Zone::Fixed(offset) => at.with_timezone(&offset).format(fmt).to_string(),
        }
    }
}

impl Default for CivilClock {
    fn default() -> Self {
        Self::new("Asia/Shanghai")
    }
}
