use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Maps an instant to its calendar day in the reference timezone.
///
/// This is the only place a "day" is derived: puzzle seeds and streaks both go through it.
pub fn day_key(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant
        .with_timezone(&offset)
        .format(DAY_KEY_FORMAT)
        .to_string()
}

pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}

pub fn format_day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
    pinned: Option<DateTime<Utc>>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn utc() -> Self {
        Self::from_offset(Utc.fix())
    }

    pub fn from_offset(offset: FixedOffset) -> Self {
        Self {
            offset,
            pinned: None,
        }
    }

    /// Out-of-range offsets fall back to UTC.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        match minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
        {
            Some(offset) => Self::from_offset(offset),
            None => {
                log::warn!(target: "calendar", "Invalid UTC offset {} minutes; using UTC", minutes);
                Self::utc()
            }
        }
    }

    /// A calendar frozen at `instant`.
    pub fn pinned(self, instant: DateTime<Utc>) -> Self {
        Self {
            pinned: Some(instant),
            ..self
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.pinned.unwrap_or_else(Utc::now)
    }

    pub fn today_key(&self) -> String {
        day_key(self.now(), self.offset)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.offset).date_naive()
    }
}
