use serde::Serialize;
use time::{Date, Duration, OffsetDateTime, Weekday};
use time_tz::{ToTimezone, timezones};

use mealdeck_shared::mealplan::DayKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    /// Machine key, ISO `YYYY-MM-DD`.
    pub key: DayKey,
    /// Display label such as `Wednesday, Jun 5`.
    pub display: String,
    #[serde(skip)]
    pub date: Date,
}

impl WeekDay {
    pub fn new(date: Date) -> Self {
        let month = date.month().to_string();
        let short_month = month.get(..3).unwrap_or(&month);

        Self {
            key: day_key(date),
            display: format!("{}, {} {}", date.weekday(), short_month, date.day()),
            date,
        }
    }
}

/// Seven contiguous days, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    days: Vec<WeekDay>,
}

impl WeekWindow {
    /// Returns the Monday-anchored week containing `reference`.
    pub fn containing(reference: Date) -> Self {
        let monday = reference.saturating_add(Duration::days(monday_offset(reference.weekday())));
        let days = (0..7)
            .map(|i| WeekDay::new(monday.saturating_add(Duration::days(i))))
            .collect();

        Self { days }
    }

    /// Time of day is ignored, only the calendar date counts.
    pub fn containing_datetime(reference: OffsetDateTime) -> Self {
        Self::containing(reference.date())
    }

    /// Week containing the current wall-clock date in timezone `tz`, UTC when unknown.
    pub fn current(tz: impl AsRef<str>) -> Self {
        Self::containing_datetime(now(tz))
    }

    pub fn days(&self) -> &[WeekDay] {
        &self.days
    }

    pub fn first(&self) -> &WeekDay {
        &self.days[0]
    }

    pub fn last(&self) -> &WeekDay {
        &self.days[self.days.len() - 1]
    }

    pub fn start(&self) -> &str {
        &self.first().key
    }

    pub fn end(&self) -> &str {
        &self.last().key
    }

    /// Inclusive range check on ISO strings.
    pub fn contains(&self, date: &str) -> bool {
        self.start() <= date && date <= self.end()
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.first().display, self.last().display)
    }
}

pub fn now(tz: impl AsRef<str>) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    match timezones::get_by_name(tz.as_ref()) {
        Some(tz) => now.to_timezone(tz),
        None => now,
    }
}

pub fn day_key(date: Date) -> DayKey {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

// Sunday belongs to the week that started six days earlier.
fn monday_offset(weekday: Weekday) -> i64 {
    match weekday.number_days_from_sunday() {
        0 => -6,
        d => 1 - d as i64,
    }
}
