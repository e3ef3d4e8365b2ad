//! Due-date inference for newly created tasks.
//!
//! Two rules are supported:
//!
//! - **End of workday**: notifications can be given a due date of 17:00 today.
//! - **Planning tags**: issues tagged with a planning period of the current
//!   year get a due date at the last second of that period. Recognised tags
//!   are `<n>H` (half year), `<n>Q` (quarter), `<n>W` (week of the year) and
//!   month abbreviations `Jan`..`Dec` (case-insensitive).
//!
//! All functions take `now` explicitly so they are deterministic under test.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone};

/// Hour of the day used as "end of today".
pub const END_OF_WORKDAY_HOUR: u32 = 17;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A planning period named by a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Half year, 1 or 2.
    Half(u32),
    /// Quarter, 1 to 4.
    Quarter(u32),
    /// Week of the year counted from 1 January, 1 to 53.
    Week(u32),
    /// Calendar month, 1 to 12.
    Month(u32),
}

impl Period {
    /// Parse a tag into a period, or `None` if the tag is not one.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();

        if let Some(index) = MONTH_ABBREVIATIONS
            .iter()
            .position(|month| month.eq_ignore_ascii_case(tag))
        {
            return u32::try_from(index + 1).ok().map(Self::Month);
        }

        let period = if let Some(number) = tag.strip_suffix('H') {
            Self::Half(number.parse().ok()?)
        } else if let Some(number) = tag.strip_suffix('Q') {
            Self::Quarter(number.parse().ok()?)
        } else if let Some(number) = tag.strip_suffix('W') {
            Self::Week(number.parse().ok()?)
        } else {
            return None;
        };
        period.is_valid().then_some(period)
    }

    const fn is_valid(self) -> bool {
        match self {
            Self::Half(n) => n >= 1 && n <= 2,
            Self::Quarter(n) => n >= 1 && n <= 4,
            Self::Week(n) => n >= 1 && n <= 53,
            Self::Month(n) => n >= 1 && n <= 12,
        }
    }

    /// The first instant after the period ends, as a local naive datetime.
    fn next_start(self, year: i32) -> Option<NaiveDateTime> {
        let date = match self {
            Self::Half(n) => first_of_month(year, 6 * n + 1)?,
            Self::Quarter(n) => first_of_month(year, 3 * n + 1)?,
            Self::Month(n) => first_of_month(year, n + 1)?,
            Self::Week(n) => {
                NaiveDate::from_ymd_opt(year, 1, 1)?.checked_add_days(chrono::Days::new(u64::from(7 * n)))?
            }
        };
        date.and_hms_opt(0, 0, 0)
    }

    /// Last second of the period within `year`, in the timezone of `now`.
    #[must_use]
    pub fn end<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let naive = self.next_start(now.year())? - Duration::seconds(1);
        now.timezone().from_local_datetime(&naive).earliest()
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    if month > 12 {
        NaiveDate::from_ymd_opt(year + 1, month - 12, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month, 1)
    }
}

/// 17:00 on the day of `now`.
#[must_use]
pub fn end_of_workday<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let naive = now.date_naive().and_hms_opt(END_OF_WORKDAY_HOUR, 0, 0)?;
    now.timezone().from_local_datetime(&naive).earliest()
}

/// Deadline named by the first planning tag in `tags`.
///
/// Tags that are not planning periods (or name an impossible one, like `7Q`)
/// are skipped. Returns `None` when no tag names a period.
pub fn infer_deadline<Tz, I, S>(tags: I, now: &DateTime<Tz>) -> Option<DateTime<Tz>>
where
    Tz: TimeZone,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|tag| Period::parse(tag.as_ref()))
        .find_map(|period| period.end(now))
}
