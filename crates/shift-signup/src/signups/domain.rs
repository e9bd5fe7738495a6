use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier wrapper for registered volunteers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolunteerId(pub u64);

/// Identifier wrapper for scheduled shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(pub u64);

/// Identifier wrapper for signups, stable across drop and re-signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignupId(pub u64);

/// The two kinds of daily shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Kakad,
    Robe,
}

impl ShiftType {
    pub const fn label(self) -> &'static str {
        match self {
            ShiftType::Kakad => "Kakad",
            ShiftType::Robe => "Robe",
        }
    }

    /// Capacity used when seeding a month of shifts.
    pub fn default_capacity(self, weekday: Weekday) -> u32 {
        match self {
            ShiftType::Kakad => 1,
            ShiftType::Robe => match weekday {
                Weekday::Tue | Weekday::Thu | Weekday::Sat => 4,
                Weekday::Sun | Weekday::Mon | Weekday::Wed | Weekday::Fri => 3,
            },
        }
    }
}

/// Calendar month used to bucket shifts and quotas, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(MonthParseError(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Every date in the month, in order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.first_day()
            .iter_days()
            .take_while(move |date| self.contains(*date))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = MonthParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || MonthParseError(trimmed.to_string());
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid YYYY-MM month")]
pub struct MonthParseError(pub String);

/// A scheduled shift on a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub capacity: u32,
}

impl Shift {
    pub fn details(&self) -> ShiftDetails {
        ShiftDetails {
            shift_id: self.id,
            date: self.date,
            shift_type: self.shift_type,
            capacity: self.capacity,
            weekday: self.date.weekday(),
            month: YearMonth::of(self.date),
        }
    }
}

/// Shift attributes the eligibility engine needs for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftDetails {
    pub shift_id: ShiftId,
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub capacity: u32,
    pub weekday: Weekday,
    pub month: YearMonth,
}

/// Input for creating a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShift {
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub capacity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolunteerStatus {
    Pending,
    Approved,
    Rejected,
}

impl VolunteerStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VolunteerStatus::Pending => "pending",
            VolunteerStatus::Approved => "approved",
            VolunteerStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: VolunteerId,
    pub phone: String,
    pub name: String,
    pub is_coordinator: bool,
    pub status: VolunteerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_on: Option<NaiveDate>,
}

impl Volunteer {
    pub fn is_active(&self) -> bool {
        self.removed_on.is_none()
    }
}

/// Registration payload; phones are normalized before storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVolunteer {
    pub phone: String,
    pub name: String,
    #[serde(default)]
    pub is_coordinator: bool,
    #[serde(default = "NewVolunteer::default_status")]
    pub status: VolunteerStatus,
}

impl NewVolunteer {
    fn default_status() -> VolunteerStatus {
        VolunteerStatus::Approved
    }
}

/// A volunteer's hold on a shift. Dropping sets `dropped_on` instead of deleting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signup {
    pub id: SignupId,
    pub volunteer_id: VolunteerId,
    pub shift_id: ShiftId,
    pub signed_up_on: NaiveDate,
    pub dropped_on: Option<NaiveDate>,
}

impl Signup {
    pub fn is_active(&self) -> bool {
        self.dropped_on.is_none()
    }
}

/// A volunteer's active signup joined with its shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolunteerShift {
    pub signup_id: SignupId,
    pub shift_id: ShiftId,
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub capacity: u32,
    pub signed_up_on: NaiveDate,
}

/// Shift listing row with its live occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftAvailability {
    pub shift_id: ShiftId,
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub capacity: u32,
    pub signup_count: u32,
}

impl ShiftAvailability {
    pub fn gap(&self) -> u32 {
        self.capacity.saturating_sub(self.signup_count)
    }
}

/// Unfilled shift reported to coordinators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftGap {
    pub shift_id: ShiftId,
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub capacity: u32,
    pub signup_count: u32,
    pub gap_size: u32,
}

impl From<&ShiftAvailability> for ShiftGap {
    fn from(row: &ShiftAvailability) -> Self {
        Self {
            shift_id: row.shift_id,
            date: row.date,
            shift_type: row.shift_type,
            capacity: row.capacity,
            signup_count: row.signup_count,
            gap_size: row.gap(),
        }
    }
}
