//! Domain data structures for streets, house numbers, and collection records.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::vocabulary::Locale;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a city known to wywoz.
pub struct CityId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a city and its human-friendly name.
pub struct CityMeta {
    /// Unique identifier.
    pub id: CityId,
    /// Localized display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Opaque upstream identifier of a street.
pub struct StreetId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Opaque upstream identifier of a house number on a street.
pub struct HouseNumberId(pub String);

impl fmt::Display for StreetId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl fmt::Display for HouseNumberId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Street as enumerated by the upstream address source.
pub struct StreetEntry {
    /// Identifier used when asking for house numbers and schedules.
    pub id: StreetId,
    /// Street name as spelled by the source.
    pub name: String,
}

impl StreetEntry {
    /// Construct a street entry.
    #[must_use]
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: StreetId(id.into()),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// House number variant on a street, e.g. `3c DJ` or `1A`.
pub struct HouseNumberEntry {
    /// Identifier used when requesting the schedule image.
    pub id: HouseNumberId,
    /// Label as spelled by the source, including letter suffixes and codes.
    pub label: String,
}

impl HouseNumberEntry {
    /// Construct a house number entry.
    #[must_use]
    pub fn new<I: Into<String>, L: Into<String>>(id: I, label: L) -> Self {
        Self {
            id: HouseNumberId(id.into()),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Outcome of a successful address resolution.
pub struct ResolvedAddress {
    /// Matched street.
    pub street: StreetEntry,
    /// Matched house number variant.
    pub house_number: HouseNumberEntry,
    /// Street name plus the house number as the user typed it.
    pub display_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Waste fractions that can be collected.
pub enum Fraction {
    /// Mixed municipal waste.
    #[serde(rename = "Mixed Waste")]
    Residual,
    /// Kitchen and organic waste.
    #[serde(rename = "Bio/Organic")]
    Organic,
    /// Paper and cardboard.
    #[serde(rename = "Paper")]
    Paper,
    /// Plastics and light packaging.
    #[serde(rename = "Plastic")]
    Plastic,
    /// Glass collection.
    #[serde(rename = "Glass")]
    Glass,
    /// Metal packaging and scrap.
    #[serde(rename = "Metal")]
    Metal,
    /// Garden and green waste.
    #[serde(rename = "Garden Waste")]
    Garden,
    /// Bulky items such as furniture.
    #[serde(rename = "Large Items")]
    Bulky,
    /// Selective collection without a narrower category.
    #[serde(rename = "Selective/Recycling")]
    Selective,
}

impl Fraction {
    /// Normalized English label used in records and output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Fraction::Residual => "Mixed Waste",
            Fraction::Organic => "Bio/Organic",
            Fraction::Paper => "Paper",
            Fraction::Plastic => "Plastic",
            Fraction::Glass => "Glass",
            Fraction::Metal => "Metal",
            Fraction::Garden => "Garden Waste",
            Fraction::Bulky => "Large Items",
            Fraction::Selective => "Selective/Recycling",
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Inclusive start/end range the schedule is expected to cover.
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Window reaching `lookback_days` before and `horizon_days` after `reference`.
    ///
    /// Edges beyond the representable calendar saturate at its limits.
    #[must_use]
    pub fn around(reference: NaiveDate, lookback_days: i64, horizon_days: i64) -> Self {
        let shift = |days: i64| Duration::try_days(days).unwrap_or(Duration::MAX);
        Self {
            start: reference
                .checked_sub_signed(shift(lookback_days))
                .unwrap_or(NaiveDate::MIN),
            end: reference
                .checked_add_signed(shift(horizon_days))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// Whether `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days between `date` and the nearest edge, zero when inside.
    #[must_use]
    pub fn distance_to(&self, date: NaiveDate) -> i64 {
        if date < self.start {
            (self.start - date).num_days()
        } else if date > self.end {
            (date - self.end).num_days()
        } else {
            0
        }
    }

    /// Years a yearless date could plausibly belong to, oldest first.
    pub(crate) fn candidate_years(&self) -> RangeInclusive<i32> {
        (self.start.year() - 1)..=(self.end.year() + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Scheduled collection of one fraction on one day.
pub struct CollectionRecord {
    /// Date of the pickup.
    pub date: NaiveDate,
    /// Weekday name of `date` in the extraction locale.
    pub weekday: String,
    /// Type of waste collected.
    pub waste_type: Fraction,
}

impl CollectionRecord {
    /// Build a record, deriving the weekday name from the date.
    #[must_use]
    pub fn new(date: NaiveDate, waste_type: Fraction, locale: Locale) -> Self {
        Self {
            date,
            weekday: locale.vocabulary().weekday_name(date.weekday()).to_owned(),
            waste_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_edges_saturate_instead_of_overflowing() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 10).expect("valid date");
        let window = DateRange::around(today, 9_999_999_999_999, 9_999_999_999_999);
        assert_eq!(window.start, NaiveDate::MIN);
        assert_eq!(window.end, NaiveDate::MAX);
        assert!(window.contains(today));
    }
}
