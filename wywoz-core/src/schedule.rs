//! The structured schedule for one address.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{CollectionRecord, Fraction, ResolvedAddress};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Collection records of one address, chronological and free of duplicates.
pub struct ScheduleModel {
    address: ResolvedAddress,
    records: Vec<CollectionRecord>,
    waste_types: BTreeSet<Fraction>,
    total_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// All fractions collected on one day.
pub struct ScheduleDay {
    /// Collection date.
    pub date: NaiveDate,
    /// Weekday name as carried by the records.
    pub weekday: String,
    /// Fractions collected that day, ordered by label.
    pub waste_types: Vec<Fraction>,
}

impl ScheduleModel {
    /// Normalize `records` and aggregate them for `address`.
    ///
    /// An empty list yields a model with no records rather than an error.
    #[must_use]
    pub fn build(address: ResolvedAddress, records: Vec<CollectionRecord>) -> Self {
        let records = normalize_records(records);
        let waste_types = records.iter().map(|record| record.waste_type).collect();
        let total_count = records.len();
        Self {
            address,
            records,
            waste_types,
            total_count,
        }
    }

    /// Address the schedule belongs to.
    #[must_use]
    pub fn address(&self) -> &ResolvedAddress {
        &self.address
    }

    /// Records sorted by date, then waste type label.
    #[must_use]
    pub fn records(&self) -> &[CollectionRecord] {
        &self.records
    }

    /// Every fraction appearing in the records.
    #[must_use]
    pub fn waste_types(&self) -> &BTreeSet<Fraction> {
        &self.waste_types
    }

    /// Number of records.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Whether no collections were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records grouped per collection day.
    #[must_use]
    pub fn days(&self) -> Vec<ScheduleDay> {
        let mut days: Vec<ScheduleDay> = Vec::new();
        for record in &self.records {
            match days.last_mut() {
                Some(day) if day.date == record.date => day.waste_types.push(record.waste_type),
                _ => days.push(ScheduleDay {
                    date: record.date,
                    weekday: record.weekday.clone(),
                    waste_types: vec![record.waste_type],
                }),
            }
        }
        days
    }

    /// First collection on or after `today`.
    #[must_use]
    pub fn next_after(&self, today: NaiveDate) -> Option<&CollectionRecord> {
        self.records.iter().find(|record| record.date >= today)
    }
}

/// Sort records by date then waste type label and drop repeated (date, type) pairs.
#[must_use]
pub fn normalize_records(mut records: Vec<CollectionRecord>) -> Vec<CollectionRecord> {
    records.sort_by(|left, right| {
        left.date
            .cmp(&right.date)
            .then_with(|| left.waste_type.label().cmp(right.waste_type.label()))
    });
    records.dedup_by(|later, earlier| {
        later.date == earlier.date && later.waste_type == earlier.waste_type
    });
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HouseNumberEntry, StreetEntry};
    use crate::vocabulary::Locale;

    fn address() -> ResolvedAddress {
        ResolvedAddress {
            street: StreetEntry::new("39936", "Krakowska"),
            house_number: HouseNumberEntry::new("840531", "1 DJ"),
            display_address: "Krakowska 1".to_owned(),
        }
    }

    fn record(day: u32, fraction: Fraction) -> CollectionRecord {
        let date = NaiveDate::from_ymd_opt(2025, 9, day).expect("valid test date");
        CollectionRecord::new(date, fraction, Locale::Polish)
    }

    #[test]
    fn build_aggregates_normalized_records() {
        let model = ScheduleModel::build(
            address(),
            vec![
                record(15, Fraction::Paper),
                record(12, Fraction::Residual),
                record(12, Fraction::Glass),
                record(15, Fraction::Paper),
            ],
        );

        assert_eq!(model.total_count(), model.records().len());
        assert_eq!(model.total_count(), 3);
        let expected: BTreeSet<Fraction> =
            model.records().iter().map(|record| record.waste_type).collect();
        assert_eq!(model.waste_types(), &expected);
        assert_eq!(
            model
                .records()
                .iter()
                .map(|record| (record.date.format("%d").to_string(), record.waste_type))
                .collect::<Vec<_>>(),
            vec![
                ("12".to_owned(), Fraction::Glass),
                ("12".to_owned(), Fraction::Residual),
                ("15".to_owned(), Fraction::Paper),
            ]
        );
    }

    #[test]
    fn empty_records_yield_an_empty_model() {
        let model = ScheduleModel::build(address(), Vec::new());
        assert!(model.is_empty());
        assert_eq!(model.total_count(), 0);
        assert!(model.waste_types().is_empty());
        assert!(model.days().is_empty());
    }

    #[test]
    fn normalization_is_idempotent() {
        let records = vec![
            record(20, Fraction::Metal),
            record(3, Fraction::Organic),
            record(20, Fraction::Metal),
            record(3, Fraction::Bulky),
        ];
        let once = normalize_records(records);
        let twice = normalize_records(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn days_group_records_by_date() {
        let model = ScheduleModel::build(
            address(),
            vec![
                record(12, Fraction::Paper),
                record(12, Fraction::Organic),
                record(19, Fraction::Paper),
            ],
        );
        let days = model.days();
        assert_eq!(days.len(), 2);
        assert_eq!(
            days.first().map(|day| day.waste_types.clone()),
            Some(vec![Fraction::Organic, Fraction::Paper])
        );
        assert_eq!(days.first().map(|day| day.weekday.as_str()), Some("Piątek"));
    }

    #[test]
    fn next_after_skips_past_collections() {
        let model = ScheduleModel::build(
            address(),
            vec![record(5, Fraction::Glass), record(25, Fraction::Paper)],
        );
        let today = NaiveDate::from_ymd_opt(2025, 9, 10).expect("valid test date");
        assert_eq!(
            model.next_after(today).map(|record| record.waste_type),
            Some(Fraction::Paper)
        );
    }

    #[test]
    fn serializes_with_normalized_labels() {
        let model = ScheduleModel::build(address(), vec![record(12, Fraction::Garden)]);
        let json = serde_json::to_value(&model).expect("model serializes");
        assert_eq!(json["total_count"], 1);
        assert_eq!(json["records"][0]["waste_type"], "Garden Waste");
        assert_eq!(json["records"][0]["date"], "2025-09-12");
        assert_eq!(json["address"]["display_address"], "Krakowska 1");
    }
}
