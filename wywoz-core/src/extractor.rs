//! Segments ordered schedule text into dated collection records.

use chrono::NaiveDate;
use regex::Captures;

use crate::corrections::{CorrectionRule, DAY_CORRECTIONS, DateReading, Repair, repair_day};
use crate::error::LookupError;
use crate::model::{CollectionRecord, DateRange};
use crate::region::TextRegion;
use crate::schedule::normalize_records;
use crate::vocabulary::{Locale, Vocabulary, fold, waste_fractions};

/// Two-digit years are read as years of this century.
const CENTURY: i32 = 2000;

/// Reads `day month [year]` headings and the waste types listed after each one.
#[derive(Debug, Clone)]
pub struct DateWasteExtractor {
    locale: Locale,
    window: DateRange,
    rules: Vec<CorrectionRule>,
}

impl DateWasteExtractor {
    /// Extractor for `locale` expecting dates inside `window`, with the built-in corrections.
    #[must_use]
    pub fn new(locale: Locale, window: DateRange) -> Self {
        Self {
            locale,
            window,
            rules: DAY_CORRECTIONS.to_vec(),
        }
    }

    /// Replace the correction table.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<CorrectionRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Extract records from regions already in reading order.
    ///
    /// A date heading opens a group that runs until the next heading, across
    /// region boundaries. Text before the first heading and text naming no known
    /// waste type is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NoScheduleDataFound`] when no record can be built.
    pub fn extract(&self, ordered: &[TextRegion]) -> Result<Vec<CollectionRecord>, LookupError> {
        let vocabulary = self.locale.vocabulary();
        let mut current: Option<NaiveDate> = None;
        let mut records = Vec::new();

        for region in ordered {
            let folded = fold(&region.text).replace('|', "l");
            let mut cursor = 0;

            for captures in vocabulary.date_pattern().captures_iter(&folded) {
                let Some(heading) = captures.get(0) else {
                    continue;
                };
                let Some(repair) = self.read_date(vocabulary, &captures) else {
                    continue;
                };

                self.collect(current, folded.get(cursor..heading.start()), &mut records);
                cursor = heading.end();
                current = repair.date();
            }

            self.collect(current, folded.get(cursor..), &mut records);
        }

        let records = normalize_records(records);
        if records.is_empty() {
            Err(LookupError::NoScheduleDataFound)
        } else {
            Ok(records)
        }
    }

    fn collect(
        &self,
        date: Option<NaiveDate>,
        segment: Option<&str>,
        records: &mut Vec<CollectionRecord>,
    ) {
        let (Some(date), Some(segment)) = (date, segment) else {
            return;
        };
        records.extend(
            waste_fractions(segment)
                .into_iter()
                .map(|fraction| CollectionRecord::new(date, fraction, self.locale)),
        );
    }

    /// `None` when the match is not a date heading at all.
    fn read_date(&self, vocabulary: &Vocabulary, captures: &Captures<'_>) -> Option<Repair> {
        let mut reading = if let Some(raw_day) = captures.name("day") {
            let day = repair_glyphs(raw_day.as_str())?;
            let month = vocabulary.month(captures.name("month")?.as_str())?;
            let reading = DateReading::new(day, month);
            match captures.name("year") {
                Some(raw) => reading.with_year(raw.as_str().parse().ok()?),
                None => reading,
            }
        } else {
            let (day, month, raw_year) = match captures.name("nday") {
                Some(day) => (day, captures.name("nmonth")?, captures.name("nyear")?),
                None => (
                    captures.name("sday")?,
                    captures.name("smonth")?,
                    captures.name("syear")?,
                ),
            };
            let day = day.as_str().parse::<u32>().ok()?;
            let month = month.as_str().parse::<u32>().ok()?;
            if !(1..=12).contains(&month) {
                return None;
            }
            let year = raw_year.as_str().parse::<i32>().ok()?;
            let year = if raw_year.as_str().len() == 2 {
                CENTURY + year
            } else {
                year
            };
            DateReading::new(day, month).with_year(year)
        };

        if let Some(weekday) = captures
            .name("lead")
            .or_else(|| captures.name("trail"))
            .and_then(|name| vocabulary.weekday(name.as_str()))
        {
            reading = reading.with_weekday(weekday);
        }

        Some(repair_day(reading, &self.window, &self.rules))
    }
}

/// Day digits with `l`/`i` read as `1` and `o` as `0`; `None` unless a real digit is present.
fn repair_glyphs(raw_day: &str) -> Option<u32> {
    if !raw_day.chars().any(|ch| ch.is_ascii_digit()) {
        return None;
    }
    raw_day
        .chars()
        .map(|ch| match ch {
            'l' | 'i' => '1',
            'o' => '0',
            other => other,
        })
        .collect::<String>()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::model::Fraction;
    use crate::region::BoundingBox;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    fn regions(texts: &[&str]) -> Vec<TextRegion> {
        texts
            .iter()
            .zip(0_u8..)
            .map(|(text, row)| {
                TextRegion::new(
                    *text,
                    BoundingBox::from_rect(0.0, f32::from(row) * 30.0, 120.0, 20.0),
                    0.9,
                )
            })
            .collect()
    }

    fn september() -> DateRange {
        DateRange {
            start: date(2025, 9, 1),
            end: date(2025, 11, 30),
        }
    }

    fn summary(records: &[CollectionRecord]) -> Vec<(NaiveDate, &str, Fraction)> {
        records
            .iter()
            .map(|record| (record.date, record.weekday.as_str(), record.waste_type))
            .collect()
    }

    #[test]
    fn dates_open_groups_across_regions() {
        let extractor = DateWasteExtractor::new(Locale::Polish, september());
        let records = extractor
            .extract(&regions(&["12 września", "Paper", "15 września", "Garden Waste"]))
            .expect("records found");

        assert_eq!(
            summary(&records),
            vec![
                (date(2025, 9, 12), "Piątek", Fraction::Paper),
                (date(2025, 9, 15), "Poniedziałek", Fraction::Garden),
            ]
        );
    }

    #[test]
    fn several_types_per_date_and_inline_text() {
        let extractor = DateWasteExtractor::new(Locale::Polish, september());
        let records = extractor
            .extract(&regions(&[
                "Harmonogram Krakowska 1",
                "3 października zmieszane, bio",
                "10 października 2025 papier i szkło",
            ]))
            .expect("records found");

        assert_eq!(
            summary(&records),
            vec![
                (date(2025, 10, 3), "Piątek", Fraction::Organic),
                (date(2025, 10, 3), "Piątek", Fraction::Residual),
                (date(2025, 10, 10), "Piątek", Fraction::Glass),
                (date(2025, 10, 10), "Piątek", Fraction::Paper),
            ]
        );
    }

    #[test]
    fn misread_day_is_corrected_inside_window() {
        let window = DateRange {
            start: date(2025, 9, 10),
            end: date(2025, 9, 20),
        };
        let extractor = DateWasteExtractor::new(Locale::Polish, window);
        let records = extractor
            .extract(&regions(&["6 września", "bio"]))
            .expect("records found");
        assert_eq!(
            summary(&records),
            vec![(date(2025, 9, 16), "Wtorek", Fraction::Organic)]
        );
    }

    #[test]
    fn default_window_repairs_a_dropped_leading_one() {
        let window = PipelineConfig::default().window(date(2025, 9, 10));
        let extractor = DateWasteExtractor::new(Locale::Polish, window);
        let records = extractor
            .extract(&regions(&["6 września", "bio"]))
            .expect("records found");
        assert_eq!(
            summary(&records),
            vec![(date(2025, 9, 16), "Wtorek", Fraction::Organic)]
        );
    }

    #[test]
    fn weekday_beside_the_date_selects_the_correction() {
        let wide = DateRange {
            start: date(2025, 9, 1),
            end: date(2025, 12, 1),
        };
        let extractor = DateWasteExtractor::new(Locale::Polish, wide);
        let records = extractor
            .extract(&regions(&["wtorek, 6 września", "bio", "26 września (piątek) papier"]))
            .expect("records found");
        assert_eq!(
            summary(&records),
            vec![
                (date(2025, 9, 16), "Wtorek", Fraction::Organic),
                (date(2025, 9, 26), "Piątek", Fraction::Paper),
            ]
        );
    }

    #[test]
    fn without_rules_the_reading_is_kept() {
        let window = DateRange {
            start: date(2025, 9, 10),
            end: date(2025, 9, 20),
        };
        let extractor = DateWasteExtractor::new(Locale::Polish, window).with_rules(Vec::new());
        let records = extractor
            .extract(&regions(&["6 września", "bio"]))
            .expect("records found");
        assert_eq!(records.first().map(|record| record.date), Some(date(2025, 9, 6)));
    }

    #[test]
    fn glyph_confusions_in_day_are_repaired() {
        let extractor = DateWasteExtractor::new(Locale::Polish, september());
        let records = extractor
            .extract(&regions(&["l2 września metale", "2O października szkło"]))
            .expect("records found");
        assert_eq!(
            summary(&records),
            vec![
                (date(2025, 9, 12), "Piątek", Fraction::Metal),
                (date(2025, 10, 20), "Poniedziałek", Fraction::Glass),
            ]
        );
    }

    #[test]
    fn numeric_dates_are_accepted() {
        let extractor = DateWasteExtractor::new(Locale::Polish, september());
        let records = extractor
            .extract(&regions(&[
                "12.09.2025 papier",
                "15-09-25 zielone",
                "19 09 2025 szkło",
            ]))
            .expect("records found");
        assert_eq!(
            summary(&records),
            vec![
                (date(2025, 9, 12), "Piątek", Fraction::Paper),
                (date(2025, 9, 15), "Poniedziałek", Fraction::Garden),
                (date(2025, 9, 19), "Piątek", Fraction::Glass),
            ]
        );
    }

    #[test]
    fn ocr_month_variants_are_understood() {
        let extractor = DateWasteExtractor::new(Locale::Polish, september());
        let records = extractor
            .extract(&regions(&["7 poździernika", "wielkogabarytowe"]))
            .expect("records found");
        assert_eq!(
            summary(&records),
            vec![(date(2025, 10, 7), "Wtorek", Fraction::Bulky)]
        );
    }

    #[test]
    fn english_locale_uses_english_names() {
        let extractor = DateWasteExtractor::new(Locale::English, september());
        let records = extractor
            .extract(&regions(&["12 September", "Glass"]))
            .expect("records found");
        assert_eq!(
            summary(&records),
            vec![(date(2025, 9, 12), "Friday", Fraction::Glass)]
        );
    }

    #[test]
    fn duplicates_are_removed() {
        let extractor = DateWasteExtractor::new(Locale::Polish, september());
        let records = extractor
            .extract(&regions(&["12 września papier", "papier", "12 września paper"]))
            .expect("records found");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn text_before_first_date_and_unknown_words_are_ignored() {
        let extractor = DateWasteExtractor::new(Locale::Polish, september());
        let records = extractor
            .extract(&regions(&["papier", "12 września", "xyz qwerty", "bio"]))
            .expect("records found");
        assert_eq!(
            summary(&records),
            vec![(date(2025, 9, 12), "Piątek", Fraction::Organic)]
        );
    }

    #[test]
    fn no_dates_means_no_schedule() {
        let extractor = DateWasteExtractor::new(Locale::Polish, september());
        assert_eq!(
            extractor.extract(&regions(&["papier", "bio"])),
            Err(LookupError::NoScheduleDataFound)
        );
        assert_eq!(
            extractor.extract(&regions(&["12 września"])),
            Err(LookupError::NoScheduleDataFound)
        );
        assert_eq!(extractor.extract(&[]), Err(LookupError::NoScheduleDataFound));
    }

    #[test]
    fn glyph_repair_needs_a_digit() {
        assert_eq!(repair_glyphs("l6"), Some(16));
        assert_eq!(repair_glyphs("3o"), Some(30));
        assert_eq!(repair_glyphs("li"), None);
        assert_eq!(repair_glyphs("i"), None);
    }
}
