//! Locale vocabularies: month and weekday names, waste aliases, and text folding.
//!
//! Every table here is built once on first use and shared read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::Weekday;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Fraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Language of the schedule image.
pub enum Locale {
    /// Polish month and weekday names.
    Polish,
    /// English month and weekday names.
    English,
}

impl Locale {
    /// Shared vocabulary for this locale.
    #[must_use]
    pub fn vocabulary(self) -> &'static Vocabulary {
        match self {
            Locale::Polish => &POLISH,
            Locale::English => &ENGLISH,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Locale::Polish => "pl",
            Locale::English => "en",
        };
        write!(formatter, "{tag}")
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "pl" | "polish" | "pl_pl" => Ok(Locale::Polish),
            "en" | "english" | "en_gb" | "en_us" => Ok(Locale::English),
            other => Err(format!("unknown locale '{other}'")),
        }
    }
}

/// Month and weekday names of one locale plus the compiled date pattern.
pub struct Vocabulary {
    months: HashMap<&'static str, u32>,
    weekdays: [&'static str; 7],
    folded_weekdays: HashMap<String, Weekday>,
    date_pattern: Regex,
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn alternation<'names, I: IntoIterator<Item = &'names str>>(names: I) -> String {
    let mut names: Vec<&str> = names.into_iter().collect();
    names.sort_by(|left, right| right.len().cmp(&left.len()).then(left.cmp(right)));
    names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|")
}

impl Vocabulary {
    fn new(months: &[(&'static str, u32)], weekdays: [&'static str; 7]) -> Self {
        // Longest first so "wrzesnia" wins over the "wrz" abbreviation.
        let month_names = alternation(months.iter().map(|(name, _)| *name));
        let folded_weekdays: HashMap<String, Weekday> = weekdays
            .iter()
            .map(|name| fold(name))
            .zip(WEEK)
            .collect();
        let weekday_names = alternation(folded_weekdays.keys().map(String::as_str));

        let named = format!(
            r"(?P<day>[0-9lio]{{1,2}})\.?\s+(?P<month>{month_names})\b(?:\s+(?P<year>\d{{4}})\b)?"
        );
        let numeric = r"(?P<nday>\d{1,2})[./-](?P<nmonth>\d{1,2})[./-](?P<nyear>\d{4}|\d{2})\b";
        let spaced = r"(?P<sday>\d{1,2})\s(?P<smonth>\d{1,2})\s(?P<syear>\d{4})\b";
        let pattern = format!(
            r"\b(?:(?P<lead>{weekday_names})\b[,.]?\s*)?(?:{named}|{numeric}|{spaced})(?:\s*[,(]?\s*(?P<trail>{weekday_names})\b)?"
        );

        Self {
            months: months.iter().copied().collect(),
            weekdays,
            folded_weekdays,
            date_pattern: Regex::new(&pattern).expect("vocabulary names are escaped"),
        }
    }

    /// Month number for a folded month name or known misreading of one.
    #[must_use]
    pub fn month(&self, folded_name: &str) -> Option<u32> {
        self.months.get(folded_name).copied()
    }

    /// Display name of a weekday.
    #[must_use]
    pub fn weekday_name(&self, weekday: Weekday) -> &'static str {
        self.weekdays
            .get(weekday.num_days_from_monday() as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Weekday for a folded weekday name.
    #[must_use]
    pub fn weekday(&self, folded_name: &str) -> Option<Weekday> {
        self.folded_weekdays.get(folded_name).copied()
    }

    /// Pattern matching `day month [year]` and numeric dates in folded text,
    /// with an optional weekday before or after.
    pub(crate) fn date_pattern(&self) -> &Regex {
        &self.date_pattern
    }
}

static POLISH: LazyLock<Vocabulary> = LazyLock::new(|| {
    Vocabulary::new(
        &[
            ("stycznia", 1),
            ("styczen", 1),
            ("stycznie", 1),
            ("sty", 1),
            ("lutego", 2),
            ("luty", 2),
            ("lut", 2),
            ("marca", 3),
            ("marzec", 3),
            ("mar", 3),
            ("kwietnia", 4),
            ("kwiecien", 4),
            ("kwi", 4),
            ("maja", 5),
            ("maj", 5),
            ("czerwca", 6),
            ("czerwiec", 6),
            ("cze", 6),
            ("lipca", 7),
            ("lipiec", 7),
            ("lip", 7),
            ("sierpnia", 8),
            ("sierpien", 8),
            ("wrzesnia", 9),
            ("wrzesien", 9),
            ("wrz", 9),
            ("pazdziernika", 10),
            ("pazdziernik", 10),
            ("pozdziernika", 10),
            ("pa dziernika", 10),
            ("pa z dziernika", 10),
            ("paz", 10),
            ("listopada", 11),
            ("listopadu", 11),
            ("listopad", 11),
            ("lis", 11),
            ("grudnia", 12),
            ("grudzien", 12),
            ("gru", 12),
        ],
        [
            "Poniedziałek",
            "Wtorek",
            "Środa",
            "Czwartek",
            "Piątek",
            "Sobota",
            "Niedziela",
        ],
    )
});

static ENGLISH: LazyLock<Vocabulary> = LazyLock::new(|| {
    Vocabulary::new(
        &[
            ("january", 1),
            ("jan", 1),
            ("february", 2),
            ("feb", 2),
            ("march", 3),
            ("mar", 3),
            ("april", 4),
            ("apr", 4),
            ("may", 5),
            ("june", 6),
            ("jun", 6),
            ("july", 7),
            ("jul", 7),
            ("august", 8),
            ("aug", 8),
            ("september", 9),
            ("sept", 9),
            ("sep", 9),
            ("october", 10),
            ("oct", 10),
            ("november", 11),
            ("nov", 11),
            ("december", 12),
            ("dec", 12),
        ],
        [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ],
    )
});

/// Waste aliases in folded form. Polish and English names are accepted in every locale.
const WASTE_ALIASES: &[(&str, Fraction)] = &[
    ("odpady zmieszane", Fraction::Residual),
    ("zmieszane", Fraction::Residual),
    ("mixed waste", Fraction::Residual),
    ("mixed", Fraction::Residual),
    ("bioodpady", Fraction::Organic),
    ("bio", Fraction::Organic),
    ("organiczne", Fraction::Organic),
    ("bio/organic", Fraction::Organic),
    ("organic", Fraction::Organic),
    ("szklo", Fraction::Glass),
    ("glass", Fraction::Glass),
    ("papier", Fraction::Paper),
    ("paper", Fraction::Paper),
    ("plastik", Fraction::Plastic),
    ("tworzywa sztuczne", Fraction::Plastic),
    ("tworzywa", Fraction::Plastic),
    ("plastic", Fraction::Plastic),
    ("metale", Fraction::Metal),
    ("metal", Fraction::Metal),
    ("odpady wielkogabarytowe", Fraction::Bulky),
    ("wielkogabarytowe", Fraction::Bulky),
    ("large items", Fraction::Bulky),
    ("bulky", Fraction::Bulky),
    ("odpady zielone", Fraction::Garden),
    ("zielone", Fraction::Garden),
    ("garden waste", Fraction::Garden),
    ("garden", Fraction::Garden),
    ("selektywne", Fraction::Selective),
    ("selective/recycling", Fraction::Selective),
    ("selective", Fraction::Selective),
    ("recycling", Fraction::Selective),
];

struct WasteVocabulary {
    aliases: HashMap<&'static str, Fraction>,
    pattern: Regex,
}

static WASTE: LazyLock<WasteVocabulary> = LazyLock::new(|| {
    let mut names: Vec<&str> = WASTE_ALIASES.iter().map(|(alias, _)| *alias).collect();
    names.sort_by(|left, right| right.len().cmp(&left.len()).then(left.cmp(right)));
    let alternation = names
        .iter()
        .map(|alias| regex::escape(alias))
        .collect::<Vec<_>>()
        .join("|");

    WasteVocabulary {
        aliases: WASTE_ALIASES.iter().copied().collect(),
        pattern: Regex::new(&format!(r"\b(?:{alternation})\b")).expect("aliases are escaped"),
    }
});

/// All waste fractions named in already folded text, in order of appearance.
#[must_use]
pub fn waste_fractions(folded: &str) -> Vec<Fraction> {
    WASTE
        .pattern
        .find_iter(folded)
        .filter_map(|found| WASTE.aliases.get(found.as_str()).copied())
        .collect()
}

/// Lowercase, strip Polish diacritics, and collapse whitespace.
#[must_use]
pub fn fold(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|ch| match ch {
            'ą' => 'a',
            'ć' => 'c',
            'ę' => 'e',
            'ł' => 'l',
            'ń' => 'n',
            'ó' => 'o',
            'ś' => 's',
            'ź' | 'ż' => 'z',
            other => other,
        })
        .collect();

    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_diacritics_and_case() {
        assert_eq!(fold("  Września   ŻÓŁĆ "), "wrzesnia zolc");
        assert_eq!(fold("Październik"), "pazdziernik");
    }

    #[test]
    fn polish_months_include_ocr_variants() {
        let vocabulary = Locale::Polish.vocabulary();
        assert_eq!(vocabulary.month("wrzesnia"), Some(9));
        assert_eq!(vocabulary.month("pozdziernika"), Some(10));
        assert_eq!(vocabulary.month("pa z dziernika"), Some(10));
        assert_eq!(vocabulary.month("september"), None);
    }

    #[test]
    fn weekday_names_follow_locale() {
        assert_eq!(Locale::Polish.vocabulary().weekday_name(Weekday::Fri), "Piątek");
        assert_eq!(Locale::English.vocabulary().weekday_name(Weekday::Mon), "Monday");
    }

    #[test]
    fn folded_weekday_names_are_recognized() {
        let polish = Locale::Polish.vocabulary();
        assert_eq!(polish.weekday("poniedzialek"), Some(Weekday::Mon));
        assert_eq!(polish.weekday("sroda"), Some(Weekday::Wed));
        assert_eq!(polish.weekday("monday"), None);
        assert_eq!(Locale::English.vocabulary().weekday("sunday"), Some(Weekday::Sun));
    }

    #[test]
    fn date_pattern_captures_surrounding_weekday() {
        let pattern = Locale::Polish.vocabulary().date_pattern();

        let leading = pattern.captures("wtorek, 6 wrzesnia bio").expect("date matches");
        assert_eq!(leading.name("lead").map(|found| found.as_str()), Some("wtorek"));
        assert_eq!(leading.name("day").map(|found| found.as_str()), Some("6"));

        let trailing = pattern.captures("12 wrzesnia (piatek)").expect("date matches");
        assert_eq!(trailing.name("trail").map(|found| found.as_str()), Some("piatek"));
    }

    #[test]
    fn date_pattern_accepts_space_separated_numbers() {
        let pattern = Locale::Polish.vocabulary().date_pattern();
        let captures = pattern.captures("16 09 2025 papier").expect("date matches");
        assert_eq!(captures.name("sday").map(|found| found.as_str()), Some("16"));
        assert_eq!(captures.name("smonth").map(|found| found.as_str()), Some("09"));
        assert_eq!(captures.name("syear").map(|found| found.as_str()), Some("2025"));
    }

    #[test]
    fn waste_aliases_prefer_longest_name() {
        assert_eq!(waste_fractions("odpady zielone"), vec![Fraction::Garden]);
        assert_eq!(waste_fractions("bio/organic"), vec![Fraction::Organic]);
        assert_eq!(
            waste_fractions("metale i tworzywa sztuczne"),
            vec![Fraction::Metal, Fraction::Plastic]
        );
    }

    #[test]
    fn waste_aliases_require_whole_words() {
        assert!(waste_fractions("krakowska 1 biologia").is_empty());
        assert!(waste_fractions("wtorek,").is_empty());
    }

    #[test]
    fn locale_parses_from_tags() {
        assert_eq!("PL".parse::<Locale>(), Ok(Locale::Polish));
        assert_eq!("english".parse::<Locale>(), Ok(Locale::English));
        assert!("de".parse::<Locale>().is_err());
    }
}
