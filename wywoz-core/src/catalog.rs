//! Street and house-number enumerations with best-match lookup.

use std::cmp::Ordering;

use crate::model::{HouseNumberEntry, StreetEntry};
use crate::vocabulary::fold;

/// Score given to a query that is a substring of the street name, before length bonus.
const CONTAINED_BASE_SCORE: f64 = 0.75;
/// Scale applied to plain string similarity so it never ties with an exact match.
const SIMILARITY_SCALE: f64 = 0.9;

#[derive(Debug, Clone, Default)]
/// Streets returned by the address source for one query.
pub struct StreetCatalog {
    entries: Vec<StreetEntry>,
}

#[derive(Debug, Clone, Copy)]
/// Best street candidate and its similarity score.
pub struct StreetMatch<'catalog> {
    /// Matched entry.
    pub entry: &'catalog StreetEntry,
    /// Similarity in `[0, 1]`; `1.0` is an exact match.
    pub score: f64,
}

impl StreetCatalog {
    /// Wrap the entries returned by the source.
    #[must_use]
    pub fn new(entries: Vec<StreetEntry>) -> Self {
        Self { entries }
    }

    /// All entries in source order.
    #[must_use]
    pub fn entries(&self) -> &[StreetEntry] {
        &self.entries
    }

    /// Number of streets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no streets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest-scoring street for `query`, ties going to the shortest name.
    ///
    /// Comparison ignores case and Polish diacritics.
    #[must_use]
    pub fn best_match(&self, query: &str) -> Option<StreetMatch<'_>> {
        let folded_query = fold(query);
        if folded_query.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .map(|entry| {
                let folded_name = fold(&entry.name);
                let score = street_score(&folded_query, &folded_name);
                (entry, folded_name, score)
            })
            .min_by(|left, right| {
                right
                    .2
                    .total_cmp(&left.2)
                    .then(left.1.chars().count().cmp(&right.1.chars().count()))
                    .then_with(|| left.1.cmp(&right.1))
                    .then_with(|| left.0.id.cmp(&right.0.id))
            })
            .map(|(entry, _, score)| StreetMatch { entry, score })
    }

    /// Best match if it scores at least `threshold`.
    #[must_use]
    pub fn find(&self, query: &str, threshold: f64) -> Option<StreetMatch<'_>> {
        self.best_match(query)
            .filter(|candidate| candidate.score >= threshold)
    }
}

fn street_score(query: &str, name: &str) -> f64 {
    if query == name {
        return 1.0;
    }

    if name.contains(query) {
        let coverage = ratio(query.chars().count(), name.chars().count());
        return CONTAINED_BASE_SCORE + (1.0 - CONTAINED_BASE_SCORE) * coverage;
    }

    strsim::jaro_winkler(query, name) * SIMILARITY_SCALE
}

fn ratio(part: usize, whole: usize) -> f64 {
    let part = u32::try_from(part).unwrap_or(u32::MAX);
    let whole = u32::try_from(whole).unwrap_or(u32::MAX).max(1);
    f64::from(part) / f64::from(whole)
}

#[derive(Debug, Clone, Default)]
/// House-number variants of one street.
pub struct HouseNumberCatalog {
    entries: Vec<HouseNumberEntry>,
}

impl HouseNumberCatalog {
    /// Wrap the entries returned by the source.
    #[must_use]
    pub fn new(entries: Vec<HouseNumberEntry>) -> Self {
        Self { entries }
    }

    /// All entries in source order.
    #[must_use]
    pub fn entries(&self) -> &[HouseNumberEntry] {
        &self.entries
    }

    /// Whether the catalog has no house numbers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry matching the number as typed by a user.
    ///
    /// An exact label wins. A bare number picks the primary variant of that number:
    /// entries without a letter suffix first, then without a source code, then by
    /// label and id. A number with a letter suffix also matches labels carrying a
    /// trailing source code, so `3c` finds `3c DJ`.
    #[must_use]
    pub fn find(&self, raw: &str) -> Option<&HouseNumberEntry> {
        let wanted = fold(raw);
        if wanted.is_empty() {
            return None;
        }

        let exact = self
            .entries
            .iter()
            .filter(|entry| fold(&entry.label) == wanted)
            .min_by(|left, right| left.id.cmp(&right.id));
        if exact.is_some() {
            return exact;
        }

        let input = HouseNumberParts::parse(raw)?;
        let same_number: Vec<(&HouseNumberEntry, HouseNumberParts)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                HouseNumberParts::parse(&entry.label)
                    .filter(|parts| parts.number == input.number)
                    .map(|parts| (entry, parts))
            })
            .collect();

        fn pick<'entry>(
            candidates: Vec<&(&'entry HouseNumberEntry, HouseNumberParts)>,
        ) -> Option<&'entry HouseNumberEntry> {
            candidates
                .into_iter()
                .min_by(|left, right| rank(left, right))
                .map(|(entry, _)| *entry)
        }

        match &input.letter {
            Some(letter) => pick(
                same_number
                    .iter()
                    .filter(|(_, parts)| parts.letter.as_ref() == Some(letter))
                    .collect(),
            ),
            None => {
                let plain: Vec<_> = same_number
                    .iter()
                    .filter(|(_, parts)| parts.letter.is_none())
                    .collect();
                if plain.is_empty() {
                    pick(same_number.iter().collect())
                } else {
                    pick(plain)
                }
            }
        }
    }
}

fn rank(
    left: &(&HouseNumberEntry, HouseNumberParts),
    right: &(&HouseNumberEntry, HouseNumberParts),
) -> Ordering {
    let (left_entry, left_parts) = left;
    let (right_entry, right_parts) = right;
    left_parts
        .letter
        .is_some()
        .cmp(&right_parts.letter.is_some())
        .then(left_parts.code.is_some().cmp(&right_parts.code.is_some()))
        .then_with(|| fold(&left_entry.label).cmp(&fold(&right_entry.label)))
        .then_with(|| left_entry.id.cmp(&right_entry.id))
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A house-number label split into number, letter suffix, and trailing source code.
struct HouseNumberParts {
    number: u32,
    letter: Option<String>,
    code: Option<String>,
}

impl HouseNumberParts {
    /// Split a label such as `3c DJ` into `3`, `c`, `dj`.
    ///
    /// A lone letter after a space is the suffix too, so `3 C DJ` splits the same way.
    fn parse(label: &str) -> Option<Self> {
        let folded = fold(label);
        let digits: String = folded.chars().take_while(char::is_ascii_digit).collect();
        let number = digits.parse::<u32>().ok()?;

        let rest: String = folded.chars().skip(digits.chars().count()).collect();
        let mut letter: String = rest.chars().take_while(|ch| ch.is_alphabetic()).collect();
        let mut code = rest
            .chars()
            .skip(letter.chars().count())
            .collect::<String>()
            .trim()
            .to_owned();

        if letter.is_empty() {
            let (head, tail) = code.split_once(' ').unwrap_or((code.as_str(), ""));
            let mut head_chars = head.chars();
            if let (Some(single), None) = (head_chars.next(), head_chars.next())
                && single.is_alphabetic()
            {
                letter = single.to_string();
                code = tail.trim().to_owned();
            }
        }

        Some(Self {
            number,
            letter: (!letter.is_empty()).then_some(letter),
            code: (!code.is_empty()).then_some(code),
        })
    }
}
