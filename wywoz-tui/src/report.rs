//! Outcome of one schedule lookup, rendered as text or JSON.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use crossterm::style::{Color, Stylize};
use serde::Serialize;
use wywoz_core::model::ResolvedAddress;
use wywoz_core::schedule::ScheduleModel;

#[derive(Debug, Serialize)]
pub(crate) struct Report {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<ResolvedAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TextStyle {
    pub color: bool,
    pub quiet: bool,
}

impl Report {
    pub(crate) fn failure<M: Into<String>>(message: M) -> Self {
        Self {
            success: false,
            message: message.into(),
            timestamp: Local::now(),
            address: None,
            image_path: None,
            schedule: None,
            warning: None,
        }
    }

    pub(crate) fn retrieved(address: ResolvedAddress, image_path: Option<PathBuf>) -> Self {
        Self {
            success: true,
            message: format!("Schedule retrieved for {}", address.display_address),
            timestamp: Local::now(),
            address: Some(address),
            image_path,
            schedule: None,
            warning: None,
        }
    }

    pub(crate) fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the human-readable report; in quiet mode only the collection lines.
    pub(crate) fn write_text<W: Write>(&self, out: &mut W, style: TextStyle) -> io::Result<()> {
        let paint = |text: &str, color: Color| {
            if style.color {
                text.with(color).to_string()
            } else {
                text.to_owned()
            }
        };

        if !self.success {
            return writeln!(out, "{} {}", paint("✗", Color::Red), self.message);
        }

        if !style.quiet {
            writeln!(out, "{} {}", paint("✓", Color::Green), self.message)?;
            if let Some(warning) = &self.warning {
                writeln!(out, "{} {warning}", paint("⚠", Color::Yellow))?;
            }
        }

        if let Some(schedule) = &self.schedule {
            if !style.quiet {
                let title = format!("Schedule for {}", schedule.address().display_address);
                let underline = "=".repeat(title.chars().count());
                writeln!(out)?;
                writeln!(out, "{}", paint(&title, Color::Cyan))?;
                writeln!(out, "{}", paint(&underline, Color::Cyan))?;
                writeln!(out, "Waste types found:")?;
                for fraction in schedule.waste_types() {
                    writeln!(out, "  • {fraction}")?;
                }
                writeln!(out)?;
                writeln!(
                    out,
                    "Collection dates (total: {} collections):",
                    schedule.total_count()
                )?;
            }

            for day in schedule.days() {
                let fractions = day
                    .waste_types
                    .iter()
                    .map(|fraction| fraction.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(
                    out,
                    "  {} ({}) - {fractions}",
                    paint(&day.date.format("%d.%m.%Y").to_string(), Color::Cyan),
                    day.weekday
                )?;
            }
        }

        if !style.quiet
            && let Some(path) = &self.image_path
        {
            writeln!(out)?;
            writeln!(out, "Schedule image saved to: {}", path.display())?;
        }

        Ok(())
    }
}

/// `schedule_<street>_<number>.png`, keeping only characters that are safe in file names.
pub(crate) fn image_file_name(street: &str, number: &str) -> String {
    let safe = |raw: &str| -> String {
        raw.trim()
            .chars()
            .map(|ch| if ch.is_alphanumeric() || ch == '-' { ch } else { '_' })
            .collect()
    };
    format!("schedule_{}_{}.png", safe(street), safe(number))
}

/// Where the image for an address is stored below `output_dir`.
pub(crate) fn image_path(output_dir: &Path, street: &str, number: &str) -> PathBuf {
    output_dir.join(image_file_name(street, number))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use wywoz_core::model::{CollectionRecord, Fraction, HouseNumberEntry, StreetEntry};
    use wywoz_core::vocabulary::Locale;

    use super::*;

    fn address() -> ResolvedAddress {
        ResolvedAddress {
            street: StreetEntry::new("39936", "Krakowska"),
            house_number: HouseNumberEntry::new("840531", "1 DJ"),
            display_address: "Krakowska 1".to_owned(),
        }
    }

    fn report() -> Report {
        let day = |of_month| NaiveDate::from_ymd_opt(2025, 9, of_month).expect("valid test date");
        let mut report = Report::retrieved(address(), Some(PathBuf::from("schedule_Krakowska_1.png")));
        report.schedule = Some(ScheduleModel::build(
            address(),
            vec![
                CollectionRecord::new(day(12), Fraction::Paper, Locale::Polish),
                CollectionRecord::new(day(12), Fraction::Organic, Locale::Polish),
                CollectionRecord::new(day(15), Fraction::Garden, Locale::Polish),
            ],
        ));
        report
    }

    fn text(report: &Report, quiet: bool) -> String {
        let mut out = Vec::new();
        report
            .write_text(&mut out, TextStyle { color: false, quiet })
            .expect("writes to memory");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn file_names_replace_unsafe_characters() {
        assert_eq!(
            image_file_name("Aleja Pokoju", "3c DJ"),
            "schedule_Aleja_Pokoju_3c_DJ.png"
        );
        assert_eq!(image_file_name(" Długa ", "12/3"), "schedule_Długa_12_3.png");
    }

    #[test]
    fn text_lists_one_line_per_day() {
        let output = text(&report(), false);
        assert!(output.contains("✓ Schedule retrieved for Krakowska 1"));
        assert!(output.contains("  12.09.2025 (Piątek) - Bio/Organic, Paper\n"));
        assert!(output.contains("  15.09.2025 (Poniedziałek) - Garden Waste\n"));
        assert!(output.contains("total: 3 collections"));
        assert!(output.contains("Schedule image saved to: schedule_Krakowska_1.png"));
    }

    #[test]
    fn quiet_text_has_only_collections() {
        assert_eq!(
            text(&report(), true),
            "  12.09.2025 (Piątek) - Bio/Organic, Paper\n  15.09.2025 (Poniedziałek) - Garden Waste\n"
        );
    }

    #[test]
    fn failure_is_a_single_line() {
        assert_eq!(
            text(&Report::failure("Street 'Wawelska' not found"), false),
            "✗ Street 'Wawelska' not found\n"
        );
    }

    #[test]
    fn json_carries_schedule_and_omits_empty_fields() {
        let json: serde_json::Value =
            serde_json::from_str(&report().to_json().expect("serializes")).expect("valid json");
        assert_eq!(json["success"], true);
        assert_eq!(json["schedule"]["total_count"], 3);
        assert_eq!(json["schedule"]["records"][2]["waste_type"], "Garden Waste");
        assert_eq!(json["image_path"], "schedule_Krakowska_1.png");
        assert!(json.get("warning").is_none());

        let failure: serde_json::Value =
            serde_json::from_str(&Report::failure("Street 'X' not found").to_json().expect("serializes"))
                .expect("valid json");
        assert_eq!(failure["success"], false);
        assert!(failure.get("schedule").is_none());
    }
}
