use std::path::PathBuf;

use wywoz_core::schedule::ScheduleModel;

use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    AddressInput,
    ScheduleView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Street,
    Number,
}

pub(crate) struct App {
    pub city: String,
    pub screen: Screen,
    pub focus: Field,
    pub street_input: String,
    pub number_input: String,

    pub schedule: Option<ScheduleModel>,
    pub image_path: Option<PathBuf>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(street: Option<&str>, number: Option<&str>) -> Self {
        let street_input = street.unwrap_or_default().to_owned();
        let focus = if street_input.is_empty() {
            Field::Street
        } else {
            Field::Number
        };
        Self {
            city: String::new(),
            screen: Screen::AddressInput,
            focus,
            street_input,
            number_input: number.unwrap_or_default().to_owned(),
            schedule: None,
            image_path: None,
            is_loading: false,
            error_message: None,
        }
    }

    /// Name of the city whose addresses are looked up, shown in the header.
    pub(crate) fn with_city<S: Into<String>>(mut self, city: S) -> Self {
        self.city = city.into();
        self
    }

    pub(crate) fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Field::Street => &mut self.street_input,
            Field::Number => &mut self.number_input,
        }
    }

    pub(crate) fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Street => Field::Number,
            Field::Number => Field::Street,
        };
    }

    /// Street and number to look up; a number typed after the street is accepted too.
    pub(crate) fn submission(&self) -> Result<(String, String), &'static str> {
        let street = self.street_input.trim();
        let number = self.number_input.trim();
        if street.is_empty() {
            return Err("Type a street name first");
        }
        if !number.is_empty() {
            return Ok((street.to_owned(), number.to_owned()));
        }
        split_address(street).ok_or("Type a house number (Tab switches fields)")
    }

    pub(crate) fn apply(&mut self, report: Report) {
        self.is_loading = false;
        self.image_path = report.image_path;

        match report.schedule {
            Some(schedule) => {
                self.schedule = Some(schedule);
                self.error_message = report.warning;
                self.screen = Screen::ScheduleView;
            }
            None => {
                self.schedule = None;
                self.error_message = Some(match report.warning {
                    Some(warning) => format!("{}: {warning}", report.message),
                    None => report.message,
                });
            }
        }
    }
}

/// Split `Krakowska 1` into street and house number when the last word carries a digit.
pub(crate) fn split_address(input: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let (last, street_parts) = parts.split_last()?;

    let has_number = last.chars().any(|ch| ch.is_ascii_digit()) && !street_parts.is_empty();
    has_number.then(|| (street_parts.join(" "), (*last).to_owned()))
}
