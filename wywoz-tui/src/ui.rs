use chrono::{Local, NaiveDate};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use wywoz_core::model::Fraction;
use wywoz_core::schedule::ScheduleModel;

use crate::app::{App, Field, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    draw_at(frame, app, Local::now().date_naive());
}

fn draw_at(frame: &mut Frame<'_>, app: &App, today: NaiveDate) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let header_text = if app.city.is_empty() {
        "wywoz – waste collection schedules".to_owned()
    } else {
        format!("wywoz – waste collection schedules for {}", app.city)
    };
    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).title("Wywóz"));
    frame.render_widget(header, *header_area);

    match (app.screen, &app.schedule) {
        (Screen::ScheduleView, Some(schedule)) => {
            draw_schedule_view(frame, app, schedule, today, *content_area);
        }
        _ => draw_address_input(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::AddressInput => {
            "Type to edit · Tab switch field · Enter load schedule · Esc/Ctrl-C quit"
        }
        Screen::ScheduleView => "Esc/←/b edit address · r reload · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_address_input(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // street
            Constraint::Length(3), // house number
            Constraint::Min(0),    // hint
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [street_area, number_area, hint_area] = chunks else {
        return;
    };

    let field = |value: &str, title: &'static str, focused: bool| {
        let border_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Paragraph::new(value.to_owned()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
    };

    frame.render_widget(
        field(&app.street_input, "Street", app.focus == Field::Street),
        *street_area,
    );
    frame.render_widget(
        field(&app.number_input, "House number", app.focus == Field::Number),
        *number_area,
    );

    let mut hint = vec![Line::from(
        "Enter a street and house number, e.g. Krakowska and 1, then press Enter.",
    )];
    if let Some(path) = &app.image_path {
        hint.push(Line::from(format!(
            "Last schedule image: {}",
            path.display()
        )));
    }
    let hint = Paragraph::new(hint)
        .block(Block::default().borders(Borders::ALL).title("Address"))
        .wrap(Wrap { trim: true });
    frame.render_widget(hint, *hint_area);
}

fn draw_schedule_view(
    frame: &mut Frame<'_>,
    app: &App,
    schedule: &ScheduleModel,
    today: NaiveDate,
    area: Rect,
) {
    let title = format!(
        "Schedule for {} ({} collections)",
        schedule.address().display_address,
        schedule.total_count()
    );

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [table_area, footer_area] = chunks else {
        return;
    };

    if schedule.is_empty() {
        let paragraph = Paragraph::new("No collections were found in the schedule image.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *table_area);
        return;
    }

    let rows = schedule.days().into_iter().map(|day| {
        let date = day.date.format("%d.%m.%Y").to_string();
        let relative = relative_day_label(day.date, today);
        let label = day
            .waste_types
            .iter()
            .map(|fraction| fraction.label())
            .collect::<Vec<_>>()
            .join(", ");

        let color = day
            .waste_types
            .first()
            .map_or(Color::Reset, |fraction| fraction_color(*fraction));
        let mut style = Style::default().fg(color);
        if day.date <= today {
            style = style.add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(date),
            Cell::from(day.weekday),
            Cell::from(relative),
            Cell::from(label),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Length(12),
        Constraint::Length(13),
        Constraint::Length(12),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Date", "Day", "In", "Waste types"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    frame.render_widget(table, *table_area);

    if let Some(path) = &app.image_path {
        let footer = Paragraph::new(format!("Image: {}", path.display()))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(footer, *footer_area);
    }
}

fn fraction_color(fraction: Fraction) -> Color {
    match fraction {
        Fraction::Residual => Color::Gray,
        Fraction::Organic => Color::Rgb(150, 90, 40),
        Fraction::Paper => Color::Blue,
        Fraction::Plastic => Color::Yellow,
        Fraction::Glass => Color::Cyan,
        Fraction::Metal => Color::LightBlue,
        Fraction::Garden => Color::Green,
        Fraction::Bulky => Color::Magenta,
        Fraction::Selective => Color::LightYellow,
    }
}

fn relative_day_label(date: NaiveDate, today: NaiveDate) -> String {
    let delta = (date - today).num_days();
    match delta {
        0 => "today".to_owned(),
        1 => "tomorrow".to_owned(),
        days if days > 1 => format!("in {days} days"),
        -1 => "yesterday".to_owned(),
        days => format!("{} days ago", days.abs()),
    }
}
