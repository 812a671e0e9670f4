//! Terminal UI and scripted command line for Kraków waste collection schedules.

mod app;
mod input;
mod report;
mod ui;

use std::io::{self, IsTerminal as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{Result, ensure};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tokio::fs;
use tracing_subscriber::EnvFilter;
use wywoz_core::config::PipelineConfig;
use wywoz_core::service::WywozService;
use wywoz_core::vocabulary::Locale;
use wywoz_provider_krakow as krakow;
use wywoz_recognizer_tesseract::TesseractRecognizer;

use crate::app::{App, split_address};
use crate::input::Action;
use crate::report::{Report, TextStyle, image_path};

#[derive(Debug, Parser)]
#[command(name = "wywoz", version)]
#[command(about = "Waste collection schedules for Kraków addresses")]
struct Cli {
    /// Street name; together with a house number the lookup runs once without the TUI
    #[arg(short, long)]
    street: Option<String>,

    /// House number, e.g. `1` or `3c`
    #[arg(short, long)]
    number: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Print only the collection dates
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored text output
    #[arg(long)]
    no_color: bool,

    /// Directory the schedule image is saved to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Do not save the schedule image
    #[arg(long)]
    no_save: bool,

    /// Minimum street similarity in [0, 1]
    #[arg(long)]
    threshold: Option<f64>,

    /// Minimum OCR confidence in [0, 1]
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Language of the schedule image (`pl` or `en`)
    #[arg(long)]
    locale: Option<Locale>,

    /// Tesseract executable
    #[arg(long, env = "WYWOZ_TESSERACT", default_value = "tesseract")]
    tesseract: String,

    /// Tesseract language models, joined with `+`
    #[arg(long, env = "WYWOZ_OCR_LANGUAGES", default_value = "pol+eng")]
    ocr_languages: String,
}

impl Cli {
    /// Street and number for a one-off lookup, when both are known.
    fn address(&self) -> Option<(String, String)> {
        let street = self.street.as_deref()?.trim();
        match self.number.as_deref().map(str::trim) {
            Some(number) if !street.is_empty() && !number.is_empty() => {
                Some((street.to_owned(), number.to_owned()))
            }
            Some(_) => None,
            None => split_address(street),
        }
    }

    fn save_dir(&self) -> Option<&Path> {
        (!self.no_save).then_some(self.output_dir.as_path())
    }

    fn apply_overrides(&self, mut config: PipelineConfig) -> Result<PipelineConfig> {
        if let Some(threshold) = self.threshold {
            ensure!(
                (0.0..=1.0).contains(&threshold),
                "--threshold must be between 0 and 1"
            );
            config.street_threshold = threshold;
        }
        if let Some(min_confidence) = self.min_confidence {
            ensure!(
                (0.0..=1.0).contains(&min_confidence),
                "--min-confidence must be between 0 and 1"
            );
            config.min_confidence = min_confidence;
        }
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = cli.apply_overrides(PipelineConfig::from_env()?)?;

    let client = Client::builder()
        .user_agent(concat!("wywoz/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let recognizer = TesseractRecognizer::new()
        .with_program(cli.tesseract.as_str())
        .with_languages(cli.ocr_languages.as_str());
    let service = WywozService::new(krakow::plugin(client), Arc::new(recognizer), config);

    if let Some((street, number)) = cli.address() {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(service.config().log_level.as_str()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .init();

        let report = lookup(&service, &street, &number, cli.save_dir()).await;
        let mut stdout = io::stdout().lock();
        if cli.json {
            writeln!(stdout, "{}", report.to_json()?)?;
        } else {
            let style = TextStyle {
                color: !cli.no_color && stdout.is_terminal(),
                quiet: cli.quiet,
            };
            report.write_text(&mut stdout, style)?;
        }

        return Ok(if report.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // App state
    let app = App::new(cli.street.as_deref(), cli.number.as_deref())
        .with_city(service.city().name.as_str());

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, &service, cli.save_dir()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.map(|()| ExitCode::SUCCESS)
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    service: &WywozService,
    output_dir: Option<&Path>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::LoadSchedule => {
                    let (street, number) = match app.submission() {
                        Ok(address) => address,
                        Err(hint) => {
                            app.error_message = Some(hint.to_owned());
                            continue;
                        }
                    };

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let report = lookup(service, &street, &number, output_dir).await;
                    app.apply(report);
                }
            }
        }
    }

    Ok(())
}

/// Resolve the address, save its schedule image, and read the collection dates from it.
///
/// A schedule image that yields no dates is still a success; the report then carries a warning.
async fn lookup(
    service: &WywozService,
    street: &str,
    number: &str,
    output_dir: Option<&Path>,
) -> Report {
    let address = match service.resolve_address(street, number).await {
        Ok(address) => address,
        Err(err) => return Report::failure(err.to_string()),
    };

    let image = match service.schedule_image(&address).await {
        Ok(image) => image,
        Err(err) => {
            let mut report = Report::failure(format!("Failed to fetch schedule image: {err}"));
            report.address = Some(address);
            return report;
        }
    };

    let saved = match output_dir {
        Some(dir) => save_image(dir, &address.street.name, number, &image)
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "could not save schedule image"))
            .ok(),
        None => None,
    };

    let mut report = Report::retrieved(address.clone(), saved);
    match service
        .read_schedule(address, &image, Local::now().date_naive())
        .await
    {
        Ok(schedule) => report.schedule = Some(schedule),
        Err(err) => {
            report.warning = Some(format!("Could not read collection dates: {err}"));
        }
    }
    report
}

async fn save_image(dir: &Path, street: &str, number: &str, image: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = image_path(dir, street, number);
    fs::write(&path, image).await?;
    tracing::info!(path = %path.display(), "saved schedule image");
    Ok(path)
}
