//! Text recognizer running the `tesseract` CLI and reading its TSV output.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use wywoz_core::{
    ports::{PortError, TextRecognizer},
    region::{BoundingBox, TextRegion},
};

const DEFAULT_PROGRAM: &str = "tesseract";
/// Schedules are Polish; English covers the occasional Latin-only header.
const DEFAULT_LANGUAGES: &str = "pol+eng";
/// TSV `level` of a single recognized word.
const WORD_LEVEL: u32 = 5;

/// Recognizer shelling out to `tesseract <stdin> <stdout> -l <languages> tsv`.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    program: String,
    languages: String,
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_owned(),
            languages: DEFAULT_LANGUAGES.to_owned(),
        }
    }
}

impl TesseractRecognizer {
    /// Recognizer using the `tesseract` binary on `PATH` with Polish and English models.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another executable, e.g. an absolute path.
    #[must_use]
    pub fn with_program<P: Into<String>>(mut self, program: P) -> Self {
        self.program = program.into();
        self
    }

    /// Use other language models, in tesseract's `pol+eng` notation.
    #[must_use]
    pub fn with_languages<L: Into<String>>(mut self, languages: L) -> Self {
        self.languages = languages.into();
        self
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<TextRegion>, PortError> {
        let mut child = Command::new(&self.program)
            .args(["stdin", "stdout", "-l", &self.languages, "tsv"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(image).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(program = %self.program, status = %output.status, "tesseract failed");
            return Err(PortError::Recognition(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let regions = parse_tsv(&tsv);
        tracing::debug!(lines = regions.len(), "tesseract recognized text lines");
        Ok(regions)
    }
}

/// One word row of tesseract's TSV output.
struct WordRow<'tsv> {
    line_key: (u32, u32, u32, u32),
    bounding_box: BoundingBox,
    confidence: f32,
    text: &'tsv str,
}

impl<'tsv> WordRow<'tsv> {
    /// Parse a data row; `None` for headers, non-word levels, and empty words.
    fn parse(row: &'tsv str) -> Option<Self> {
        let mut fields = row.split('\t');
        let [level, page, block, paragraph, line, _word, left, top, width, height] = {
            let mut number = || fields.next()?.trim().parse::<u32>().ok();
            [
                number()?,
                number()?,
                number()?,
                number()?,
                number()?,
                number()?,
                number()?,
                number()?,
                number()?,
                number()?,
            ]
        };

        let confidence = fields.next()?.trim().parse::<f32>().ok()?;
        let text = fields.next().unwrap_or_default().trim();
        if level != WORD_LEVEL || text.is_empty() || confidence < 0.0 {
            return None;
        }

        Some(Self {
            line_key: (page, block, paragraph, line),
            bounding_box: BoundingBox::from_rect(
                pixels(left),
                pixels(top),
                pixels(width),
                pixels(height),
            ),
            confidence: confidence / 100.0,
            text,
        })
    }
}

fn pixels(value: u32) -> f32 {
    u16::try_from(value).map_or(f32::from(u16::MAX), f32::from)
}

/// Fold word rows into one region per text line: joined words, enclosing box, mean confidence.
fn parse_tsv(tsv: &str) -> Vec<TextRegion> {
    let mut lines: Vec<((u32, u32, u32, u32), Vec<WordRow<'_>>)> = Vec::new();

    for word in tsv.lines().filter_map(WordRow::parse) {
        match lines.iter_mut().find(|(key, _)| *key == word.line_key) {
            Some((_, words)) => words.push(word),
            None => lines.push((word.line_key, vec![word])),
        }
    }

    lines
        .into_iter()
        .filter_map(|(_, words)| {
            let (first, rest) = words.split_first()?;
            let bounding_box = rest
                .iter()
                .fold(first.bounding_box, |acc, word| acc.union(&word.bounding_box));
            let text = words
                .iter()
                .map(|word| word.text)
                .collect::<Vec<_>>()
                .join(" ");
            let total: f32 = words.iter().map(|word| word.confidence).sum();
            let count = u16::try_from(words.len()).map_or(f32::from(u16::MAX), f32::from);
            let confidence = (total / count).clamp(0.0, 1.0);
            Some(TextRegion::new(text, bounding_box, confidence))
        })
        .collect()
}
