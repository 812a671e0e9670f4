//! Confidence filtering and reading-order reconstruction for recognized regions.

use crate::config::PipelineConfig;
use crate::region::TextRegion;

/// Turns unordered recognizer output into a top-to-bottom, left-to-right sequence.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleImageDecoder {
    min_confidence: f32,
    row_tolerance: f32,
}

impl Default for ScheduleImageDecoder {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl ScheduleImageDecoder {
    /// Decoder dropping regions below `min_confidence`.
    #[must_use]
    pub fn new(min_confidence: f32) -> Self {
        Self {
            min_confidence,
            row_tolerance: PipelineConfig::default().row_tolerance,
        }
    }

    /// Decoder using the thresholds from `config`.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            row_tolerance: config.row_tolerance,
        }
    }

    /// Filter `regions` by confidence and return copies in reading order.
    #[must_use]
    pub fn order(&self, regions: &[TextRegion]) -> Vec<TextRegion> {
        let mut kept: Vec<&TextRegion> = regions
            .iter()
            .filter(|region| region.confidence >= self.min_confidence)
            .filter(|region| !region.text.trim().is_empty())
            .collect();

        kept.sort_by(|left, right| {
            left.bounding_box
                .top
                .total_cmp(&right.bounding_box.top)
                .then(left.bounding_box.left.total_cmp(&right.bounding_box.left))
        });

        let mut rows: Vec<Row<'_>> = Vec::new();
        for region in kept {
            let slack = self.row_tolerance * region.bounding_box.height();
            match rows.last_mut() {
                Some(row) if region.bounding_box.center_y() <= row.bottom + slack => {
                    row.members.push(region);
                }
                _ => rows.push(Row {
                    bottom: region.bounding_box.bottom,
                    members: vec![region],
                }),
            }
        }

        rows.into_iter()
            .flat_map(|mut row| {
                row.members.sort_by(|left, right| {
                    left.bounding_box.left.total_cmp(&right.bounding_box.left)
                });
                row.members
            })
            .cloned()
            .collect()
    }
}

/// Regions sharing a visual line; the extent is fixed by the row's first region.
struct Row<'regions> {
    bottom: f32,
    members: Vec<&'regions TextRegion>,
}
