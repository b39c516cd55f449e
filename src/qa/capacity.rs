use crate::foundation::error::{DeckError, DeckResult};
use crate::qa::density::DensityMetric;
use crate::spec::model::{SlideContent, SlideSpec};
use std::path::Path;

/// Tunable QA thresholds.
///
/// The coverage fractions and character cutoffs are empirical starting points; every field has
/// a default and any subset can be supplied from a JSON file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QaThresholds {
    /// Inner coverage above which a slide counts as dense.
    pub dense_inner_coverage: f64,
    /// Bottom-band coverage above which content touches the bottom edge.
    pub bottom_band_coverage: f64,

    /// Baseline bullets per slide.
    pub max_bullets: usize,
    /// Total bullet characters that reduce capacity by one.
    pub bullets_dense_total_chars: usize,
    /// Longest-bullet characters that reduce capacity by one.
    pub bullets_dense_max_chars: usize,
    /// Floor after a one-step reduction.
    pub bullets_dense_floor: usize,
    /// Total bullet characters that reduce capacity by two.
    pub bullets_heavy_total_chars: usize,
    /// Longest-bullet characters that reduce capacity by two.
    pub bullets_heavy_max_chars: usize,
    /// Floor after a two-step reduction.
    pub bullets_heavy_floor: usize,

    /// Baseline lines per two-column column.
    pub max_column_lines: usize,
    /// Combined column characters that reduce capacity by one.
    pub columns_dense_total_chars: usize,
    /// Combined column characters that reduce capacity by two.
    pub columns_heavy_total_chars: usize,
    /// Floor for reduced column capacity.
    pub columns_floor: usize,

    /// Baseline workflow steps per slide.
    pub max_steps: usize,
    /// Step capacity on dense slides or long step text.
    pub steps_dense: usize,
    /// Step text characters that count as long.
    pub steps_dense_text_chars: usize,
    /// Step capacity for very long step text.
    pub steps_heavy: usize,
    /// Step text characters that count as very long.
    pub steps_heavy_text_chars: usize,

    /// Baseline KPI cards per slide.
    pub max_cards: usize,
    /// Card capacity on dense slides or when the baseline is exceeded.
    pub cards_dense: usize,
}

impl Default for QaThresholds {
    fn default() -> Self {
        Self {
            dense_inner_coverage: 0.22,
            bottom_band_coverage: 0.10,
            max_bullets: 5,
            bullets_dense_total_chars: 650,
            bullets_dense_max_chars: 170,
            bullets_dense_floor: 3,
            bullets_heavy_total_chars: 900,
            bullets_heavy_max_chars: 220,
            bullets_heavy_floor: 2,
            max_column_lines: 8,
            columns_dense_total_chars: 900,
            columns_heavy_total_chars: 1200,
            columns_floor: 4,
            max_steps: 10,
            steps_dense: 8,
            steps_dense_text_chars: 550,
            steps_heavy: 6,
            steps_heavy_text_chars: 800,
            max_cards: 9,
            cards_dense: 6,
        }
    }
}

impl QaThresholds {
    /// Load thresholds from a JSON object; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> DeckResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read QA thresholds '{}'", path.display()))?;
        serde_json::from_str(&text).map_err(|e| {
            DeckError::serde(format!("invalid QA thresholds '{}': {e}", path.display()))
        })
    }
}

/// Density signals of one slide, derived from its rendered image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DensitySignals {
    /// Inner coverage over threshold.
    pub dense: bool,
    /// Bottom-band coverage over threshold.
    pub touches_bottom: bool,
}

impl DensitySignals {
    /// Signals for a measured slide; absent metrics mean "not dense".
    pub fn from_metric(metric: Option<&DensityMetric>, t: &QaThresholds) -> Self {
        metric.map_or_else(Self::default, |m| Self {
            dense: m.inner_coverage > t.dense_inner_coverage,
            touches_bottom: m.bottom_band_coverage > t.bottom_band_coverage,
        })
    }

    fn any(self) -> bool {
        self.dense || self.touches_bottom
    }
}

/// Non-empty trimmed bullets, the unit bullets slides are split by.
pub(crate) fn kept_bullets(bullets: &[String]) -> Vec<&str> {
    bullets
        .iter()
        .map(|b| b.trim())
        .filter(|b| !b.is_empty())
        .collect()
}

/// Non-empty lines of a two-column column.
pub(crate) fn column_lines(text: &str) -> Vec<&str> {
    text.split('\n').filter(|l| !l.is_empty()).collect()
}

/// Maximum item count the slide may hold; `None` for kinds that are never split.
///
/// Items are bullets, lines per column, workflow steps or KPI cards.
pub fn effective_capacity(
    slide: &SlideSpec,
    signals: DensitySignals,
    t: &QaThresholds,
) -> Option<usize> {
    match &slide.content {
        SlideContent::Bullets { bullets, .. } => {
            let kept = kept_bullets(bullets);
            let total: usize = kept.iter().map(|b| b.chars().count()).sum();
            let longest = kept.iter().map(|b| b.chars().count()).max().unwrap_or(0);

            let mut cap = t.max_bullets;
            let text_dense =
                total > t.bullets_dense_total_chars || longest > t.bullets_dense_max_chars;
            if signals.any() || text_dense {
                cap = t.max_bullets.saturating_sub(1).max(t.bullets_dense_floor);
            }
            if total > t.bullets_heavy_total_chars || longest > t.bullets_heavy_max_chars {
                cap = t.max_bullets.saturating_sub(2).max(t.bullets_heavy_floor);
            }
            Some(cap)
        }
        SlideContent::TwoColumn { left, right, .. } => {
            let total = left.chars().count() + right.chars().count();
            let mut cap = t.max_column_lines;
            if signals.any() || total > t.columns_dense_total_chars {
                cap = t.max_column_lines.saturating_sub(1).max(t.columns_floor);
            }
            if total > t.columns_heavy_total_chars {
                cap = t.max_column_lines.saturating_sub(2).max(t.columns_floor);
            }
            Some(cap)
        }
        SlideContent::Workflow { steps, .. } => {
            let text: usize = steps.iter().map(|s| s.text_len()).sum();
            let mut cap = t.max_steps;
            if signals.any() || text > t.steps_dense_text_chars {
                cap = cap.min(t.steps_dense);
            }
            if text > t.steps_heavy_text_chars {
                cap = cap.min(t.steps_heavy);
            }
            Some(cap)
        }
        SlideContent::KpiCards { cards, .. } => {
            let mut cap = t.max_cards;
            if signals.any() || cards.len() > t.max_cards {
                cap = cap.min(t.cards_dense);
            }
            Some(cap)
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/qa/capacity.rs"]
mod tests;
