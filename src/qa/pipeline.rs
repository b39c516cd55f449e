use crate::assemble::{DocumentAssembler, ensure_parent_dir};
use crate::deck::DeckDocument;
use crate::deck::plan::DeckPlanner;
use crate::foundation::error::{DeckError, DeckResult};
use crate::qa::capacity::{DensitySignals, QaThresholds, effective_capacity};
use crate::qa::density::{DensityMetric, analyze_path};
use crate::qa::split::split_slide;
use crate::render::gallery::write_gallery;
use crate::render::{
    SnapshotFormat, SnapshotMethod, SnapshotRenderer, select_renderer, slide_number,
};
use crate::spec::model::PresentationSpec;
use std::path::{Path, PathBuf};

/// Change lines logged per pass before the rest are elided.
const LOGGED_CHANGES: usize = 12;

/// Knobs for one QA run.
#[derive(Clone, Debug)]
pub struct QaOptions {
    /// Pass budget; values below 1 run one pass.
    pub max_passes: usize,
    /// Capacity and density thresholds.
    pub thresholds: QaThresholds,
    /// Where snapshots are written each pass.
    pub snapshots_dir: PathBuf,
    /// Snapshot image format.
    pub format: SnapshotFormat,
    /// Renderer selection.
    pub method: SnapshotMethod,
    /// Write an `index.html` next to the snapshots.
    pub gallery: bool,
    /// Where the adjusted spec goes when anything changed.
    pub config_out: Option<PathBuf>,
}

impl Default for QaOptions {
    fn default() -> Self {
        Self {
            max_passes: 2,
            thresholds: QaThresholds::default(),
            snapshots_dir: PathBuf::from("slides"),
            format: SnapshotFormat::default(),
            method: SnapshotMethod::default(),
            gallery: false,
            config_out: None,
        }
    }
}

impl QaOptions {
    /// Defaults with snapshots in `<stem>-slides` and the adjusted spec in `<stem>.qa.json`,
    /// both next to `output`.
    pub fn for_output(output: &Path) -> Self {
        let dir = output.parent().map(Path::to_path_buf).unwrap_or_default();
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "deck".to_owned());
        Self {
            snapshots_dir: dir.join(format!("{stem}-slides")),
            config_out: Some(dir.join(format!("{stem}.qa.json"))),
            ..Self::default()
        }
    }
}

/// Mutable state carried from one pass to the next.
#[derive(Clone, Debug, PartialEq)]
pub struct QaPassState {
    /// Spec being refined.
    pub spec: PresentationSpec,
    /// Changes applied by the most recent pass.
    pub last_changes: usize,
    /// Density of each spec slide from the most recent render, by spec position.
    pub metrics: Vec<Option<DensityMetric>>,
}

/// Summary of a QA run.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct QaReport {
    /// Passes executed, not counting the final re-render.
    pub passes: usize,
    /// A pass finished without changes.
    pub converged: bool,
    /// Change lines, one list per pass.
    pub changes: Vec<Vec<String>>,
    /// Metrics of the emitted document, by spec slide.
    pub final_metrics: Vec<Option<DensityMetric>>,
}

impl QaReport {
    /// Changes applied over the whole run.
    pub fn total_changes(&self) -> usize {
        self.changes.iter().map(Vec::len).sum()
    }
}

/// Result of [`QaLoop::run`].
#[derive(Clone, Debug)]
pub struct QaOutcome {
    /// Final pass state; `state.spec` is the adjusted spec.
    pub state: QaPassState,
    /// Run summary.
    pub report: QaReport,
    /// The emitted document.
    pub document: PathBuf,
}

/// Split every slide that exceeds its effective capacity. Returns the change lines.
///
/// `metrics` is indexed by spec position; missing entries count as "not dense", so text
/// length alone can still trigger splits.
pub fn apply_fixes(
    spec: &mut PresentationSpec,
    metrics: &[Option<DensityMetric>],
    thresholds: &QaThresholds,
) -> Vec<String> {
    let mut changes = Vec::new();
    let mut slides = Vec::with_capacity(spec.slides.len());
    for (i, slide) in std::mem::take(&mut spec.slides).into_iter().enumerate() {
        let metric = metrics.get(i).and_then(Option::as_ref);
        let signals = DensitySignals::from_metric(metric, thresholds);
        let split = effective_capacity(&slide, signals, thresholds)
            .and_then(|cap| split_slide(&slide, cap));
        match split {
            Some(split) => {
                changes.push(split.change);
                slides.extend(split.slides);
            }
            None => slides.push(slide),
        }
    }
    spec.slides = slides;
    changes
}

/// Write `spec` as pretty JSON in its authored wrapped or flat shape.
pub fn write_spec(path: &Path, spec: &PresentationSpec, wrapped: bool) -> DeckResult<()> {
    ensure_parent_dir(path)?;
    let mut text = serde_json::to_string_pretty(&spec.to_value(wrapped))
        .map_err(|e| DeckError::serde(e.to_string()))?;
    text.push('\n');
    use anyhow::Context as _;
    std::fs::write(path, text)
        .with_context(|| format!("failed to write adjusted spec '{}'", path.display()))?;
    Ok(())
}

/// Attach each snapshot's metric to the spec slide it was planned from.
///
/// Snapshots are matched to output slides by the number in their file name, falling back to
/// their position; synthesized slides (agenda) have no spec slide and are skipped.
fn metrics_by_source(
    deck: &DeckDocument,
    spec_len: usize,
    images: &[PathBuf],
) -> Vec<Option<DensityMetric>> {
    let mut out = vec![None; spec_len];
    for (pos, image) in images.iter().enumerate() {
        let number = slide_number(image).map_or(pos, |n| (n as usize).saturating_sub(1));
        let Some(src) = deck.slides.get(number).and_then(|s| s.source_index) else {
            continue;
        };
        if let Some(slot) = out.get_mut(src) {
            *slot = analyze_path(image);
        }
    }
    out
}

/// The render-measure-repair loop.
pub struct QaLoop<'a> {
    planner: &'a DeckPlanner<'a>,
    assembler: &'a dyn DocumentAssembler,
    renderer: Option<&'a dyn SnapshotRenderer>,
    options: QaOptions,
}

impl<'a> QaLoop<'a> {
    /// Loop picking its renderer from `options.method`.
    pub fn new(
        planner: &'a DeckPlanner<'a>,
        assembler: &'a dyn DocumentAssembler,
        options: QaOptions,
    ) -> Self {
        Self {
            planner,
            assembler,
            renderer: None,
            options,
        }
    }

    /// Use `renderer` instead of the one `options.method` selects.
    pub fn with_renderer(mut self, renderer: &'a dyn SnapshotRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &QaOptions {
        &self.options
    }

    /// Run the loop on `spec`, writing the document to `output`.
    ///
    /// Assembly failures abort the run. Render failures only cost that pass its metrics.
    #[tracing::instrument(skip_all, fields(max_passes = self.options.max_passes))]
    pub fn run(
        &self,
        spec: PresentationSpec,
        wrapped: bool,
        output: &Path,
    ) -> DeckResult<QaOutcome> {
        let mut state = QaPassState {
            spec,
            last_changes: 0,
            metrics: Vec::new(),
        };
        let mut report = QaReport::default();
        let mut document = output.to_path_buf();

        for pass in 1..=self.options.max_passes.max(1) {
            report.passes = pass;
            let (saved, metrics) = self.build_and_measure(&state.spec, output)?;
            document = saved;
            state.metrics = metrics;

            let changes = apply_fixes(&mut state.spec, &state.metrics, &self.options.thresholds);
            state.last_changes = changes.len();
            if changes.is_empty() {
                report.converged = true;
                report.changes.push(changes);
                if pass == 1 {
                    tracing::info!("QA: no layout fixes needed");
                } else {
                    tracing::info!(pass, "QA: stabilized");
                }
                break;
            }

            tracing::info!(pass, changes = changes.len(), "QA: applied layout fixes");
            for line in changes.iter().take(LOGGED_CHANGES) {
                tracing::info!("  {line}");
            }
            if changes.len() > LOGGED_CHANGES {
                tracing::info!("  ... {} more", changes.len() - LOGGED_CHANGES);
            }
            report.changes.push(changes);
        }

        // The emitted document must reflect the last fix.
        if state.last_changes > 0 {
            let (saved, metrics) = self.build_and_measure(&state.spec, output)?;
            document = saved;
            state.metrics = metrics;
        }
        report.final_metrics = state.metrics.clone();

        if report.total_changes() > 0
            && let Some(path) = &self.options.config_out
        {
            write_spec(path, &state.spec, wrapped)?;
            tracing::info!(path = %path.display(), "QA: wrote adjusted spec");
        }

        Ok(QaOutcome {
            state,
            report,
            document,
        })
    }

    fn build_and_measure(
        &self,
        spec: &PresentationSpec,
        output: &Path,
    ) -> DeckResult<(PathBuf, Vec<Option<DensityMetric>>)> {
        let deck = self.planner.plan(spec);
        let handle = self.assembler.assemble(&deck)?;
        let saved = self.assembler.save(handle, output)?;

        let selected;
        let renderer: &dyn SnapshotRenderer = match self.renderer {
            Some(r) => r,
            None => {
                selected = select_renderer(self.options.method, &saved);
                &*selected
            }
        };
        let rendered = renderer.render(&saved, &self.options.snapshots_dir, self.options.format);
        let metrics = match rendered {
            Ok(images) => {
                if self.options.gallery
                    && let Err(e) = write_gallery(&self.options.snapshots_dir, &images)
                {
                    tracing::warn!("QA: gallery not written: {e}");
                }
                metrics_by_source(&deck, spec.slides.len(), &images)
            }
            Err(e) => {
                tracing::warn!("QA: snapshots unavailable, skipping density checks: {e}");
                vec![None; spec.slides.len()]
            }
        };
        Ok((saved, metrics))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/qa/pipeline.rs"]
mod tests;
