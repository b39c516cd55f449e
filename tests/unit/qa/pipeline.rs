use super::*;
use crate::assemble::json::{JsonAssembler, read_deck};
use crate::assets::FsAssetProvider;
use crate::spec::validate::validate;
use crate::theme::palette::{ThemeName, ThemeResolver};
use crate::theme::scheme::ThemeColors;
use image::{Rgb as Px, RgbImage};
use serde_json::{Value, json};

/// Always fails, like a machine without an office install.
struct Unavailable;

impl SnapshotRenderer for Unavailable {
    fn render(&self, _: &Path, _: &Path, _: SnapshotFormat) -> DeckResult<Vec<PathBuf>> {
        Err(DeckError::render("no renderer"))
    }
}

/// Blank white snapshots, except one output slide that is mostly covered.
struct Synthetic {
    dense_slide: u32,
}

impl SnapshotRenderer for Synthetic {
    fn render(
        &self,
        document: &Path,
        out_dir: &Path,
        format: SnapshotFormat,
    ) -> DeckResult<Vec<PathBuf>> {
        let deck = read_deck(document)?;
        std::fs::create_dir_all(out_dir).map_err(|e| DeckError::render(e.to_string()))?;
        (1..=deck.slides.len() as u32)
            .map(|n| {
                let img = RgbImage::from_fn(240, 135, |x, y| {
                    let inside = (30..210).contains(&x) && (20..115).contains(&y);
                    if n == self.dense_slide && inside {
                        Px([20, 20, 20])
                    } else {
                        Px([255, 255, 255])
                    }
                });
                let path = out_dir.join(format!("Slide{n}.{}", format.extension()));
                img.save(&path).map_err(|e| DeckError::render(e.to_string()))?;
                Ok(path)
            })
            .collect()
    }
}

fn twelve_bullets() -> Value {
    json!({
        "presentation": {
            "title": "Review",
            "slides": [
                {"layout": "title", "title": "Review"},
                {"layout": "bullets", "title": "Roadmap",
                 "bullets": (1..=12).map(|i| format!("Item {i}")).collect::<Vec<_>>()}
            ]
        }
    })
}

fn run_with(
    raw: &Value,
    renderer: &dyn SnapshotRenderer,
    dir: &Path,
    configure: impl FnOnce(&mut QaOptions),
) -> QaOutcome {
    let (spec, wrapped) = validate(raw).unwrap();
    let theme = ThemeResolver::new(ThemeName::Dark, ThemeColors::default());
    let assets = FsAssetProvider::default();
    let planner = DeckPlanner::new(None, &theme, &assets);
    let assembler = JsonAssembler::default();
    let output = dir.join("deck.json");
    let mut options = QaOptions::for_output(&output);
    configure(&mut options);
    QaLoop::new(&planner, &assembler, options)
        .with_renderer(renderer)
        .run(spec, wrapped, &output)
        .unwrap()
}

#[test]
fn overloaded_bullets_split_then_converge() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = run_with(&twelve_bullets(), &Unavailable, dir.path(), |_| {});

    assert_eq!(outcome.report.passes, 2);
    assert!(outcome.report.converged);
    assert_eq!(
        outcome.report.changes,
        vec![vec!["Split bullets slide 'Roadmap' into 3 slides".to_owned()], vec![]]
    );
    assert_eq!(outcome.state.spec.slides.len(), 4);
    assert_eq!(outcome.state.last_changes, 0);
    assert_eq!(outcome.report.final_metrics, vec![None; 4]);

    let deck = read_deck(&outcome.document).unwrap();
    assert_eq!(deck.slides.len(), 4);

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("deck.qa.json")).unwrap())
            .unwrap();
    let slides = written["presentation"]["slides"].as_array().unwrap();
    assert_eq!(slides.len(), 4);
    assert_eq!(slides[3]["title"], json!("Roadmap (3/3)"));
}

#[test]
fn budget_exhausted_still_renders_the_last_fix() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = run_with(&twelve_bullets(), &Unavailable, dir.path(), |o| {
        o.max_passes = 1;
        o.config_out = None;
    });
    assert_eq!(outcome.report.passes, 1);
    assert!(!outcome.report.converged);
    assert_eq!(outcome.state.last_changes, 1);
    assert_eq!(read_deck(&outcome.document).unwrap().slides.len(), 4);
    assert!(!dir.path().join("deck.qa.json").exists());
}

#[test]
fn unchanged_specs_are_not_written_back() {
    let dir = tempfile::tempdir().unwrap();
    let raw = json!({"slides": [{"layout": "bullets", "title": "Short", "bullets": ["a", "b"]}]});
    let outcome = run_with(&raw, &Unavailable, dir.path(), |_| {});
    assert_eq!(outcome.report.passes, 1);
    assert!(outcome.report.converged);
    assert_eq!(outcome.report.total_changes(), 0);
    assert!(!dir.path().join("deck.qa.json").exists());
}

#[test]
fn metrics_follow_source_slides_past_the_agenda() {
    let dir = tempfile::tempdir().unwrap();
    let five = ["one", "two", "three", "four", "five"];
    let raw = json!({
        "agenda": true,
        "slides": [
            {"layout": "title", "title": "Deck"},
            {"layout": "bullets", "title": "A", "bullets": five},
            {"layout": "bullets", "title": "B", "bullets": five}
        ]
    });
    // Output order is title, agenda, A, B; slide 3 is A.
    let outcome = run_with(&raw, &Synthetic { dense_slide: 3 }, dir.path(), |o| o.max_passes = 1);

    assert_eq!(
        outcome.report.changes[0],
        vec!["Split bullets slide 'A' into 2 slides".to_owned()]
    );
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("deck.qa.json")).unwrap())
            .unwrap();
    assert_eq!(written["agenda"], json!(true));
    assert!(written.get("presentation").is_none());
}

#[test]
fn preview_snapshots_feed_metrics_and_gallery() {
    let dir = tempfile::tempdir().unwrap();
    let raw = json!({"slides": [
        {"layout": "title", "title": "Deck"},
        {"layout": "bullets", "title": "Few", "bullets": ["a", "b", "c"]}
    ]});
    let preview = crate::render::preview::PreviewRenderer::default();
    let outcome = run_with(&raw, &preview, dir.path(), |o| o.gallery = true);

    assert!(outcome.report.converged);
    assert_eq!(outcome.report.final_metrics.len(), 2);
    assert!(outcome.report.final_metrics.iter().all(Option::is_some));
    let snaps = dir.path().join("deck-slides");
    assert!(snaps.join("Slide1.png").is_file());
    assert!(snaps.join("index.html").is_file());
}

#[test]
fn apply_fixes_leaves_fitting_slides_in_place() {
    let (mut spec, _) = validate(&twelve_bullets()).unwrap();
    let changes = apply_fixes(&mut spec, &[], &QaThresholds::default());
    assert_eq!(changes.len(), 1);
    assert_eq!(spec.slides[0].title_text(), Some("Review"));
    assert_eq!(spec.slides[1].title_text(), Some("Roadmap"));
    assert_eq!(spec.slides[2].title_text(), Some("Roadmap (2/3)"));
}

#[test]
fn output_defaults_sit_next_to_the_document() {
    let o = QaOptions::for_output(Path::new("out/talk.json"));
    assert_eq!(o.snapshots_dir, PathBuf::from("out/talk-slides"));
    assert_eq!(o.config_out, Some(PathBuf::from("out/talk.qa.json")));
    assert_eq!(o.max_passes, 2);
}
