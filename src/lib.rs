//! Deckwright turns a declarative slide specification into a laid-out presentation and then
//! improves it using rendered feedback.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: raw JSON -> [`PresentationSpec`] ([`validate`] aggregates every defect)
//! 2. **Plan**: resolve each slide against the template's layouts, compute diagram geometry
//!    and colors -> [`DeckDocument`] ([`DeckPlanner`])
//! 3. **Assemble**: [`DeckDocument`] -> file on disk ([`DocumentAssembler`])
//! 4. **QA** (optional): render snapshots, measure content density, split overloaded slides
//!    and repeat until stable ([`QaLoop`])
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic planning**: the same spec, template and theme always plan the same deck.
//! - **Templates are data**: layouts are chosen by placeholder capabilities, never by assuming
//!   a particular template's layout names.
//! - **QA never fails a run**: a missing or broken renderer only disables density checks.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod assemble;
mod assets;
mod deck;
mod foundation;
mod geometry;
mod layout;
mod qa;
mod render;
mod spec;
mod template;
mod theme;

pub use assemble::json::{DECK_FORMAT, DECK_VERSION, JsonAssembler, read_deck};
pub use assemble::{DocumentAssembler, DocumentHandle, ensure_parent_dir};
pub use assets::{AssetProvider, FsAssetProvider, ImageRequest, image_pixel_size, slugify};
pub use deck::agenda::{AgendaPlan, plan_agenda};
pub use deck::footer::FooterPlan;
pub use deck::plan::DeckPlanner;
pub use deck::{
    ChartPlan, DeckDocument, LayoutRef, Paragraph, PlannedSlide, Shape, ShapeKind, TextAlign,
    normalize_newlines,
};
pub use foundation::core::{
    ArrowDirection, BoxGeometry, EMU_PER_INCH, Point, Rect, Rgb, SlideSize,
};
pub use foundation::error::{DeckError, DeckResult};
pub use geometry::ConnectorGeometry;
pub use geometry::architecture::{ArchitectureLayout, layout_architecture};
pub use geometry::cards::{CardGrid, card_icon_slot, default_columns, layout_cards};
pub use geometry::region::{
    contain, content_region, diagram_region, split_columns, two_column_region,
};
pub use geometry::workflow::{StepLayout, layout_steps, step_header};
pub use layout::resolve::{
    LayoutPins, LayoutResolution, LayoutResolver, ResolutionSource, ResolvedLayout,
    name_candidates,
};
pub use layout::score::score_layout;
pub use qa::capacity::{DensitySignals, QaThresholds, effective_capacity};
pub use qa::density::{DensityMetric, analyze_image, analyze_path};
pub use qa::pipeline::{
    QaLoop, QaOptions, QaOutcome, QaPassState, QaReport, apply_fixes, write_spec,
};
pub use qa::split::{SlideSplit, split_slide};
pub use render::gallery::{GALLERY_FILE, write_gallery};
pub use render::office::{OfficeRenderer, is_on_path};
pub use render::preview::{PreviewRenderer, chars_per_line, wrapped_line_count};
pub use render::{
    SnapshotFormat, SnapshotMethod, SnapshotRenderer, list_snapshots, prepare_out_dir,
    select_renderer, slide_number, sort_by_slide_number,
};
pub use spec::legacy::{adapt_legacy_spec, normalize_legacy_layout};
pub use spec::model::{
    AgendaConfig, AgendaSetting, CardNode, CardsKey, ChartKind, ChartSeries, FooterConfig,
    FooterSetting, LegendPosition, Orientation, PaletteOverride, PresentationSpec, SlideCommon,
    SlideContent, SlideKind, SlideSpec, StepNode,
};
pub use spec::validate::{ConfigIssue, ConfigValidationError, validate, validate_file};
pub use template::Template;
pub use template::capability::{
    Placeholder, PlaceholderCapabilitySet, PlaceholderRole, Position, TemplateLayout,
};
pub use theme::palette::{
    BaseColors, ColorValue, DiagramPalette, FooterPalette, ImagePalette, PaletteScopes,
    PaletteSection, ResolvedColor, SlideColors, ThemeName, ThemeResolver, palette_section,
    parse_rgb,
};
pub use theme::scheme::{ColorRole, ThemeColors, extract_scheme, resolve_theme};
