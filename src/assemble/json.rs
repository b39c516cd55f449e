use crate::assemble::{DocumentAssembler, DocumentHandle};
use crate::deck::{DeckDocument, ShapeKind};
use crate::foundation::error::{DeckError, DeckResult};
use crate::template::Template;
use std::path::Path;

/// Format tag written at the top of every deck file.
pub const DECK_FORMAT: &str = "deckwright.deck";
/// Current deck file version.
pub const DECK_VERSION: u32 = 1;

#[derive(serde::Serialize)]
struct DeckFileRef<'a> {
    format: &'a str,
    version: u32,
    #[serde(flatten)]
    deck: &'a DeckDocument,
}

#[derive(serde::Deserialize)]
struct DeckFile {
    format: String,
    version: u32,
    #[serde(flatten)]
    deck: DeckDocument,
}

/// Writes the fully resolved deck (layouts, shapes, colors, text) as pretty JSON.
///
/// The output is the hand-off format for a presentation container writer and the input of
/// [`crate::PreviewRenderer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonAssembler<'t> {
    template: Option<&'t Template>,
}

impl<'t> JsonAssembler<'t> {
    /// Assembler checking layout references against `template`.
    pub fn new(template: Option<&'t Template>) -> Self {
        Self { template }
    }

    fn check(&self, deck: &DeckDocument) -> DeckResult<()> {
        if deck.slides.is_empty() {
            return Err(DeckError::assembly("deck has no slides"));
        }
        for (i, slide) in deck.slides.iter().enumerate() {
            let n = i + 1;
            if let Some(index) = slide.layout.index {
                let Some(template) = self.template else {
                    return Err(DeckError::assembly(format!(
                        "slide {n} refers to template layout {index} but no template is loaded"
                    )));
                };
                if template.layout(index).is_none() {
                    return Err(DeckError::assembly(format!(
                        "slide {n} refers to template layout {index}, template has {}",
                        template.layouts.len()
                    )));
                }
            }
            for shape in &slide.shapes {
                let b = shape.bounds;
                if ![b.x, b.y, b.width, b.height].iter().all(|v| v.is_finite()) {
                    return Err(DeckError::assembly(format!(
                        "slide {n} has a shape with non-finite bounds"
                    )));
                }
                if let ShapeKind::Picture { path } = &shape.kind
                    && !path.is_file()
                {
                    return Err(DeckError::assembly(format!(
                        "slide {n} picture '{}' does not exist",
                        path.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

impl DocumentAssembler for JsonAssembler<'_> {
    #[tracing::instrument(skip_all, fields(slides = deck.slides.len()))]
    fn assemble(&self, deck: &DeckDocument) -> DeckResult<DocumentHandle> {
        self.check(deck)?;
        let file = DeckFileRef {
            format: DECK_FORMAT,
            version: DECK_VERSION,
            deck,
        };
        let mut bytes = serde_json::to_vec_pretty(&file)
            .map_err(|e| DeckError::serde(format!("failed to encode deck: {e}")))?;
        bytes.push(b'\n');
        Ok(DocumentHandle::new(bytes, deck.slides.len()))
    }
}

/// Read a deck file written by [`JsonAssembler`].
pub fn read_deck(path: &Path) -> DeckResult<DeckDocument> {
    use anyhow::Context as _;
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read deck '{}'", path.display()))?;
    let file: DeckFile = serde_json::from_slice(&bytes)
        .map_err(|e| DeckError::serde(format!("'{}' is not a deck file: {e}", path.display())))?;
    if file.format != DECK_FORMAT {
        return Err(DeckError::serde(format!(
            "'{}' has format '{}', expected '{DECK_FORMAT}'",
            path.display(),
            file.format
        )));
    }
    if file.version > DECK_VERSION {
        return Err(DeckError::serde(format!(
            "'{}' has deck version {}, newest supported is {DECK_VERSION}",
            path.display(),
            file.version
        )));
    }
    Ok(file.deck)
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/json.rs"]
mod tests;
