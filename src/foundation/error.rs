use crate::spec::validate::ConfigValidationError;

/// Convenience result type used across deckwright.
pub type DeckResult<T> = Result<T, DeckError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    /// The presentation spec failed validation; carries every collected defect.
    #[error(transparent)]
    Config(#[from] ConfigValidationError),

    /// The template could not be read or is structurally unusable.
    #[error("template error: {0}")]
    Template(String),

    /// The document assembler could not produce or persist output.
    #[error("assembly error: {0}")]
    Assembly(String),

    /// The snapshot renderer is unavailable or failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeckError {
    /// Build a [`DeckError::Template`] value.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    /// Build a [`DeckError::Assembly`] value.
    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly(msg.into())
    }

    /// Build a [`DeckError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DeckError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
