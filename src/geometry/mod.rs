pub(crate) mod architecture;
pub(crate) mod cards;
pub(crate) mod region;
pub(crate) mod workflow;

use crate::foundation::core::{ArrowDirection, BoxGeometry};

/// An arrow shape between diagram boxes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConnectorGeometry {
    /// Bounding box of the arrow shape.
    pub bounds: BoxGeometry,
    /// Direction the arrow points.
    pub direction: ArrowDirection,
}

impl ConnectorGeometry {
    /// Build a connector.
    pub fn new(bounds: BoxGeometry, direction: ArrowDirection) -> Self {
        Self { bounds, direction }
    }

    /// The same connector with axes swapped.
    pub fn transposed(&self) -> Self {
        Self {
            bounds: self.bounds.transposed(),
            direction: self.direction.transposed(),
        }
    }
}
