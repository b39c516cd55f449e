//! Render-measure-repair loop.
//!
//! Each pass assembles the current spec, renders it, measures how much of every slide is
//! covered by content, and splits slides that hold more items than their effective capacity.
//! The loop stops when a pass changes nothing or the pass budget runs out.

pub(crate) mod capacity;
pub(crate) mod density;
pub(crate) mod pipeline;
pub(crate) mod split;
