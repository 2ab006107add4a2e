//! Data model for outline inference.
//!
//! Inputs ([`Glyph`], [`PageContent`], [`DocumentInfo`]) describe what the
//! rendering collaborator hands over; outputs ([`HeadingCandidate`],
//! [`Outline`]) are what the engine produces.

mod glyph;
mod outline;
mod page;

pub use glyph::Glyph;
pub use outline::{Detector, HeadingCandidate, HeadingLevel, Outline};
pub use page::{DocumentInfo, PageContent};
