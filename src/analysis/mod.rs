//! The outline inference engine.
//!
//! Leaves first: [`lines`] groups glyphs into rows, [`fonts`] summarises the
//! document's font sizes, [`classifier`] turns lines and plain text into
//! heading candidates, [`title`] picks the document title, and [`refine`]
//! cleans the candidates into the final heading list.

pub mod classifier;
pub mod fonts;
pub mod lines;
pub mod refine;
mod text;
pub mod title;

pub use classifier::{FontDetector, HeadingDetector, PatternDetector};
pub use fonts::FontProfile;
pub use lines::{group_lines, Line};
pub use refine::{CandidateRefiner, RawCandidate};
pub use title::TitleSelector;
