//! Line grouping: clusters positioned glyphs into text rows.

use crate::model::Glyph;

/// Glyphs sharing one vertical band of a page, ordered left to right.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    glyphs: Vec<&'a Glyph>,
}

impl<'a> Line<'a> {
    fn from_glyphs(mut glyphs: Vec<&'a Glyph>) -> Self {
        // Glyphs within tolerance can arrive with slightly different tops;
        // reading order inside the band is left to right.
        glyphs.sort_by(|a, b| a.x0.total_cmp(&b.x0));
        Self { glyphs }
    }

    /// The glyphs of this line.
    pub fn glyphs(&self) -> &[&'a Glyph] {
        &self.glyphs
    }

    /// Concatenated glyph text.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.text.as_str()).collect()
    }

    /// Mean font size over sized glyphs, `None` when no glyph is sized.
    pub fn average_size(&self) -> Option<f32> {
        let (sum, count) = self
            .glyphs
            .iter()
            .filter(|g| g.is_sized())
            .fold((0.0f32, 0usize), |(sum, count), g| (sum + g.size, count + 1));
        (count > 0).then(|| sum / count as f32)
    }

    /// Left edge of the first glyph.
    pub fn x0(&self) -> f32 {
        self.glyphs.first().map(|g| g.x0).unwrap_or(0.0)
    }

    /// Left edge of the last glyph.
    pub fn x1(&self) -> f32 {
        self.glyphs.last().map(|g| g.x0).unwrap_or(0.0)
    }

    /// Smallest upper edge in the line.
    pub fn top(&self) -> f32 {
        self.glyphs.iter().map(|g| g.top).fold(f32::INFINITY, f32::min)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Group a page's glyphs into lines.
///
/// Glyphs are ordered by `(top, x0)`; a glyph whose `top` lies within
/// `tolerance` of the current line's representative offset joins that line
/// and becomes its new representative, anything further away starts a new
/// line. A page without glyphs yields no lines.
pub fn group_lines(glyphs: &[Glyph], tolerance: f32) -> Vec<Line<'_>> {
    if glyphs.is_empty() {
        return vec![];
    }

    let mut sorted: Vec<&Glyph> = glyphs.iter().collect();
    sorted.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x0.total_cmp(&b.x0)));

    let mut lines = Vec::new();
    let mut current: Vec<&Glyph> = Vec::new();
    let mut current_top: Option<f32> = None;

    for glyph in sorted {
        match current_top {
            Some(top) if (glyph.top - top).abs() <= tolerance => {}
            Some(_) => {
                lines.push(Line::from_glyphs(std::mem::take(&mut current)));
            }
            None => {}
        }
        current_top = Some(glyph.top);
        current.push(glyph);
    }

    if !current.is_empty() {
        lines.push(Line::from_glyphs(current));
    }

    lines
}
