//! lopdf-backed document source.
//!
//! Interprets each page's content stream just far enough to place text:
//! graphics state (`q`/`Q`/`cm`), text state (`BT`/`ET`/`Tf`/`TL`) and
//! positioning (`Td`/`TD`/`Tm`/`T*`), and the show operators
//! (`Tj`/`TJ`/`'`/`"`). Every shown character becomes one [`Glyph`]; glyph
//! widths are not read from the font, so each character advances by half the
//! effective font size.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};
use unicode_normalization::UnicodeNormalization;

use super::backend::{decode_text_simple, DocumentSource};
use crate::analysis::group_lines;
use crate::detect::{sniff_bytes, sniff_path, PdfHeader};
use crate::error::{Error, Result};
use crate::model::{DocumentInfo, Glyph, PageContent};

/// Share of the font size assumed above the baseline.
const ASCENT: f32 = 0.8;
/// Assumed character advance, as a share of the font size.
const ADVANCE: f32 = 0.5;
/// TJ adjustments beyond this (thousandths of an em) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;
/// Vertical tolerance for rebuilding page text from glyphs; matches the
/// engine's default line tolerance.
const TEXT_LINE_TOLERANCE: f32 = 3.0;
/// US Letter, used when a page declares no MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Ligatures that fonts commonly emit as single code points.
const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// A PDF document opened for outline inference.
pub struct PdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    header: PdfHeader,
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_path(path)?;
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc, header))
    }

    /// Open a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc, header))
    }

    /// Open a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument, header: PdfHeader) -> Self {
        let pages = doc.get_pages();
        log::debug!("Opened {} with {} pages", header, pages.len());
        Self { doc, pages, header }
    }

    /// PDF version from the file header.
    pub fn version(&self) -> &str {
        &self.header.version
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_id(&self, number: u32) -> Result<ObjectId> {
        self.pages
            .get(&number)
            .copied()
            .ok_or(Error::PageOutOfRange(number, self.pages.len() as u32))
    }

    /// The trailer's Info dictionary, if present.
    fn info_dictionary(&self) -> Option<&Dictionary> {
        match self.doc.trailer.get(b"Info").ok()? {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    fn info_string(&self, key: &[u8]) -> Option<String> {
        let value = match self.info_dictionary()?.get(key).ok()? {
            Object::Reference(id) => self.doc.get_object(*id).ok()?,
            other => other,
        };
        match value {
            Object::String(bytes, _) => Some(decode_text_simple(bytes)),
            Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
        .map(|s| s.trim_matches('\0').to_string())
    }

    /// `[llx, lly, urx, ury]` of a page, inherited through the page tree.
    fn media_box(&self, page_id: ObjectId) -> [f32; 4] {
        let mut current = self.doc.get_dictionary(page_id).ok();
        while let Some(dict) = current {
            if let Some(values) = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|obj| self.resolve_numbers(obj))
            {
                if let [llx, lly, urx, ury, ..] = values[..] {
                    return [llx.min(urx), lly.min(ury), llx.max(urx), lly.max(ury)];
                }
            }
            current = dict
                .get(b"Parent")
                .ok()
                .and_then(|p| p.as_reference().ok())
                .and_then(|id| self.doc.get_dictionary(id).ok());
        }
        DEFAULT_MEDIA_BOX
    }

    fn resolve_numbers(&self, obj: &Object) -> Option<Vec<f32>> {
        let array = match obj {
            Object::Array(arr) => arr,
            Object::Reference(id) => self.doc.get_object(*id).ok()?.as_array().ok()?,
            _ => return None,
        };
        array.iter().map(get_number).collect()
    }

    /// Raw (decompressed) content stream bytes, concatenating arrays.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without contents is blank, not broken.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Stream(s) => Ok(stream_bytes(s)),
                Object::Array(arr) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    content.extend_from_slice(&stream_bytes(s));
                    content.push(b'\n');
                }
            }
        }
        content
    }

    /// Interpret a page's content stream into glyphs.
    fn page_glyphs(&self, page_id: ObjectId, media_box: [f32; 4]) -> Result<Vec<Glyph>> {
        let content = self.page_content(page_id)?;
        if content.is_empty() {
            return Ok(vec![]);
        }
        let content = lopdf::content::Content::decode(&content)?;
        let fonts = self.doc.get_page_fonts(page_id)?;

        let mut state = TextState::new(media_box[3]);
        let mut font: Option<&Dictionary> = None;

        for op in content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => state.save(),
                "Q" => state.restore(),
                "cm" => {
                    if let Some(m) = matrix_operands(operands) {
                        state.ctm = m.multiply(&state.ctm);
                    }
                }
                "BT" => state.begin_text(),
                "ET" => state.in_text = false,
                "Tf" => {
                    if let [Object::Name(name), size, ..] = &operands[..] {
                        font = fonts.get(name).copied();
                        state.font_size = get_number(size).unwrap_or(state.font_size);
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if let [tx, ty, ..] = &operands[..] {
                        let tx = get_number(tx).unwrap_or(0.0);
                        let ty = get_number(ty).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_operands(operands) {
                        state.line_matrix = m;
                        state.text_matrix = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        let text = self.decode(font, bytes);
                        state.show(&text);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        for item in items {
                            match item {
                                Object::String(bytes, _) => {
                                    let text = self.decode(font, bytes);
                                    state.show(&text);
                                }
                                other => {
                                    if let Some(adjust) = get_number(other) {
                                        state.adjust(adjust);
                                    }
                                }
                            }
                        }
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let text_index = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = operands.get(text_index) {
                        let text = self.decode(font, bytes);
                        state.show(&text);
                    }
                }
                _ => {}
            }
        }

        Ok(state.glyphs)
    }

    /// Decode a shown string with the current font's encoding.
    fn decode(&self, font: Option<&Dictionary>, bytes: &[u8]) -> String {
        font.and_then(|f| f.get_font_encoding(&self.doc).ok())
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }

    /// Plain text of a page: lopdf's extraction, or glyph-derived lines when
    /// that yields nothing.
    fn page_text(&self, number: u32, glyphs: &[Glyph]) -> String {
        match self.doc.extract_text(&[number]) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => lines_from_glyphs(glyphs),
            Err(e) => {
                log::debug!("Text extraction failed on page {}: {}", number, e);
                lines_from_glyphs(glyphs)
            }
        }
    }
}

impl DocumentSource for PdfSource {
    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            title: self.info_string(b"Title"),
            author: self.info_string(b"Author"),
            creator: self.info_string(b"Creator"),
            producer: self.info_string(b"Producer"),
            page_count: self.page_count(),
        }
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<PageContent> {
        let page_id = self.page_id(number)?;
        let media_box = self.media_box(page_id);
        let glyphs = self.page_glyphs(page_id, media_box)?;
        let text = self.page_text(number, &glyphs);

        Ok(PageContent {
            number,
            width: media_box[2] - media_box[0],
            height: media_box[3] - media_box[1],
            glyphs,
            text,
        })
    }
}

/// Affine matrix `[a b c d e f]` as used throughout PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f32, ty: f32) -> Self {
        Matrix {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Vertical scale factor.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text and graphics state needed to position shown characters.
struct TextState {
    ctm: Matrix,
    saved: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font_size: f32,
    leading: f32,
    in_text: bool,
    page_top: f32,
    glyphs: Vec<Glyph>,
}

impl TextState {
    fn new(page_top: f32) -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font_size: 12.0,
            leading: 0.0,
            in_text: false,
            page_top,
            glyphs: Vec::new(),
        }
    }

    fn save(&mut self) {
        self.saved.push(self.ctm);
    }

    fn restore(&mut self) {
        if let Some(ctm) = self.saved.pop() {
            self.ctm = ctm;
        }
    }

    fn begin_text(&mut self) {
        self.in_text = true;
        self.text_matrix = Matrix::IDENTITY;
        self.line_matrix = Matrix::IDENTITY;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Horizontal advance in unscaled text space.
    fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
    }

    /// TJ positioning adjustment, in thousandths of text space.
    fn adjust(&mut self, amount: f32) {
        let gap = -amount;
        if gap > TJ_SPACE_THRESHOLD
            && self
                .glyphs
                .last()
                .map(|g| !g.text.trim().is_empty())
                .unwrap_or(false)
        {
            self.push_char(" ");
        }
        self.advance(gap / 1000.0 * self.font_size);
    }

    fn show(&mut self, text: &str) {
        if !self.in_text {
            return;
        }
        for c in normalize_run(text).chars() {
            if c.is_control() {
                continue;
            }
            self.push_char(&c.to_string());
        }
    }

    fn push_char(&mut self, text: &str) {
        let rendering = self.text_matrix.multiply(&self.ctm);
        let size = self.font_size.abs() * rendering.vertical_scale();
        let baseline = rendering.f;
        let top = self.page_top - (baseline + size * ASCENT);

        self.glyphs.push(Glyph {
            text: text.to_string(),
            x0: rendering.e,
            top,
            bottom: top + size,
            size,
        });
        self.advance(self.font_size.abs() * ADVANCE);
    }
}

/// Decompressed stream data; unfiltered streams are returned as stored.
fn stream_bytes(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

fn matrix_operands(operands: &[Object]) -> Option<Matrix> {
    let numbers: Vec<f32> = operands.iter().take(6).map(get_number).collect::<Option<_>>()?;
    match numbers[..] {
        [a, b, c, d, e, f] => Some(Matrix { a, b, c, d, e, f }),
        _ => None,
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// NFC-normalize a decoded run and expand typographic ligatures.
fn normalize_run(text: &str) -> String {
    let composed: String = text.nfc().collect();
    let mut result = String::with_capacity(composed.len());
    for c in composed.chars() {
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, expanded)) => result.push_str(expanded),
            None => result.push(c),
        }
    }
    result
}

fn lines_from_glyphs(glyphs: &[Glyph]) -> String {
    group_lines(glyphs, TEXT_LINE_TOLERANCE)
        .iter()
        .map(|line| line.text())
        .collect::<Vec<_>>()
        .join("\n")
}
