//! Positioned text-fragment extraction from page content streams.
//!
//! Walks the operators that determine where text is shown — the text
//! object (BT/ET), font selection (Tf), leading (TL), and the text/line
//! matrix operators (Tm, Td, TD, T*) — and records one [`TextFragment`]
//! per show operator (Tj, ', ", TJ) at the pre-advance matrix position.
//! Everything else in the stream (paths, images, color, XObjects) is
//! ignored.
//!
//! The result is a fully materialized `Vec<TextFragment>` per page; no
//! visitor callbacks.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use linestamp_core::TextFragment;

use crate::error::StampError;

/// The subset of the PDF text matrix model that determines string
/// placement: the text matrix and the text line matrix, as 2x3 affine
/// matrices `[a b c d e f]`.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    text: [f64; 6],
    line: [f64; 6],
}

const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

impl TextMatrix {
    fn new() -> Self {
        Self {
            text: IDENTITY,
            line: IDENTITY,
        }
    }

    /// Tm: set both matrices to the given values.
    fn set(&mut self, m: [f64; 6]) {
        self.text = m;
        self.line = m;
    }

    /// Td: translate the line matrix by (tx, ty) and restart the text
    /// matrix from it.
    fn translate(&mut self, tx: f64, ty: f64) {
        let [a, b, c, d, e, f] = self.line;
        self.line = [a, b, c, d, tx * a + ty * c + e, tx * b + ty * d + f];
        self.text = self.line;
    }

    /// Current origin of the text matrix (where the next glyph lands).
    fn position(&self) -> (f64, f64) {
        (self.text[4], self.text[5])
    }
}

/// Convert a numeric operand (Integer or Real) to f64.
fn operand_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(*f as f64),
        _ => None,
    }
}

fn get_f64(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(operand_to_f64)
}

/// Decode a content-stream string through the current font's encoding.
///
/// Falls back to a byte-wise Latin-1 interpretation when the font is
/// unknown or its encoding cannot be resolved; positions matter more
/// than perfect glyph fidelity here.
fn decode_string(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    font_name: &[u8],
    bytes: &[u8],
) -> String {
    if let Some(font) = fonts.get(font_name) {
        if let Ok(encoding) = font.get_font_encoding(doc) {
            if let Ok(text) = Document::decode_text(&encoding, bytes) {
                return text;
            }
        }
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// Extract the positioned text fragments of one page.
///
/// Fragments come back in content-stream order, not reading order; the
/// caller is expected to hand them to [`linestamp_core::group_lines`].
/// A page with no text produces an empty vector, which is not an error
/// at this level.
pub fn extract_fragments(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Vec<TextFragment>, StampError> {
    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| StampError::Parse(format!("failed to read page content: {e}")))?;
    let content = Content::decode(&content_data)
        .map_err(|e| StampError::Parse(format!("failed to decode content stream: {e}")))?;

    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();

    let mut fragments = Vec::new();
    let mut matrix = TextMatrix::new();
    let mut in_text = false;
    let mut font_name: Vec<u8> = Vec::new();
    let mut leading = 0.0_f64;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                matrix = TextMatrix::new();
            }
            "ET" => in_text = false,
            "Tf" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    font_name = name.clone();
                }
            }
            "TL" => {
                if let Some(l) = get_f64(&op.operands, 0) {
                    leading = l;
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    let mut m = IDENTITY;
                    for (i, slot) in m.iter_mut().enumerate() {
                        if let Some(v) = get_f64(&op.operands, i) {
                            *slot = v;
                        }
                    }
                    matrix.set(m);
                }
            }
            "Td" => {
                let tx = get_f64(&op.operands, 0).unwrap_or(0.0);
                let ty = get_f64(&op.operands, 1).unwrap_or(0.0);
                matrix.translate(tx, ty);
            }
            "TD" => {
                let tx = get_f64(&op.operands, 0).unwrap_or(0.0);
                let ty = get_f64(&op.operands, 1).unwrap_or(0.0);
                leading = -ty;
                matrix.translate(tx, ty);
            }
            "T*" => matrix.translate(0.0, -leading),
            "Tj" => {
                if in_text {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        push_fragment(&mut fragments, &matrix, doc, &fonts, &font_name, bytes);
                    }
                }
            }
            "'" => {
                if in_text {
                    matrix.translate(0.0, -leading);
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        push_fragment(&mut fragments, &matrix, doc, &fonts, &font_name, bytes);
                    }
                }
            }
            "\"" => {
                // Operands: word spacing, char spacing, string. Spacing
                // does not move the line start, so only the string matters.
                if in_text {
                    matrix.translate(0.0, -leading);
                    if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                        push_fragment(&mut fragments, &matrix, doc, &fonts, &font_name, bytes);
                    }
                }
            }
            "TJ" => {
                if in_text {
                    if let Some(Object::Array(elements)) = op.operands.first() {
                        // One fragment per operator: the kerning numbers
                        // between strings shift glyphs, not the baseline.
                        let mut combined = String::new();
                        for element in elements {
                            if let Object::String(bytes, _) = element {
                                combined.push_str(&decode_string(doc, &fonts, &font_name, bytes));
                            }
                        }
                        if !combined.is_empty() {
                            let (x, y) = matrix.position();
                            fragments.push(TextFragment::new(x, y, combined));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(fragments)
}

fn push_fragment(
    fragments: &mut Vec<TextFragment>,
    matrix: &TextMatrix,
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    font_name: &[u8],
    bytes: &[u8],
) {
    let text = decode_string(doc, fonts, font_name, bytes);
    if text.is_empty() {
        return;
    }
    let (x, y) = matrix.position();
    fragments.push(TextFragment::new(x, y, text));
}
