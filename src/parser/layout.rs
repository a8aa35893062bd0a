//! Content-stream interpretation and line/block layout.
//!
//! Text-showing operators become [`TextSpan`]s carrying position, effective
//! font size and base font name. Spans sharing a baseline form lines; runs of
//! evenly spaced lines of similar size form blocks.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{Page, TextBlock, TextLine, TextSpan};

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// TJ adjustments beyond this many thousandths of an em read as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Leading used by `T*` until `TL` or `TD` sets one.
const DEFAULT_LEADING: f32 = 12.0;

/// Average glyph advance as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;

/// Baseline tolerance for grouping spans, as a fraction of the font size.
const LINE_TOLERANCE: f32 = 0.3;

/// A vertical gap this many times the average spacing starts a new block.
const BLOCK_GAP_FACTOR: f32 = 1.5;

/// A font size change above this many points starts a new block.
const BLOCK_SIZE_CHANGE: f32 = 1.0;

/// Fallback line spacing when a page has fewer than two distinct baselines.
const DEFAULT_LINE_SPACING: f32 = 12.0;

/// Text matrix and line matrix of a `BT`/`ET` object.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    line_e: f32,
    line_f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
        };
    }

    /// Move to the start of the next line, offset from the current line start.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.e = self.line_e + tx * self.a + ty * self.c;
        self.f = self.line_f + tx * self.b + ty * self.d;
        self.line_e = self.e;
        self.line_f = self.f;
    }

    /// Advance along the baseline after showing text.
    fn advance(&mut self, tx: f32) {
        self.e += tx * self.a;
        self.f += tx * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Interprets the text operators of one content stream.
struct ContentInterpreter<'a, F> {
    fonts: &'a HashMap<Vec<u8>, String>,
    decode: F,
    matrix: TextMatrix,
    in_text: bool,
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
    spans: Vec<TextSpan>,
}

impl<'a, F> ContentInterpreter<'a, F>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    fn new(fonts: &'a HashMap<Vec<u8>, String>, decode: F) -> Self {
        Self {
            fonts,
            decode,
            matrix: TextMatrix::default(),
            in_text: false,
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: DEFAULT_LEADING,
            spans: Vec::new(),
        }
    }

    fn run(mut self, ops: &[ContentOp]) -> Vec<TextSpan> {
        for op in ops {
            self.apply(op);
        }
        self.spans
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "BT" => {
                self.in_text = true;
                self.matrix = TextMatrix::default();
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.font_name = self
                        .fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                    self.font_resource = name.clone();
                }
                if let Some(size) = op.number(1) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = op.number(0) {
                    self.leading = leading;
                }
            }
            "Td" | "TD" => {
                let tx = op.number(0).unwrap_or(0.0);
                let ty = op.number(1).unwrap_or(0.0);
                if op.operator == "TD" {
                    self.leading = -ty;
                }
                self.matrix.translate(tx, ty);
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    self.matrix.set(
                        op.number(0).unwrap_or(1.0),
                        op.number(1).unwrap_or(0.0),
                        op.number(2).unwrap_or(0.0),
                        op.number(3).unwrap_or(1.0),
                        op.number(4).unwrap_or(0.0),
                        op.number(5).unwrap_or(0.0),
                    );
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = (self.decode)(self.font_resource.as_slice(), bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let text = self.combine_tj(items);
                    self.show(text);
                }
            }
            "'" | "\"" => {
                self.next_line();
                let index = if op.operator == "\"" { 2 } else { 0 };
                if let Some(PdfValue::Str(bytes)) = op.operands.get(index) {
                    let text = (self.decode)(self.font_resource.as_slice(), bytes);
                    self.show(text);
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self) {
        self.matrix.translate(0.0, -self.leading);
    }

    fn combine_tj(&self, items: &[PdfValue]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    combined.push_str(&(self.decode)(self.font_resource.as_slice(), bytes))
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    // Negative adjustments move the next glyph right.
                    let adjustment = -item.as_number().unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD && needs_space(&combined) {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }

    fn show(&mut self, text: String) {
        if !self.in_text {
            return;
        }
        let chars = text.chars().count() as f32;
        let advance = chars * self.font_size * AVG_CHAR_WIDTH;
        if !text.trim().is_empty() {
            let (x, y) = self.matrix.position();
            let size = self.font_size * self.matrix.vertical_scale();
            let width = chars * size * AVG_CHAR_WIDTH;
            self.spans
                .push(TextSpan::new(text, size, self.font_name.clone()).at(x, y).with_width(width));
        }
        self.matrix.advance(advance);
    }
}

fn needs_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Interpret content-stream operations into spans.
///
/// `fonts` maps font resource names to base font names; `decode` turns a
/// string operand into text given the active font resource.
pub fn interpret_content<F>(ops: &[ContentOp], fonts: &HashMap<Vec<u8>, String>, decode: F) -> Vec<TextSpan>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    ContentInterpreter::new(fonts, decode).run(ops)
}

/// Extract the spans of one page through a backend.
pub fn extract_page_spans(backend: &dyn PdfBackend, page: PageId) -> Result<Vec<TextSpan>> {
    let fonts = backend.page_fonts(page)?;
    let content = backend.page_content(page)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    let ops = backend.decode_content(&content)?;
    Ok(interpret_content(&ops, &fonts, |font, bytes| {
        backend.decode_text(page, font, bytes)
    }))
}

/// Group spans into lines by baseline, top to bottom and left to right.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    // PDF y grows upwards.
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * LINE_TOLERANCE;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(finish_line(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(finish_line(current));
    }
    lines
}

fn finish_line(mut spans: Vec<TextSpan>) -> TextLine {
    spans.sort_by(|a, b| a.x.total_cmp(&b.x));
    TextLine::from_spans(spans)
}

/// Group consecutive lines into blocks.
///
/// A block breaks when the gap to the previous line exceeds
/// `BLOCK_GAP_FACTOR` times the average spacing, or when the font size jumps.
pub fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<TextBlock> {
    let avg_spacing = average_line_spacing(&lines);
    let mut blocks = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        let breaks = current
            .last()
            .map(|prev| should_break_block(prev, &line, avg_spacing))
            .unwrap_or(false);
        if breaks {
            blocks.push(TextBlock::new(std::mem::take(&mut current)));
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(TextBlock::new(current));
    }
    blocks
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y() - w[1].y()).abs())
        .filter(|s| *s > 0.1)
        .collect();
    if spacings.is_empty() {
        return DEFAULT_LINE_SPACING;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    let spacing = (prev.y() - curr.y()).abs();
    spacing > avg_spacing * BLOCK_GAP_FACTOR
        || (prev.max_font_size() - curr.max_font_size()).abs() > BLOCK_SIZE_CHANGE
}

/// Lay out the spans of one page.
pub fn layout_page(number: u32, spans: Vec<TextSpan>) -> Page {
    let lines = group_spans_into_lines(spans);
    log::debug!("page {}: {} lines", number, lines.len());
    let mut page = Page::new(number);
    for block in group_lines_into_blocks(lines) {
        page.add_block(block);
    }
    page
}

/// Characters of scripts written without word spaces (Chinese, Japanese).
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x309F).contains(&code)
        || (0x30A0..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> PdfValue {
        PdfValue::Name(n.as_bytes().to_vec())
    }

    fn string(s: &str) -> PdfValue {
        PdfValue::Str(s.as_bytes().to_vec())
    }

    fn num(n: i64) -> PdfValue {
        PdfValue::Integer(n)
    }

    fn fonts() -> HashMap<Vec<u8>, String> {
        let mut fonts = HashMap::new();
        fonts.insert(b"F1".to_vec(), "Helvetica".to_string());
        fonts.insert(b"F2".to_vec(), "Helvetica-Bold".to_string());
        fonts
    }

    fn run(ops: Vec<ContentOp>) -> Vec<TextSpan> {
        interpret_content(&ops, &fonts(), |_, bytes| {
            String::from_utf8_lossy(bytes).to_string()
        })
    }

    #[test]
    fn test_spans_carry_font_and_position() {
        let spans = run(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F2"), num(18)]),
            ContentOp::new("Td", vec![num(72), num(700)]),
            ContentOp::new("Tj", vec![string("Title")]),
            ContentOp::new("Tf", vec![name("F1"), num(10)]),
            ContentOp::new("Td", vec![num(0), num(-30)]),
            ContentOp::new("Tj", vec![string("Body")]),
            ContentOp::new("ET", vec![]),
        ]);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Title");
        assert_eq!(spans[0].font_name, "Helvetica-Bold");
        assert_eq!(spans[0].font_size, 18.0);
        assert_eq!((spans[0].x, spans[0].y), (72.0, 700.0));
        assert_eq!(spans[1].font_name, "Helvetica");
        assert_eq!((spans[1].x, spans[1].y), (72.0, 670.0));
    }

    #[test]
    fn test_tm_scales_font_size() {
        let spans = run(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(1)]),
            ContentOp::new(
                "Tm",
                vec![num(14), num(0), num(0), num(14), num(50), num(400)],
            ),
            ContentOp::new("Tj", vec![string("Scaled")]),
            ContentOp::new("ET", vec![]),
        ]);
        assert_eq!(spans[0].font_size, 14.0);
        assert_eq!(spans[0].rounded_size(), 14);
    }

    #[test]
    fn test_leading_operators() {
        let spans = run(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(10)]),
            ContentOp::new("TL", vec![num(20)]),
            ContentOp::new("Td", vec![num(0), num(500)]),
            ContentOp::new("Tj", vec![string("one")]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![string("two")]),
            ContentOp::new("'", vec![string("three")]),
            ContentOp::new("TD", vec![num(0), num(-5)]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![string("four")]),
            ContentOp::new("ET", vec![]),
        ]);
        let ys: Vec<f32> = spans.iter().map(|s| s.y).collect();
        assert_eq!(ys, vec![500.0, 480.0, 460.0, 450.0]);
    }

    #[test]
    fn test_tj_kerning_inserts_word_space() {
        let spans = run(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(10)]),
            ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![
                    string("Hello"),
                    num(-250),
                    string("World"),
                    num(-50),
                    string("!"),
                ])],
            ),
            ContentOp::new("ET", vec![]),
        ]);
        assert_eq!(spans[0].text, "Hello World!");
    }

    #[test]
    fn test_no_space_between_cjk() {
        assert!(!needs_space("漢"));
        assert!(needs_space("a"));
        assert!(!needs_space("a "));
        assert!(!needs_space(""));
    }

    #[test]
    fn test_text_outside_bt_and_blank_text_ignored() {
        let spans = run(vec![
            ContentOp::new("Tf", vec![name("F1"), num(10)]),
            ContentOp::new("Tj", vec![string("stray")]),
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tj", vec![string("   ")]),
            ContentOp::new("ET", vec![]),
        ]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_unknown_font_uses_resource_name() {
        let spans = run(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F9"), num(10)]),
            ContentOp::new("Tj", vec![string("x")]),
            ContentOp::new("ET", vec![]),
        ]);
        assert_eq!(spans[0].font_name, "F9");
    }

    #[test]
    fn test_consecutive_shows_advance_x() {
        let spans = run(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(10)]),
            ContentOp::new("Tj", vec![string("ab")]),
            ContentOp::new("Tj", vec![string("cd")]),
            ContentOp::new("ET", vec![]),
        ]);
        assert_eq!(spans[0].x, 0.0);
        assert_eq!(spans[1].x, 10.0);
        assert_eq!(spans[0].width, 10.0);
    }

    fn span(text: &str, size: f32, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, size, "Helvetica").at(x, y)
    }

    #[test]
    fn test_group_spans_into_lines() {
        let lines = group_spans_into_lines(vec![
            span("world", 10.0, 100.0, 700.5),
            span("second", 10.0, 72.0, 686.0),
            span("Hello", 10.0, 72.0, 700.0),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello world");
        assert_eq!(lines[1].text(), "second");
    }

    #[test]
    fn test_group_lines_into_blocks() {
        let lines = group_spans_into_lines(vec![
            span("Heading", 18.0, 72.0, 720.0),
            span("line one", 10.0, 72.0, 700.0),
            span("line two", 10.0, 72.0, 688.0),
            span("line three", 10.0, 72.0, 676.0),
            span("after gap", 10.0, 72.0, 600.0),
        ]);
        let blocks = group_lines_into_blocks(lines);
        let texts: Vec<String> = blocks.iter().map(|b| b.text()).collect();
        assert_eq!(
            texts,
            vec![
                "Heading".to_string(),
                "line one\nline two\nline three".to_string(),
                "after gap".to_string(),
            ]
        );
    }

    #[test]
    fn test_layout_page() {
        let page = layout_page(3, vec![span("only", 12.0, 0.0, 0.0)]);
        assert_eq!(page.number, 3);
        assert_eq!(page.blocks.len(), 1);
        assert!(layout_page(1, Vec::new()).blocks.is_empty());
    }
}
