//! Plain-text PDF writer.
//!
//! Lays out paragraphs on A4 pages with the built-in Helvetica font, the way
//! a simple report generator would: fixed margins, fixed line height,
//! word-wrapping to the page width, and a page break once the next line
//! would cross the bottom margin.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

const MM_TO_PT: f32 = 72.0 / 25.4;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 10.0;
const CELL_PADDING_MM: f32 = 1.0;
const FONT_SIZE_PT: f32 = 12.0;

const FONT_NAME: Name<'static> = Name(b"F1");

/// Helvetica advance widths for the printable ASCII range (32..=126), in
/// thousandths of an em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];
const DEFAULT_WIDTH: u16 = 556;

fn char_width(c: char) -> f32 {
    let units = match c as u32 {
        code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
        _ => DEFAULT_WIDTH,
    };
    units as f32 * FONT_SIZE_PT / 1000.0
}

fn text_width(text: &str) -> f32 {
    text.chars().map(char_width).sum()
}

/// Map a character to its WinAnsiEncoding byte, or `?` if it has none.
fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

fn encode(line: &str) -> Vec<u8> {
    line.chars().map(win_ansi_byte).collect()
}

/// Break a paragraph into lines no wider than `max_width` points.
///
/// Explicit newlines always start a new line. Lines break at the last space
/// that fits; a word wider than a whole line is split between characters.
/// An empty paragraph yields a single empty line.
pub fn wrap_paragraph(text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let segment = segment.replace('\t', "    ");
        let mut current = String::new();
        let mut width = 0.0;
        // Byte offset in `current` just after the last space
        let mut last_space: Option<usize> = None;

        for c in segment.chars() {
            let w = char_width(c);
            if width + w > max_width && !current.is_empty() {
                // Carry the partial word after the last space onto the next line
                let carry = match last_space {
                    Some(split) if c != ' ' => current.split_off(split),
                    _ => String::new(),
                };
                lines.push(current.trim_end().to_string());
                current = carry;
                last_space = None;
                width = text_width(&current);
                if width + w > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    width = 0.0;
                }
                if c == ' ' && current.is_empty() {
                    continue;
                }
            }
            current.push(c);
            width += w;
            if c == ' ' {
                last_space = Some(current.len());
            }
        }

        lines.push(current);
    }

    lines
}

struct Layout {
    pages: Vec<Vec<(f32, String)>>,
}

impl Layout {
    /// Place lines top to bottom, returning the baseline (in PDF points from
    /// the bottom edge) for every line on every page.
    fn new(paragraphs: &[String]) -> Self {
        let text_width_pt = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM - 2.0 * CELL_PADDING_MM) * MM_TO_PT;
        let page_break_at = PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM;
        let font_size_mm = FONT_SIZE_PT / MM_TO_PT;

        let mut pages = vec![Vec::new()];
        let mut y = MARGIN_MM;

        for paragraph in paragraphs {
            for line in wrap_paragraph(paragraph, text_width_pt) {
                if y + LINE_HEIGHT_MM > page_break_at {
                    pages.push(Vec::new());
                    y = MARGIN_MM;
                }
                // Vertically centre the text in its cell
                let baseline_mm = y + 0.5 * LINE_HEIGHT_MM + 0.3 * font_size_mm;
                let baseline_pt = (PAGE_HEIGHT_MM - baseline_mm) * MM_TO_PT;
                if let Some(page) = pages.last_mut() {
                    page.push((baseline_pt, line));
                }
                y += LINE_HEIGHT_MM;
            }
        }

        Self { pages }
    }
}

/// Render paragraphs into a complete PDF file.
pub fn render_paragraphs(paragraphs: &[String]) -> Vec<u8> {
    let layout = Layout::new(paragraphs);

    let mut pdf = Pdf::new();
    let mut next_id = Ref::new(1);
    let mut alloc = || next_id.bump();

    let catalog_id = alloc();
    let page_tree_id = alloc();
    let font_id = alloc();

    let page_ids: Vec<(Ref, Ref)> = layout.pages.iter().map(|_| (alloc(), alloc())).collect();

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);
    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let media_box = Rect::new(0.0, 0.0, PAGE_WIDTH_MM * MM_TO_PT, PAGE_HEIGHT_MM * MM_TO_PT);
    let x = (MARGIN_MM + CELL_PADDING_MM) * MM_TO_PT;

    for ((page_id, content_id), lines) in page_ids.iter().zip(&layout.pages) {
        let mut page = pdf.page(*page_id);
        page.media_box(media_box);
        page.parent(page_tree_id);
        page.contents(*content_id);
        page.resources().fonts().pair(FONT_NAME, font_id);
        page.finish();

        let mut content = Content::new();
        for (baseline, line) in lines {
            if line.is_empty() {
                continue;
            }
            content.begin_text();
            content.set_font(FONT_NAME, FONT_SIZE_PT);
            content.next_line(x, *baseline);
            content.show(Str(&encode(line)));
            content.end_text();
        }
        pdf.stream(*content_id, &content.finish());
    }

    pdf.finish()
}
