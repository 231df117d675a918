//! Page layout for routine exports.
//!
//! Turns a routine into pages of positioned text. Positions are in
//! millimetres from the top-left corner of an A4 page; the renderer in
//! [`crate::export`] flips them into PDF coordinates. Keeping layout
//! separate from rendering lets pagination be checked without parsing PDF.

use crate::grouping::{group_by_day, DayOrder};
use crate::types::Routine;
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;

/// A day block starting below this line moves to the next page
const PAGE_BREAK_Y_MM: f32 = 250.0;
/// Space kept free above the footer baseline
const FOOTER_BAND_MM: f32 = 10.0;
const EXERCISE_INDENT_MM: f32 = 10.0;

const TITLE_SIZE: f32 = 24.0;
const SECTION_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;
const FOOTER_SIZE: f32 = 10.0;

const DAY_HEADING_ADVANCE_MM: f32 = 10.0;
const EXERCISE_ADVANCE_MM: f32 = 8.0;
const DAY_BLOCK_GAP_MM: f32 = 5.0;
const SECTION_ADVANCE_MM: f32 = 15.0;
const LINE_HEIGHT_FACTOR: f32 = 1.15;
const PT_TO_MM: f32 = 25.4 / 72.0;

/// Knobs for a routine export
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ExportOptions {
    #[serde(default)]
    pub day_order: DayOrder,
}

/// One run of text placed on a page
#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x_mm: f32,
    /// Baseline, measured from the top edge
    pub y_mm: f32,
    pub font_size: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageLayout {
    pub items: Vec<TextItem>,
}

/// Every page of an export, ready to render
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentLayout {
    pub title: String,
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text items in page order
    pub fn items(&self) -> impl Iterator<Item = &TextItem> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }
}

/// Lowest baseline body text may use
fn content_floor() -> f32 {
    PAGE_HEIGHT_MM - MARGIN_MM - FOOTER_BAND_MM
}

/// Vertical cursor over a growing list of pages
struct Cursor {
    pages: Vec<PageLayout>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            y: MARGIN_MM,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.y = MARGIN_MM;
    }

    fn place(&mut self, text: impl Into<String>, x_mm: f32, y_mm: f32, font_size: f32) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(TextItem {
                text: text.into(),
                x_mm,
                y_mm,
                font_size,
            });
        }
    }

    /// Place a line at the cursor, breaking first if it would cross the floor
    fn line(&mut self, text: impl Into<String>, x_mm: f32, font_size: f32, advance: f32) {
        if self.y > content_floor() {
            self.new_page();
        }
        let y = self.y;
        self.place(text, x_mm, y, font_size);
        self.y += advance;
    }
}

/// Lay out a routine: title, optional description, day blocks, footer
pub fn layout_routine(routine: &Routine, options: &ExportOptions) -> DocumentLayout {
    let mut cursor = Cursor::new();
    let content_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

    cursor.place(&routine.name, MARGIN_MM, MARGIN_MM + 10.0, TITLE_SIZE);

    let description = routine.description.trim();
    let section_y = if description.is_empty() {
        MARGIN_MM + 35.0
    } else {
        cursor.place("Descripción:", MARGIN_MM, MARGIN_MM + 25.0, HEADING_SIZE);
        cursor.y = MARGIN_MM + 35.0;
        let line_height = BODY_SIZE * PT_TO_MM * LINE_HEIGHT_FACTOR;
        let mut last_baseline = cursor.y;
        for line in wrap_text(description, content_width, BODY_SIZE) {
            cursor.line(line, MARGIN_MM, BODY_SIZE, line_height);
            last_baseline = cursor.y - line_height;
        }
        // Same gap below a one-line description as the fixed layout had.
        (last_baseline + 10.0).max(MARGIN_MM + 45.0)
    };
    cursor.y = section_y;

    cursor.line("Ejercicios:", MARGIN_MM, SECTION_SIZE, SECTION_ADVANCE_MM);

    let groups = group_by_day(&routine.exercises);
    for (day, exercises) in groups.ordered(options.day_order) {
        // Keeps a heading and its first line together as well: a block that
        // starts above the break line always fits one exercise below it.
        if cursor.y > PAGE_BREAK_Y_MM {
            cursor.new_page();
        }

        cursor.line(day, MARGIN_MM, HEADING_SIZE, DAY_HEADING_ADVANCE_MM);
        for exercise in exercises {
            cursor.line(
                exercise.summary_line(),
                MARGIN_MM + EXERCISE_INDENT_MM,
                BODY_SIZE,
                EXERCISE_ADVANCE_MM,
            );
        }
        cursor.y += DAY_BLOCK_GAP_MM;
    }

    cursor.place(
        format!("Creada el: {}", format_created_date(routine)),
        MARGIN_MM,
        PAGE_HEIGHT_MM - MARGIN_MM,
        FOOTER_SIZE,
    );

    tracing::debug!(
        "Laid out routine '{}' on {} page(s)",
        routine.name,
        cursor.pages.len()
    );

    DocumentLayout {
        title: routine.name.clone(),
        pages: cursor.pages,
    }
}

/// Short es-AR date (`5/3/2024`) of the creation timestamp in local time
fn format_created_date(routine: &Routine) -> String {
    let date = routine.created_at.with_timezone(&Local).date_naive();
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Approximate Helvetica advance width, in thousandths of an em
fn glyph_width(c: char) -> u32 {
    match c {
        ' ' | 'f' | 't' | 'I' | '.' | ',' | ':' | ';' | '!' | '/' | '[' | ']' => 278,
        'i' | 'j' | 'l' | 'í' | 'ì' | 'ï' => 222,
        'r' | '-' | '(' | ')' => 333,
        'm' | 'M' => 833,
        'w' => 722,
        'W' => 944,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 500,
        'F' | 'T' | 'Z' => 611,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' | 'Ñ' | 'Ú' => 722,
        'G' | 'O' | 'Q' | 'Ó' => 778,
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' | 'Á' | 'É' => 667,
        '×' => 584,
        '\'' => 191,
        // digits and the remaining lowercase letters
        _ => 556,
    }
}

/// Rendered width of `text` in millimetres at `font_size` points
pub fn text_width_mm(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(glyph_width).sum();
    units as f32 / 1000.0 * font_size * PT_TO_MM
}

/// Greedy word wrap to `max_width_mm`.
///
/// Explicit newlines start a new line. A single word wider than the line
/// is broken between characters.
pub fn wrap_text(text: &str, max_width_mm: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width_mm(&candidate, font_size) <= max_width_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            for c in word.chars() {
                current.push(c);
                if text_width_mm(&current, font_size) > max_width_mm && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }

        lines.push(current);
    }

    lines
}
