//! PDF export of routines.
//!
//! Rendering is a thin pass over [`crate::layout`]: every laid-out page
//! becomes a PDF page and every text item is drawn with the built-in
//! Helvetica font.

use crate::layout::{layout_routine, DocumentLayout, ExportOptions, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::types::Routine;
use crate::{Error, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::path::{Path, PathBuf};

/// Render a routine to PDF bytes
pub fn export_routine(routine: &Routine, options: &ExportOptions) -> Result<Vec<u8>> {
    let layout = layout_routine(routine, options);
    render_pdf(&layout)
}

/// Render a routine and write it under `dir` using [`routine_file_name`]
///
/// Returns the path written.
pub fn export_routine_to_dir(routine: &Routine, options: &ExportOptions, dir: &Path) -> Result<PathBuf> {
    let bytes = export_routine(routine, options)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(routine_file_name(&routine.name));
    std::fs::write(&path, bytes)?;
    tracing::info!("Exported routine {} to {:?}", routine.id, path);
    Ok(path)
}

/// Draw a finished layout into a PDF document
pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Página 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Export(format!("Failed to load font: {}", e)))?;

    for (index, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Página {}", index + 1),
            )
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for item in &page.items {
            // PDF coordinates start at the bottom-left corner.
            layer.use_text(
                item.text.as_str(),
                item.font_size,
                Mm(item.x_mm),
                Mm(PAGE_HEIGHT_MM - item.y_mm),
                &font,
            );
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| Error::Export(format!("Failed to write PDF: {}", e)))?;

    tracing::debug!(
        "Rendered '{}': {} page(s), {} bytes",
        layout.title,
        layout.page_count(),
        bytes.len()
    );
    Ok(bytes)
}

/// File name for a saved export: lowercased, whitespace runs become `-`
///
/// `"Rutina  de Fuerza"` -> `"rutina-de-fuerza.pdf"`. Path separators are
/// replaced as well so the name stays a single path component.
pub fn routine_file_name(name: &str) -> String {
    let stem = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .replace(['/', '\\'], "-");
    let stem = if stem.is_empty() { "rutina".to_string() } else { stem };
    format!("{}.pdf", stem)
}
