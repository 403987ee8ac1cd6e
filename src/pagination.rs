// Page estimation from a simple text-layout measurement.
// Page-break markers are drawn as dividers and never force a new page.

use serde::{Deserialize, Serialize};

use crate::richtext::structured_document::{
    Block, BlockKind, StructuredDocument, inline_text,
};

/// A4 height at 96 dpi, in pixels
pub const DEFAULT_PAGE_EXTENT: f32 = 1123.0;

/// Number of pages needed for content of the given rendered extent.
/// Always at least 1 and never decreasing as the extent grows.
pub fn estimate_pages(rendered_extent: f32, page_extent: f32) -> u32 {
    let page_extent = if page_extent.is_finite() && page_extent > 0.0 {
        page_extent
    } else {
        DEFAULT_PAGE_EXTENT
    };
    let extent = if rendered_extent.is_nan() {
        1.0
    } else {
        rendered_extent.max(1.0)
    };
    let pages = (extent / page_extent).ceil();
    if pages >= u32::MAX as f32 {
        u32::MAX
    } else {
        pages as u32
    }
}

/// Layout constants used to measure a document's rendered height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    pub line_height: f32,
    pub chars_per_line: usize,
    pub block_spacing: f32,
    /// Top and bottom page padding
    pub page_padding: f32,
    pub page_break_extent: f32,
    pub table_row_padding: f32,
    pub h1_scale: f32,
    pub h2_scale: f32,
    pub h3_scale: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        LayoutMetrics {
            line_height: 24.0,
            chars_per_line: 85,
            block_spacing: 12.0,
            page_padding: 192.0,
            page_break_extent: 40.0,
            table_row_padding: 8.0,
            h1_scale: 2.0,
            h2_scale: 1.5,
            h3_scale: 1.25,
        }
    }
}

impl LayoutMetrics {
    fn heading_scale(&self, level: u8) -> f32 {
        match level {
            1 => self.h1_scale,
            2 => self.h2_scale,
            _ => self.h3_scale,
        }
    }

    /// Lines taken by text wrapped at `chars_per_line / scale` characters
    fn wrapped_lines(&self, text: &str, scale: f32) -> usize {
        let per_line = ((self.chars_per_line.max(1) as f32) / scale.max(0.1)).floor().max(1.0) as usize;
        text.split('\n')
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum()
    }

    /// Height of a single block, without spacing
    pub fn block_extent(&self, block: &Block) -> f32 {
        match &block.kind {
            BlockKind::Heading { level, content, .. } => {
                let scale = self.heading_scale(*level);
                self.wrapped_lines(&inline_text(content), scale) as f32 * self.line_height * scale
            }
            BlockKind::Paragraph { content, .. } => {
                self.wrapped_lines(&inline_text(content), 1.0) as f32 * self.line_height
            }
            BlockKind::List { items, .. } => items
                .iter()
                .map(|item| self.wrapped_lines(&inline_text(item), 1.0) as f32 * self.line_height)
                .sum(),
            BlockKind::Table { rows } => rows
                .iter()
                .map(|row| {
                    let columns = row.len().max(1);
                    let tallest = row
                        .iter()
                        .map(|cell| {
                            self.wrapped_lines(&inline_text(&cell.content), columns as f32)
                        })
                        .max()
                        .unwrap_or(1);
                    tallest as f32 * self.line_height + self.table_row_padding
                })
                .sum(),
            BlockKind::PageBreak => self.page_break_extent,
            BlockKind::Raw { .. } => {
                self.wrapped_lines(&block.to_plain_text(), 1.0) as f32 * self.line_height
            }
        }
    }

    /// Total rendered height of the document including page padding
    pub fn rendered_extent(&self, doc: &StructuredDocument) -> f32 {
        let blocks = doc.blocks();
        let content: f32 = blocks.iter().map(|block| self.block_extent(block)).sum();
        let spacing = self.block_spacing * blocks.len().saturating_sub(1) as f32;
        self.page_padding + content + spacing
    }
}

/// Page count for documents under one layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageEstimator {
    pub layout: LayoutMetrics,
    pub page_extent: f32,
}

impl PageEstimator {
    pub fn new(layout: LayoutMetrics, page_extent: f32) -> Self {
        PageEstimator {
            layout,
            page_extent,
        }
    }

    pub fn page_count(&self, doc: &StructuredDocument) -> u32 {
        estimate_pages(self.layout.rendered_extent(doc), self.page_extent)
    }
}

impl Default for PageEstimator {
    fn default() -> Self {
        Self::new(LayoutMetrics::default(), DEFAULT_PAGE_EXTENT)
    }
}
