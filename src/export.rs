//! Splits a rendered timeline into fixed-aspect pages.
//!
//! The full width always maps onto the page width, so each page holds a
//! horizontal band whose height follows from the page aspect ratio. The last
//! page holds whatever is left.

use crate::config::Config;
use crate::ir::TimelineData;
use crate::layout::TimelineLayout;
use crate::render::{canvas_height, render_svg_region};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSlice {
    pub index: usize,
    pub top: f32,
    pub height: f32,
}

pub fn paginate(width: f32, height: f32, page_width_mm: f32, page_height_mm: f32) -> Vec<PageSlice> {
    if height <= 0.0 {
        return Vec::new();
    }
    let slice = if width > 0.0 && page_width_mm > 0.0 && page_height_mm > 0.0 {
        width * page_height_mm / page_width_mm
    } else {
        height
    };

    let count = ((height / slice).ceil() as usize).max(1);
    (0..count)
        .map(|index| {
            let top = index as f32 * slice;
            PageSlice {
                index,
                top,
                height: slice.min(height - top),
            }
        })
        .filter(|page| page.height > 0.0)
        .collect()
}

/// Renders every page of `layout` as its own SVG document.
pub fn render_pages(layout: &TimelineLayout, data: &TimelineData, config: &Config) -> Vec<String> {
    let width = layout.layout_config.total_width;
    let height = canvas_height(layout, &config.layout, &config.render);
    let pages = paginate(
        width,
        height,
        config.export.page_width_mm,
        config.export.page_height_mm,
    );
    info!(pages = pages.len(), width, height, "paginating timeline");
    pages
        .iter()
        .map(|page| {
            render_svg_region(
                layout,
                data,
                &config.theme,
                &config.layout,
                &config.render,
                page.top,
                page.height,
            )
        })
        .collect()
}
