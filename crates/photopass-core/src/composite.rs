//! Alpha flattening and sheet composition.

use image::{imageops, Rgba, RgbaImage};

use crate::buffer::{check_canvas, ImageBuffer, PixelLayout};
use crate::color::Color;
use crate::error::{Result, ValidationError};
use crate::layout::SheetPlan;

/// Composite over an opaque fill of `background`. The result is RGB.
///
/// The background's own alpha is ignored; it is always treated as opaque.
pub fn flatten(image: ImageBuffer, background: Color) -> ImageBuffer {
    match image.layout {
        PixelLayout::Rgb => image,
        PixelLayout::Rgba => {
            let bg = [background.r as u32, background.g as u32, background.b as u32];
            let mut pixels = Vec::with_capacity(image.pixels.len() / 4 * 3);
            for px in image.pixels.chunks_exact(4) {
                let a = px[3] as u32;
                let inv = 255 - a;
                for c in 0..3 {
                    // Rounded (src * a + bg * (255 - a)) / 255
                    pixels.push(((px[c] as u32 * a + bg[c] * inv + 127) / 255) as u8);
                }
            }
            ImageBuffer::new(image.width, image.height, PixelLayout::Rgb, pixels)
        }
    }
}

/// Draw `cell` at every placement of `plan` on a sheet-sized canvas.
///
/// The canvas starts filled with `background`, or fully transparent when
/// `None`. Each placement overwrites the canvas with the cell's pixels. With
/// a background the result is flattened to opaque RGB; without one it stays
/// RGBA.
///
/// # Errors
///
/// `ValidationError` when the cell does not have the plan's cell size, or
/// the sheet is larger than the canvas limit.
pub fn composite_sheet(
    cell: &ImageBuffer,
    plan: &SheetPlan,
    background: Option<Color>,
) -> Result<ImageBuffer> {
    if cell.dimensions() != (plan.cell_width, plan.cell_height) {
        return Err(ValidationError::new(format!(
            "Cell is {}x{} but the sheet plan expects {}x{}",
            cell.width, cell.height, plan.cell_width, plan.cell_height
        ))
        .into());
    }

    check_canvas(plan.sheet_width, plan.sheet_height)?;

    let fill = background.map_or([0, 0, 0, 0], Color::to_rgba);
    let mut sheet = RgbaImage::from_pixel(plan.sheet_width, plan.sheet_height, Rgba(fill));
    let tile = cell.clone().into_rgba_image()?;
    for placement in &plan.placements {
        imageops::replace(&mut sheet, &tile, placement.x, placement.y);
    }

    let canvas = ImageBuffer::from_rgba_image(sheet);
    Ok(match background {
        Some(color) => flatten(canvas, color),
        None => canvas,
    })
}
