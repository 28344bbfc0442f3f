//! Recolored pattern fills for server fill symbols.

use carto_common::error::RenderError;
use carto_common::image::Bitmap;

use crate::color::ServerColor;
use crate::value::FillPattern;

/// Edge length of a pattern tile in pixels.
pub const PATTERN_TILE_SIZE: u32 = 8;

/// Channel value below which a symbol pixel counts as ink.
pub const INK_THRESHOLD: u8 = 225;

/// Build the fill pattern for `symbol_id` from its symbol bitmap.
///
/// The top-left tile of `bitmap` is sampled; pixels outside the bitmap read
/// as fully transparent black. Pixels darker than [`INK_THRESHOLD`] on every
/// channel take `fore`, the rest take `back` when given. Alpha is kept.
///
/// # Errors
///
/// [`RenderError::MissingFillImage`] without a bitmap,
/// [`RenderError::CrossOrigin`] when its pixels cannot be read back.
pub fn recolor_pattern(
    symbol_id: u8,
    bitmap: Option<&Bitmap>,
    fore: ServerColor,
    back: Option<ServerColor>,
) -> Result<FillPattern, RenderError> {
    let bitmap = bitmap.ok_or(RenderError::MissingFillImage { symbol_id })?;
    if !bitmap.is_origin_clean() {
        return Err(RenderError::CrossOrigin { symbol_id });
    }

    let mut rgba = Vec::with_capacity((PATTERN_TILE_SIZE * PATTERN_TILE_SIZE * 4) as usize);
    for y in 0..PATTERN_TILE_SIZE {
        for x in 0..PATTERN_TILE_SIZE {
            let [r, g, b, a] = bitmap.pixel(x, y).unwrap_or([0, 0, 0, 0]);
            let ink = r < INK_THRESHOLD && g < INK_THRESHOLD && b < INK_THRESHOLD;
            let color = if ink { Some(fore) } else { back };
            match color {
                Some(c) => rgba.extend_from_slice(&[c.red, c.green, c.blue, a]),
                None => rgba.extend_from_slice(&[r, g, b, a]),
            }
        }
    }

    Ok(FillPattern {
        symbol_id,
        width: PATTERN_TILE_SIZE,
        height: PATTERN_TILE_SIZE,
        rgba,
    })
}
