// src/app/gfx.rs
use std::path::Path;

use eframe::egui::{self as eg, ColorImage, TextureHandle};

/// Upload an RGBA image to a GPU texture. (UI thread only)
pub fn upload_rgba(
    ctx: &eg::Context,
    w: u32,
    h: u32,
    bytes: &[u8],
    name: &str,
) -> TextureHandle {
    let img = ColorImage::from_rgba_unmultiplied([w as usize, h as usize], bytes);
    ctx.load_texture(name.to_string(), img, eg::TextureOptions::LINEAR)
}

/// Load a texture from a cached poster file. (UI thread only)
pub fn load_texture_from_path(
    ctx: &eg::Context,
    path: &Path,
    cache_name: &str,
) -> Result<TextureHandle, String> {
    let (w, h, bytes) = crate::app::cache::load_rgba(path)?;
    if w == 0 || h == 0 {
        return Err(format!("empty image {}", path.display()));
    }
    Ok(upload_rgba(ctx, w, h, &bytes, cache_name))
}

/// UV rect that fills `target` with an image of `size`, cropping the
/// overflowing axis around the center.
pub fn cover_uv(size: eg::Vec2, target: eg::Vec2) -> eg::Rect {
    let full = eg::Rect::from_min_max(eg::pos2(0.0, 0.0), eg::pos2(1.0, 1.0));
    if size.x <= 0.0 || size.y <= 0.0 || target.x <= 0.0 || target.y <= 0.0 {
        return full;
    }
    let img_ar = size.x / size.y;
    let box_ar = target.x / target.y;
    if img_ar > box_ar {
        // too wide
        let keep = box_ar / img_ar;
        let pad = (1.0 - keep) * 0.5;
        eg::Rect::from_min_max(eg::pos2(pad, 0.0), eg::pos2(1.0 - pad, 1.0))
    } else {
        let keep = img_ar / box_ar;
        let pad = (1.0 - keep) * 0.5;
        eg::Rect::from_min_max(eg::pos2(0.0, pad), eg::pos2(1.0, 1.0 - pad))
    }
}

/// Paint a poster texture cropped into `rect`, or a flat placeholder.
pub fn paint_poster(ui: &eg::Ui, rect: eg::Rect, tex: Option<&TextureHandle>, rounding: f32) {
    match tex {
        Some(tex) => {
            let uv = cover_uv(tex.size_vec2(), rect.size());
            ui.painter().image(tex.id(), rect, uv, eg::Color32::WHITE);
        }
        None => {
            let fill = ui.visuals().faint_bg_color.gamma_multiply(2.0);
            ui.painter().rect_filled(rect, rounding, fill);
        }
    }
}
