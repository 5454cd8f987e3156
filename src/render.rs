//! Styled rasterization of a fitted symbol.
//!
//! Dark modules are first drawn into an 8-bit coverage canvas with the
//! chosen drawer, then every pixel is painted as a blend of the background
//! and the color mask weighted by its coverage.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use qrcode::{Color, QrCode};

use crate::color::Rgb;
use crate::error::{QrError, QrResult};
use crate::style::{ColorMask, ModuleDrawer};

pub const ANTIALIASING_FACTOR: u32 = 4;
pub const EMBEDDED_IMAGE_RATIO: u32 = 4;
/// Largest output side in pixels.
pub const MAX_IMAGE_SIDE: u32 = 8192;
/// Supersampling backs off so the coverage canvas stays under this side.
const MAX_CANVAS_SIDE: u32 = 8192;

const INK: Luma<u8> = Luma([255]);

#[derive(Debug, Clone, Copy, Default)]
struct Neighbors {
    north: bool,
    south: bool,
    east: bool,
    west: bool,
}

struct ModuleGrid {
    width: usize,
    colors: Vec<Color>,
}

impl ModuleGrid {
    fn new(code: &QrCode) -> Self {
        Self { width: code.width(), colors: code.to_colors() }
    }

    fn is_dark(&self, x: i64, y: i64) -> bool {
        let w = self.width as i64;
        if x < 0 || y < 0 || x >= w || y >= w {
            return false;
        }
        self.colors[(y * w + x) as usize] == Color::Dark
    }

    fn neighbors(&self, x: i64, y: i64) -> Neighbors {
        Neighbors {
            north: self.is_dark(x, y - 1),
            south: self.is_dark(x, y + 1),
            east: self.is_dark(x + 1, y),
            west: self.is_dark(x - 1, y),
        }
    }
}

/// Side length in pixels of a rendered symbol, `None` on overflow.
pub fn image_side(modules: usize, box_size: u32, border: u32) -> Option<u32> {
    let modules = u32::try_from(modules).ok()?;
    border.checked_mul(2)?.checked_add(modules)?.checked_mul(box_size)
}

pub fn render_symbol(
    code: &QrCode,
    box_size: u32,
    border: u32,
    drawer: ModuleDrawer,
    mask: &ColorMask,
) -> QrResult<RgbaImage> {
    let grid = ModuleGrid::new(code);
    let side = image_side(grid.width, box_size, border)
        .filter(|&side| side <= MAX_IMAGE_SIDE)
        .ok_or(QrError::ImageTooLarge { modules: grid.width, box_size, border })?;
    let coverage = draw_coverage(&grid, box_size, border, side, drawer);
    Ok(paint(&coverage, mask, side))
}

fn draw_coverage(grid: &ModuleGrid, box_size: u32, border: u32, side: u32, drawer: ModuleDrawer) -> GrayImage {
    let scale = if drawer.needs_antialiasing() {
        ANTIALIASING_FACTOR.min(MAX_CANVAS_SIDE / side.max(1)).max(1)
    } else {
        1
    };
    let unit = box_size * scale;
    let mut canvas = GrayImage::new(side * scale, side * scale);

    for y in 0..grid.width as i64 {
        for x in 0..grid.width as i64 {
            if !grid.is_dark(x, y) {
                continue;
            }
            let ox = (border + x as u32) * unit;
            let oy = (border + y as u32) * unit;
            draw_module(&mut canvas, drawer, ox, oy, unit, grid.neighbors(x, y));
        }
    }

    if scale > 1 {
        imageops::resize(&canvas, side, side, FilterType::Lanczos3)
    } else {
        canvas
    }
}

fn draw_module(canvas: &mut GrayImage, drawer: ModuleDrawer, ox: u32, oy: u32, unit: u32, n: Neighbors) {
    let r = unit as f32 / 2.0;
    match drawer {
        ModuleDrawer::Square => {
            draw_filled_rect_mut(canvas, Rect::at(ox as i32, oy as i32).of_size(unit, unit), INK);
        }
        ModuleDrawer::GappedSquare { size_ratio } => {
            let size = ((unit as f32 * size_ratio).round() as u32).clamp(1, unit);
            let off = (unit - size) / 2;
            let rect = Rect::at((ox + off) as i32, (oy + off) as i32).of_size(size, size);
            draw_filled_rect_mut(canvas, rect, INK);
        }
        ModuleDrawer::Circle => {
            fill_where(canvas, ox, oy, unit, |cx, cy| in_ellipse(cx - r, cy - r, r, r));
        }
        ModuleDrawer::Rounded => {
            fill_where(canvas, ox, oy, unit, |cx, cy| {
                let vertical = if cy < r { n.north } else { n.south };
                let horizontal = if cx < r { n.west } else { n.east };
                vertical || horizontal || in_ellipse(cx - r, cy - r, r, r)
            });
        }
        ModuleDrawer::VerticalBars { horizontal_shrink } => {
            let half_w = r * horizontal_shrink;
            fill_where(canvas, ox, oy, unit, |cx, cy| {
                if (cx - r).abs() > half_w {
                    return false;
                }
                let joined = if cy < r { n.north } else { n.south };
                joined || in_ellipse(cx - r, cy - r, half_w, r)
            });
        }
        ModuleDrawer::HorizontalBars { vertical_shrink } => {
            let half_h = r * vertical_shrink;
            fill_where(canvas, ox, oy, unit, |cx, cy| {
                if (cy - r).abs() > half_h {
                    return false;
                }
                let joined = if cx < r { n.west } else { n.east };
                joined || in_ellipse(cx - r, cy - r, r, half_h)
            });
        }
    }
}

/// Sets every pixel of the `unit` box at `(ox, oy)` whose center satisfies
/// `inside`, given coordinates relative to the box corner.
fn fill_where(canvas: &mut GrayImage, ox: u32, oy: u32, unit: u32, inside: impl Fn(f32, f32) -> bool) {
    for dy in 0..unit {
        for dx in 0..unit {
            if inside(dx as f32 + 0.5, dy as f32 + 0.5) {
                canvas.put_pixel(ox + dx, oy + dy, INK);
            }
        }
    }
}

fn in_ellipse(dx: f32, dy: f32, rx: f32, ry: f32) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    (dx / rx).powi(2) + (dy / ry).powi(2) <= 1.0
}

fn paint(coverage: &GrayImage, mask: &ColorMask, side: u32) -> RgbaImage {
    let back = mask.back();
    RgbaImage::from_fn(side, side, |x, y| {
        let t = coverage.get_pixel(x, y)[0] as f32 / 255.0;
        if t == 0.0 {
            return back.to_rgba();
        }
        Rgb::lerp(back, mask.front_at(x, y, side, side), t).to_rgba()
    })
}

/// Composites `logo` over the middle of the symbol. The logo covers about a
/// quarter of the side; its offset is snapped to whole modules.
pub fn embed_image(symbol: &mut RgbaImage, logo: &DynamicImage, box_size: u32) {
    let total = symbol.width();
    let approx = total / EMBEDDED_IMAGE_RATIO;
    let offset = ((total / 2).saturating_sub(approx / 2) / box_size.max(1)) * box_size.max(1);
    let logo_side = total.saturating_sub(offset * 2);
    if logo_side == 0 {
        return;
    }

    let region = logo.resize_exact(logo_side, logo_side, FilterType::Lanczos3).to_rgba8();
    imageops::overlay(symbol, &region, offset as i64, offset as i64);
}
