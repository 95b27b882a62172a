use std::f64::consts::PI;
use std::path::Path;

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
    draw_line_segment_mut, draw_polygon_mut, draw_text_mut, text_size,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use tracing::warn;

use crate::error::{Error, Result};

static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const TITLE_SCALE: PxScale = PxScale { x: 24.0, y: 24.0 };
const LABEL_SCALE: PxScale = PxScale { x: 16.0, y: 16.0 };

pub const WIDTH: u32 = 1500;
pub const HEIGHT: u32 = 600;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([40, 40, 40]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const BAR: Rgb<u8> = Rgb([31, 119, 180]);

const PALETTE: [Rgb<u8>; 10] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
    Rgb([227, 119, 194]),
    Rgb([127, 127, 127]),
    Rgb([188, 189, 34]),
    Rgb([23, 190, 207]),
];

pub fn slice_color(index: usize) -> Rgb<u8> {
    PALETTE[index % PALETTE.len()]
}

/// Text drawn around the two panels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captions {
    pub pie_title: String,
    pub bar_title: String,
    /// Name of the bar chart's x axis, e.g. "Week".
    pub bar_axis: String,
}

/// Proportion chart of `shares` on the left half, bar chart of `bars` on the
/// right half, in the order given.
pub fn render(
    shares: &[(String, usize)],
    bars: &[(String, usize)],
    captions: &Captions,
) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let font = load_font();
    draw_pie(&mut img, shares, font.as_ref());
    draw_bars(&mut img, bars, font.as_ref());

    if let Some(font) = &font {
        draw_centered(&mut img, font, TITLE_SCALE, 450, 16, &captions.pie_title);
        draw_centered(&mut img, font, TITLE_SCALE, 1155, 16, &captions.bar_title);
        draw_centered(&mut img, font, LABEL_SCALE, 1155, 568, &captions.bar_axis);
    }
    img
}

/// The bundled font. Charts lose their text but still render if it fails
/// to parse.
fn load_font() -> Option<FontRef<'static>> {
    match FontRef::try_from_slice(FONT_BYTES) {
        Ok(font) => Some(font),
        Err(err) => {
            warn!(error = %err, "chart font unavailable, drawing without text");
            None
        }
    }
}

/// Draw `text` horizontally centred on `cx` with its top edge at `y`.
fn draw_centered(img: &mut RgbImage, font: &FontRef, scale: PxScale, cx: i32, y: i32, text: &str) {
    if text.is_empty() {
        return;
    }
    let (w, _) = text_size(scale, font, text);
    draw_text_mut(img, INK, cx - w as i32 / 2, y, scale, font, text);
}

/// `Python 66.7%`
fn legend_label(name: &str, count: usize, total: usize) -> String {
    format!("{name} {:.1}%", 100.0 * count as f64 / total as f64)
}

pub fn save(img: &RgbImage, path: &Path) -> Result<()> {
    img.save(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })
}

fn draw_pie(img: &mut RgbImage, shares: &[(String, usize)], font: Option<&FontRef>) {
    let (cx, cy, radius) = (450.0_f64, 300.0_f64, 220.0_f64);
    let total: usize = shares.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return;
    }

    // Legend, one swatch and label per slice, top-left.
    for (i, (name, count)) in shares.iter().enumerate() {
        let y = 60 + 32 * i as i32;
        draw_filled_rect_mut(img, Rect::at(40, y).of_size(22, 22), slice_color(i));
        draw_hollow_rect_mut(img, Rect::at(40, y).of_size(22, 22), INK);
        if let Some(font) = font {
            let label = legend_label(name, *count, total);
            draw_text_mut(img, INK, 70, y + 3, LABEL_SCALE, font, &label);
        }
    }

    if shares.len() == 1 {
        draw_filled_circle_mut(img, (cx as i32, cy as i32), radius as i32, slice_color(0));
    } else {
        let mut start = -PI / 2.0;
        for (i, (_, count)) in shares.iter().enumerate() {
            let sweep = 2.0 * PI * (*count as f64) / (total as f64);
            fill_sector(img, (cx, cy), radius, start, start + sweep, slice_color(i));
            start += sweep;
        }
    }
    draw_hollow_circle_mut(img, (cx as i32, cy as i32), radius as i32, INK);
}

/// Fill a sector as a fan of small convex polygons.
fn fill_sector(
    img: &mut RgbImage,
    (cx, cy): (f64, f64),
    radius: f64,
    from: f64,
    to: f64,
    color: Rgb<u8>,
) {
    const MAX_STEP: f64 = PI / 8.0;
    let pieces = ((to - from) / MAX_STEP).ceil().max(1.0) as usize;
    let step = (to - from) / pieces as f64;
    let center = Point::new(cx.round() as i32, cy.round() as i32);

    for piece in 0..pieces {
        let a0 = from + step * piece as f64;
        let mut poly = vec![center];
        for k in 0..=8 {
            let a = a0 + step * k as f64 / 8.0;
            let p = Point::new(
                (cx + radius * a.cos()).round() as i32,
                (cy + radius * a.sin()).round() as i32,
            );
            if poly.last() != Some(&p) {
                poly.push(p);
            }
        }
        if poly.len() >= 3 && poly.first() != poly.last() {
            draw_polygon_mut(img, &poly, color);
        }
    }
}

fn draw_bars(img: &mut RgbImage, bars: &[(String, usize)], font: Option<&FontRef>) {
    let (left, right, top, bottom) = (860_i32, 1450_i32, 60_i32, 520_i32);
    let plot_height = (bottom - top) as f32;

    let max = bars.iter().map(|(_, n)| *n).max().unwrap_or(0);
    if max > 0 {
        let step = (max / 10).max(1);
        let mut level = step;
        while level <= max {
            let y = bottom as f32 - plot_height * level as f32 / max as f32;
            draw_line_segment_mut(img, (left as f32, y), (right as f32, y), GRID);
            if let Some(font) = font {
                let text = level.to_string();
                let (w, h) = text_size(LABEL_SCALE, font, &text);
                let (x, y) = (left - 8 - w as i32, y as i32 - h as i32 / 2);
                draw_text_mut(img, INK, x, y, LABEL_SCALE, font, &text);
            }
            level += step;
        }
    }

    if !bars.is_empty() && max > 0 {
        let slot = (right - left) as f32 / bars.len() as f32;
        let width = ((slot * 0.6) as u32).max(1);
        for (i, (label, count)) in bars.iter().enumerate() {
            let h = ((plot_height * *count as f32 / max as f32).round() as u32).max(1);
            let x = left + (slot * i as f32 + slot * 0.2) as i32;
            draw_filled_rect_mut(img, Rect::at(x, bottom - h as i32).of_size(width, h), BAR);
            let tick_x = x as f32 + width as f32 / 2.0;
            draw_line_segment_mut(
                img,
                (tick_x, bottom as f32),
                (tick_x, bottom as f32 + 8.0),
                INK,
            );
            if let Some(font) = font {
                let label = fit_label(font, label, slot);
                draw_centered(img, font, LABEL_SCALE, tick_x.round() as i32, bottom + 14, label);
            }
        }
    }

    draw_line_segment_mut(img, (left as f32, top as f32), (left as f32, bottom as f32), INK);
    draw_line_segment_mut(img, (left as f32, bottom as f32), (right as f32, bottom as f32), INK);
}

/// Month names are cut to three letters when the slot is too narrow.
fn fit_label<'a>(font: &FontRef, label: &'a str, slot: f32) -> &'a str {
    let (w, _) = text_size(LABEL_SCALE, font, label);
    if (w as f32) < slot * 0.95 {
        return label;
    }
    label.char_indices().nth(3).map_or(label, |(end, _)| &label[..end])
}
