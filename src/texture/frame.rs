//! Raw ARGB pixel buffers: source textures and the rendered frame.

use std::path::Path;

use bevy_ecs::resource::Resource;
use glam::{UVec2, Vec2};
use image::{ImageFormat, Rgb, RgbImage};

use crate::error::TextureError;

/// Returns the alpha channel of an ARGB pixel.
pub const fn alpha(pixel: u32) -> u8 {
    (pixel >> 24) as u8
}

/// Darkens an ARGB pixel as if covered by black at `amount` opacity.
pub fn shade(pixel: u32, amount: f32) -> u32 {
    let keep = (1.0 - amount).clamp(0.0, 1.0);
    let channel = |shift: u32| ((((pixel >> shift) & 0xFF) as f32 * keep) as u32) << shift;
    (pixel & 0xFF00_0000) | channel(16) | channel(8) | channel(0)
}

/// An immutable ARGB image, such as a tile or character sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    size: UVec2,
    pixels: Vec<u32>,
}

impl Texture {
    /// Wraps row-major ARGB pixels.
    ///
    /// # Errors
    ///
    /// Fails when either dimension is zero or the pixel count does not match.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(TextureError::PixelCount {
                expected,
                found: pixels.len(),
            });
        }
        Ok(Self {
            size: UVec2::new(width, height),
            pixels,
        })
    }

    /// Builds a texture by evaluating `pixel_at` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut pixel_at: impl FnMut(u32, u32) -> u32) -> Result<Self, TextureError> {
        let pixels = (0..height).flat_map(|y| (0..width).map(move |x| (x, y))).map(|(x, y)| pixel_at(x, y)).collect();
        Self::new(width, height, pixels)
    }

    pub fn solid(width: u32, height: u32, color: u32) -> Result<Self, TextureError> {
        Self::new(width, height, vec![color; width as usize * height as usize])
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    /// The pixel at `(x, y)`; fully transparent outside the texture.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        if x >= self.size.x || y >= self.size.y {
            return 0;
        }
        self.pixels[(y * self.size.x + x) as usize]
    }
}

/// A vertical strip of a texture, stretched over a destination span of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBlit {
    /// Source column within the texture.
    pub src_x: u32,
    /// First source row.
    pub src_y: u32,
    /// Number of source rows.
    pub src_h: u32,
    /// Leftmost destination column.
    pub dst_x: i32,
    /// Number of destination columns covered.
    pub dst_w: u32,
    /// Top destination row; may lie above the frame.
    pub dst_y: i32,
    /// Destination height; may extend past the frame.
    pub dst_h: u32,
}

/// The frame buffer a session renders into.
#[derive(Resource, Debug, Clone)]
pub struct FrameBuffer {
    size: UVec2,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            pixels: vec![0; size.x as usize * size.y as usize],
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        (x < self.size.x && y < self.size.y).then(|| self.pixels[(y * self.size.x + x) as usize])
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Fills whole rows `[top, bottom)` with `color`, clipped to the frame.
    pub fn fill_rows(&mut self, top: u32, bottom: u32, color: u32) {
        let width = self.size.x as usize;
        let (top, bottom) = (top.min(self.size.y) as usize, bottom.min(self.size.y) as usize);
        if top < bottom {
            self.pixels[top * width..bottom * width].fill(color);
        }
    }

    /// Fills a rectangle with `color`, clipped to the frame.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u32) {
        let (width, height) = (self.size.x as i64, self.size.y as i64);
        let x_start = x.max(0) as i64;
        let x_end = (x as i64 + w as i64).min(width);
        let y_start = y.max(0) as i64;
        let y_end = (y as i64 + h as i64).min(height);
        if x_start >= x_end {
            return;
        }

        for row in y_start..y_end {
            let offset = (row * width) as usize;
            self.pixels[offset + x_start as usize..offset + x_end as usize].fill(color);
        }
    }

    /// Fills every pixel whose centre lies within `radius` of `centre`.
    pub fn fill_circle(&mut self, centre: Vec2, radius: f32, color: u32) {
        let min = (centre - radius).floor().max(Vec2::ZERO);
        let max = (centre + radius).ceil().min(self.size.as_vec2());
        let radius_squared = radius * radius;

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let offset = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - centre;
                if offset.length_squared() <= radius_squared {
                    self.pixels[(y * self.size.x + x) as usize] = color;
                }
            }
        }
    }

    /// Fills every pixel whose centre lies inside the triangle, in either winding.
    pub fn fill_triangle(&mut self, corners: [Vec2; 3], color: u32) {
        let [a, b, c] = corners;
        let min = a.min(b).min(c).floor().max(Vec2::ZERO);
        let max = a.max(b).max(c).ceil().min(self.size.as_vec2());
        let edge = |from: Vec2, to: Vec2, p: Vec2| (to - from).perp_dot(p - from);

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let sides = [edge(a, b, p), edge(b, c, p), edge(c, a, p)];
                if sides.iter().all(|&side| side >= 0.0) || sides.iter().all(|&side| side <= 0.0) {
                    self.pixels[(y * self.size.x + x) as usize] = color;
                }
            }
        }
    }

    /// Copies a stretched texture column, darkened by `shade_amount` when given.
    pub fn blit_column(&mut self, texture: &Texture, blit: ColumnBlit, shade_amount: Option<f32>) {
        self.blit_with(texture, blit, |pixel| Some(shade_amount.map_or(pixel, |amount| shade(pixel, amount))));
    }

    /// Copies a stretched texture column, skipping fully transparent pixels.
    pub fn blit_column_keyed(&mut self, texture: &Texture, blit: ColumnBlit) {
        self.blit_with(texture, blit, |pixel| (alpha(pixel) != 0).then_some(pixel));
    }

    fn blit_with(&mut self, texture: &Texture, blit: ColumnBlit, mut filter: impl FnMut(u32) -> Option<u32>) {
        if blit.dst_h == 0 || blit.src_h == 0 {
            return;
        }

        let (width, height) = (self.size.x as i32, self.size.y as i32);
        let x_start = blit.dst_x.max(0);
        let x_end = (blit.dst_x + blit.dst_w as i32).min(width);
        let y_start = blit.dst_y.max(0);
        let y_end = (blit.dst_y as i64 + blit.dst_h as i64).min(height as i64) as i32;
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        for y in y_start..y_end {
            let v = ((y - blit.dst_y) as u64 * blit.src_h as u64 / blit.dst_h as u64) as u32;
            let Some(pixel) = filter(texture.pixel(blit.src_x, blit.src_y + v)) else {
                continue;
            };
            let row = (y * width) as usize;
            self.pixels[row + x_start as usize..row + x_end as usize].fill(pixel);
        }
    }

    /// Copies the frame into an RGB image, dropping alpha.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.size.x, self.size.y, |x, y| {
            let pixel = self.pixels[(y * self.size.x + x) as usize];
            Rgb([(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8])
        })
    }

    /// Encodes the frame as a PNG file at `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), TextureError> {
        self.to_rgb_image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| TextureError::WriteFailed(e.to_string()))
    }
}
