use super::surface::{Color, DisplaySurface, FontSize, Palette};
use crate::error::{display_error, AppResult};
use ab_glyph::{FontVec, PxScale};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_text_mut;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Panel width in pixels
pub const DISPLAY_WIDTH: u32 = 800;

/// Panel height in pixels
pub const DISPLAY_HEIGHT: u32 = 600;

fn luma(color: Color) -> Luma<u8> {
    match color {
        Color::Black => Luma([0]),
        Color::White => Luma([255]),
    }
}

/// Surface that rasterizes into a grayscale frame and writes it as PNG on flush
pub struct ImageSurface {
    font: FontVec,
    canvas: GrayImage,
    palette: Palette,
    size: FontSize,
    output_path: PathBuf,
}

impl ImageSurface {
    pub fn new(font: FontVec, output_path: &Path) -> Self {
        let palette = Palette::default();
        Self {
            font,
            canvas: GrayImage::from_pixel(DISPLAY_WIDTH, DISPLAY_HEIGHT, luma(palette.background)),
            palette,
            size: FontSize::default(),
            output_path: output_path.to_path_buf(),
        }
    }

    /// Load a TrueType/OpenType font from disk
    pub fn from_font_file(font_path: &Path, output_path: &Path) -> AppResult<Self> {
        let bytes = std::fs::read(font_path).map_err(|e| {
            display_error(&format!("Failed to read font {}: {}", font_path.display(), e))
        })?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| display_error(&format!("Invalid font {}: {}", font_path.display(), e)))?;

        Ok(Self::new(font, output_path))
    }

    /// Current frame buffer
    pub fn canvas(&self) -> &GrayImage {
        &self.canvas
    }
}

impl DisplaySurface for ImageSurface {
    fn init(&mut self, palette: Palette) -> AppResult<()> {
        self.palette = palette;
        self.clear()
    }

    fn clear(&mut self) -> AppResult<()> {
        self.canvas = GrayImage::from_pixel(DISPLAY_WIDTH, DISPLAY_HEIGHT, luma(self.palette.background));
        Ok(())
    }

    fn set_font(&mut self, font: FontSize) {
        self.size = font;
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> AppResult<()> {
        debug!("Drawing {:?} text at ({}, {})", self.size, x, y);
        draw_text_mut(
            &mut self.canvas,
            luma(self.palette.foreground),
            x,
            y,
            PxScale::from(self.size.px()),
            &self.font,
            text,
        );
        Ok(())
    }

    fn flush(&mut self) -> AppResult<()> {
        self.canvas
            .save(&self.output_path)
            .map_err(|e| display_error(&format!("Failed to write frame: {}", e)))?;
        info!("Frame written to {}", self.output_path.display());
        Ok(())
    }
}
