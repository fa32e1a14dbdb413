use crate::error::AppResult;
use tracing::info;

/// Ink colors of a black/white panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
}

/// Foreground and background used for every draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Color::Black,
            background: Color::White,
        }
    }
}

/// Font sizes available on the panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontSize {
    #[default]
    Large,
    Medium,
    Small,
}

impl FontSize {
    /// Glyph height in pixels
    pub fn px(self) -> f32 {
        match self {
            FontSize::Large => 64.0,
            FontSize::Medium => 48.0,
            FontSize::Small => 32.0,
        }
    }
}

/// Drawing primitives of an e-paper panel.
///
/// Draw calls only touch the frame buffer; nothing reaches the panel until
/// `flush`.
pub trait DisplaySurface: Send {
    /// Bring up the panel and set its colors
    fn init(&mut self, palette: Palette) -> AppResult<()>;

    /// Fill the frame buffer with the background color
    fn clear(&mut self) -> AppResult<()>;

    /// Select the font for subsequent text
    fn set_font(&mut self, font: FontSize);

    /// Draw text with its top-left corner at `(x, y)`
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> AppResult<()>;

    /// Push the frame buffer to the panel
    fn flush(&mut self) -> AppResult<()>;
}

/// Surface that only logs what would be drawn
#[derive(Debug, Default)]
pub struct LogSurface {
    font: FontSize,
    pending: usize,
}

impl DisplaySurface for LogSurface {
    fn init(&mut self, palette: Palette) -> AppResult<()> {
        info!("Display init with {:?} on {:?}", palette.foreground, palette.background);
        Ok(())
    }

    fn clear(&mut self) -> AppResult<()> {
        self.pending = 0;
        Ok(())
    }

    fn set_font(&mut self, font: FontSize) {
        self.font = font;
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> AppResult<()> {
        self.pending += 1;
        info!("Display text {:?} at ({}, {}): {}", self.font, x, y, text);
        Ok(())
    }

    fn flush(&mut self) -> AppResult<()> {
        info!("Display flush with {} text blocks", self.pending);
        Ok(())
    }
}
