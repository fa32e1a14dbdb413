use super::surface::{DisplaySurface, FontSize};
use crate::components::room_summary::RoomSummary;
use crate::error::AppResult;

pub const MARGIN_X: i32 = 50;
pub const ROOM_NAME_Y: i32 = 50;
pub const DATE_Y: i32 = 125;
pub const NEXT_SUMMARY_Y: i32 = 225;
pub const NEXT_TIME_Y: i32 = 300;
pub const LATER_EVENTS_Y: i32 = 425;
pub const LATER_EVENTS_STEP: i32 = 50;

pub const MESSAGE_X: i32 = 100;
pub const MESSAGE_Y: i32 = 250;

/// Draw a room summary and flush it. Returns the number of text blocks drawn.
///
/// The next event gets its title and time range on separate lines; the
/// events after it get one small line each.
pub fn render_summary(surface: &mut dyn DisplaySurface, summary: &RoomSummary) -> AppResult<usize> {
    let mut blocks = 0;

    surface.clear()?;

    surface.set_font(FontSize::Large);
    surface.draw_text(&summary.room_name, MARGIN_X, ROOM_NAME_Y)?;
    blocks += 1;

    surface.set_font(FontSize::Medium);
    surface.draw_text(&summary.todays_date, MARGIN_X, DATE_Y)?;
    blocks += 1;

    if let Some((next, later)) = summary.events.split_first() {
        surface.draw_text(&next.summary, MARGIN_X, NEXT_SUMMARY_Y)?;
        surface.draw_text(&next.time_display, MARGIN_X, NEXT_TIME_Y)?;
        blocks += 2;

        if !later.is_empty() {
            surface.set_font(FontSize::Small);
            let mut y = LATER_EVENTS_Y;
            for event in later {
                surface.draw_text(&event.long_display, MARGIN_X, y)?;
                y += LATER_EVENTS_STEP;
                blocks += 1;
            }
        }
    }

    surface.flush()?;

    Ok(blocks)
}

/// Replace the screen with a single message
pub fn render_message(surface: &mut dyn DisplaySurface, text: &str) -> AppResult<()> {
    surface.clear()?;
    surface.set_font(FontSize::Large);
    surface.draw_text(text, MESSAGE_X, MESSAGE_Y)?;
    surface.flush()
}
