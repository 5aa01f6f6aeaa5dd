// src/ui/components/text.rs
//! Static text label

use crate::ui::core::{Drawable, TouchEvent, TouchPoint, TouchResult, Touchable, Widget};
use crate::ui::error::UiResult;
use crate::ui::geometry::Rect;
use crate::ui::styling::{Padding, Style};
use crate::ui::tree::layout::fit_label;
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

/// Text size variants
///
/// Provides three preset text sizes with corresponding embedded-graphics fonts:
/// - `Small`: 5x8 font
/// - `Medium`: 6x10 font (default)
/// - `Large`: 10x20 font
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &embedded_graphics::mono_font::ascii::FONT_5X8,
            TextSize::Medium => &FONT_6X10,
            TextSize::Large => &embedded_graphics::mono_font::ascii::FONT_10X20,
        }
    }
}

/// Single line of styled text
///
/// Text wider than the label is cut with an ellipsis. Labels never take the
/// pen, so touches fall through to whatever container holds them.
///
/// # Examples
/// ```ignore
/// let title = Label::new(Rect::new(0, 0, 200, 16), "Settings", TextSize::Large)
///     .with_alignment(Alignment::Center);
/// panel.add_child(title);
/// ```
pub struct Label {
    bounds: Rect,
    local: Rect,
    text: heapless::String<64>,
    size: TextSize,
    alignment: Alignment,
    style: Style,
    dirty: bool,
}

impl Label {
    pub fn new(bounds: Rect, text: &str, size: TextSize) -> Self {
        let mut text_string = heapless::String::new();
        text_string.push_str(text).ok();

        Self {
            bounds,
            local: bounds,
            text: text_string,
            size,
            alignment: Alignment::Left,
            style: Style::default(),
            dirty: true,
        }
    }

    /// Set the text alignment (Left, Center, or Right).
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Update the displayed text. Marks the label dirty only if it changed.
    pub fn set_text(&mut self, text: &str) {
        let mut new_text = heapless::String::new();
        new_text.push_str(text).ok();

        if self.text != new_text {
            self.text = new_text;
            self.dirty = true;
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn text_position(&self) -> Point {
        let top = self.bounds.y() + self.style.padding.top as i32;
        match self.alignment {
            Alignment::Left => Point::new(self.bounds.x() + self.style.padding.left as i32, top),
            Alignment::Center => Point::new(self.bounds.x() + self.bounds.width() / 2, top),
            Alignment::Right => Point::new(
                self.bounds.right() - self.style.padding.right as i32,
                top,
            ),
        }
    }
}

impl Drawable for Label {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        if self.style.is_visible() {
            self.bounds
                .to_rectangle()
                .into_styled(self.style.to_primitive_style())
                .draw(display)?;
        }

        let font = self.size.font();
        let room = self.bounds.width() - self.style.padding.horizontal() as i32;
        let fitted = fit_label(&self.text, room, font);
        if fitted.is_empty() {
            return Ok(());
        }

        let text_color = self.style.foreground_color.unwrap_or(Rgb565::WHITE);
        let text_style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(Baseline::Top)
            .build();

        Text::with_text_style(
            &fitted,
            self.text_position(),
            MonoTextStyle::new(font, text_color),
            text_style,
        )
        .draw(display)?;

        Ok(())
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Touchable for Label {
    fn contains_point(&self, point: TouchPoint) -> bool {
        self.bounds.contains(point.to_point())
    }

    fn handle_touch(&mut self, _event: TouchEvent) -> UiResult<TouchResult> {
        Ok(TouchResult::NotHandled)
    }
}

impl<D: DrawTarget<Color = Rgb565>> Widget<D> for Label {
    fn render(&mut self, display: &mut D) -> Result<(), D::Error> {
        self.draw(display)?;
        self.mark_clean();
        Ok(())
    }

    fn screen_bounds(&self) -> Rect {
        self.bounds
    }

    fn local_bounds(&self) -> Rect {
        self.local
    }

    fn update_offsets(&mut self, offset: Point) {
        let moved = self.local.translate(offset);
        if moved != self.bounds {
            self.bounds = moved;
            self.dirty = true;
        }
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }
}
