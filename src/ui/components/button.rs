// src/ui/components/button.rs
//! Button component with various styles and states

use crate::ui::core::{Action, Drawable, TouchEvent, TouchPoint, TouchResult, Touchable, Widget};
use crate::ui::error::UiResult;
use crate::ui::geometry::Rect;
use crate::ui::styling::{BorderRadius, ButtonVariant, ColorPalette, Style, Theme};
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::RoundedRectangle;
use embedded_graphics::text::{Alignment as TextAlignment, Baseline, Text, TextStyleBuilder};
use log::trace;

/// Button state
#[derive(Debug, Clone, Copy, PartialEq)]
enum ButtonState {
    Normal,
    Pressed,
    Disabled,
}

/// Button component with label and action
///
/// The action fires on pen-up inside the button. Sliding off before lifting
/// cancels it.
pub struct Button {
    bounds: Rect,
    local: Rect,
    label: heapless::String<32>,
    action: Action,
    state: ButtonState,
    /// Pen went down on this button and has not been lifted yet
    tracking: bool,
    variant: ButtonVariant,
    palette: ColorPalette,
    border_radius: u32,
    dirty: bool,
}

impl Button {
    pub fn new(bounds: Rect, label: &str, action: Action) -> Self {
        let mut label_string = heapless::String::new();
        label_string.push_str(label).ok();

        Self {
            bounds,
            local: bounds,
            label: label_string,
            action,
            state: ButtonState::Normal,
            tracking: false,
            variant: ButtonVariant::Primary,
            palette: ColorPalette::default(),
            border_radius: BorderRadius::default().medium,
            dirty: true,
        }
    }

    pub fn with_variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self.dirty = true;
        self
    }

    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self.dirty = true;
        self
    }

    /// Take the palette and the medium corner radius from a theme
    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.palette = theme.palette;
        self.border_radius = theme.border_radius.medium;
        self.dirty = true;
        self
    }

    pub fn with_border_radius(mut self, radius: u32) -> Self {
        self.border_radius = radius;
        self.dirty = true;
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        let new_state = if enabled {
            ButtonState::Normal
        } else {
            ButtonState::Disabled
        };

        if self.state != new_state {
            self.state = new_state;
            self.tracking = false;
            self.dirty = true;
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, ButtonState::Disabled)
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, ButtonState::Pressed)
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn set_state(&mut self, state: ButtonState) {
        if self.state != state {
            self.state = state;
            self.dirty = true;
        }
    }

    fn get_style(&self) -> Style {
        let base_style = self.variant.to_style(&self.palette);

        match self.state {
            ButtonState::Normal => base_style,
            ButtonState::Pressed => {
                // Darken the background for pressed state
                let bg = base_style.background_color.unwrap_or(self.palette.primary);
                let darkened = Rgb565::new(
                    bg.r().saturating_sub(4),
                    bg.g().saturating_sub(8),
                    bg.b().saturating_sub(4),
                );
                base_style.with_background(darkened)
            }
            ButtonState::Disabled => base_style
                .with_background(self.palette.surface)
                .with_foreground(self.palette.text_secondary),
        }
    }
}

impl Drawable for Button {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let style = self.get_style();

        let corner_radius = Size::new(self.border_radius, self.border_radius);
        RoundedRectangle::with_equal_corners(self.bounds.to_rectangle(), corner_radius)
            .into_styled(style.to_primitive_style())
            .draw(display)?;

        let text_color = style.foreground_color.unwrap_or(Rgb565::WHITE);
        let centered = TextStyleBuilder::new()
            .alignment(TextAlignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let center = self.bounds.to_rectangle().center();

        Text::with_text_style(
            &self.label,
            center,
            MonoTextStyle::new(&FONT_6X10, text_color),
            centered,
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

impl Touchable for Button {
    fn contains_point(&self, point: TouchPoint) -> bool {
        self.bounds.contains(point.to_point())
    }

    fn handle_touch(&mut self, event: TouchEvent) -> UiResult<TouchResult> {
        if !self.is_enabled() {
            return Ok(TouchResult::NotHandled);
        }

        let result = match event {
            TouchEvent::Press(point) if self.contains_point(point) => {
                self.tracking = true;
                self.set_state(ButtonState::Pressed);
                TouchResult::Handled
            }
            TouchEvent::Drag(point) if self.tracking => {
                // Pressed look follows the pen
                let new_state = if self.contains_point(point) {
                    ButtonState::Pressed
                } else {
                    ButtonState::Normal
                };
                self.set_state(new_state);
                TouchResult::Handled
            }
            TouchEvent::Release(point) if self.tracking => {
                self.tracking = false;
                self.set_state(ButtonState::Normal);
                if self.contains_point(point) {
                    trace!("Button '{}' activated", self.label);
                    TouchResult::Action(self.action)
                } else {
                    TouchResult::Handled
                }
            }
            _ => TouchResult::NotHandled,
        };
        Ok(result)
    }

    fn is_touching(&self) -> bool {
        self.tracking
    }
}

impl<D: DrawTarget<Color = Rgb565>> Widget<D> for Button {
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

    /// Enter or space activates on key-up
    fn handle_key(&mut self, key: char, pressed: bool) -> TouchResult {
        if !self.is_enabled() || !matches!(key, '\n' | '\r' | ' ') {
            return TouchResult::NotHandled;
        }
        if pressed {
            self.set_state(ButtonState::Pressed);
            TouchResult::Handled
        } else {
            self.set_state(ButtonState::Normal);
            TouchResult::Action(self.action)
        }
    }
}
