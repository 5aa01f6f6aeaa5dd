//! RAM framebuffer with per-pixel change detection.
//!
//! Widgets draw into this buffer instead of the panel. After drawing, only the
//! rectangular region containing changed pixels is flushed to the real display
//! in a single `fill_contiguous` call.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::ui::geometry::Rect;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }
}

/// Heap-backed framebuffer implementing `DrawTarget<Color = Rgb565>`.
///
/// Tracks a dirty bounding box so that only changed pixels are flushed to the
/// hardware display.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRect>,
}

impl FrameBuffer {
    /// Allocate a framebuffer of `size` filled with black pixels.
    pub fn new(size: Size) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; width * height],
            dirty: None,
        }
    }

    /// Color at `point`, or `None` outside the buffer
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point.x, point.y).map(|idx| self.pixels[idx])
    }

    /// True if any pixel of `area` (clipped to the buffer) has `color`
    pub fn any_pixel_in(&self, area: Rect, color: Rgb565) -> bool {
        (area.y()..area.bottom()).any(|y| {
            (area.x()..area.right()).any(|x| self.pixel(Point::new(x, y)) == Some(color))
        })
    }

    /// Changed region since the last flush
    pub fn dirty_area(&self) -> Option<Rect> {
        self.dirty.map(|rect| {
            Rect::new(
                rect.min_x as i32,
                rect.min_y as i32,
                (rect.max_x - rect.min_x + 1) as i32,
                (rect.max_y - rect.min_y + 1) as i32,
            )
        })
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * self.width + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Flush the dirty region to a display, then reset the dirty state.
    ///
    /// If nothing changed, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let width = rect.max_x - rect.min_x + 1;
        let height = rect.max_y - rect.min_y + 1;

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            width, height, rect.min_x, rect.min_y
        );

        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32),
            Size::new(width as u32, height as u32),
        );

        let pixels = &self.pixels;
        let stride = self.width;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * stride + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if self.index(coord.x, coord.y).is_some() {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let x_start = (area.top_left.x.max(0) as usize).min(self.width);
        let y_start = (area.top_left.y.max(0) as usize).min(self.height);
        let x_end = (area.top_left.x + area.size.width as i32).clamp(0, self.width as i32) as usize;
        let y_end =
            (area.top_left.y + area.size.height as i32).clamp(0, self.height as i32) as usize;

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn test_dirty_area_tracks_changed_pixels_only() {
        let mut fb = FrameBuffer::new(Size::new(32, 16));
        assert_eq!(fb.dirty_area(), None);

        Rectangle::new(Point::new(2, 3), Size::new(4, 2))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.dirty_area(), Some(Rect::new(2, 3, 4, 2)));

        let mut target = FrameBuffer::new(Size::new(32, 16));
        fb.flush(&mut target).unwrap();
        assert_eq!(fb.dirty_area(), None);
        assert_eq!(target.pixel(Point::new(5, 4)), Some(Rgb565::RED));

        // Same color again is not a change.
        fb.fill_solid(&Rectangle::new(Point::new(2, 3), Size::new(1, 1)), Rgb565::RED)
            .unwrap();
        assert_eq!(fb.dirty_area(), None);
    }

    #[test]
    fn test_drawing_off_buffer_is_ignored() {
        let mut fb = FrameBuffer::new(Size::new(8, 8));
        fb.fill_solid(&Rectangle::new(Point::new(-4, -4), Size::new(6, 6)), Rgb565::BLUE)
            .unwrap();
        assert_eq!(fb.pixel(Point::new(1, 1)), Some(Rgb565::BLUE));
        assert_eq!(fb.pixel(Point::new(2, 2)), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(Point::new(-1, 0)), None);
    }
}
