/*
 * The traffic light drawn on an LCD instead of wired to LEDs.
 *
 * Each lamp is a filled circle in a row across the lower half of the
 * screen; a lamp that is off is painted over in the background colour.
 * Above the lamps sit the two virtual buttons and their labels. The layout
 * matches the 320x240 touch panel, whose raw touch coordinates for the
 * buttons live in `io`.
 *
 * Neither firmware image draws to a display yet: the board has no SSD2119
 * driver in this stack, so any `DrawTarget` a driver provides plugs in here.
 */

use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, PrimitiveStyle},
    text::{Baseline, Text},
};
use enum_ordinalize::Ordinalize;

use crate::error::Error;
use crate::render::{Light, LightSink};

pub const RADIUS: u32 = 20;

pub const BACKGROUND: Rgb565 = Rgb565::CYAN;
pub const START_STOP_COLOR: Rgb565 = Rgb565::BLACK;
pub const PEDESTRIAN_COLOR: Rgb565 = Rgb565::MAGENTA;
pub const LABEL_COLOR: Rgb565 = Rgb565::WHITE;

pub const START_STOP_CENTER: Point = Point::new(100, 120);
pub const PEDESTRIAN_CENTER: Point = Point::new(225, 120);
pub const START_STOP_LABEL: Point = Point::new(75, 90);
pub const PEDESTRIAN_LABEL: Point = Point::new(195, 90);

// Indexed by `Light`: red, yellow, green.
pub const LAMP_CENTERS: [Point; Light::VARIANT_COUNT] =
    [Point::new(80, 175), Point::new(245, 175), Point::new(163, 175)];
pub const LAMP_COLORS: [Rgb565; Light::VARIANT_COUNT] =
    [Rgb565::RED, Rgb565::YELLOW, Rgb565::GREEN];

pub struct DisplayLights<D> {
    display: D,
}

impl<D: DrawTarget<Color = Rgb565>> DisplayLights<D> {
    pub fn new(display: D) -> Self {
        DisplayLights { display }
    }

    /*
     * Paint the static part of the screen: background, the two buttons and
     * their labels. All lamps end up dark, so a renderer drawing on top of
     * this should start from a fresh cache.
     */
    pub fn draw_panel(&mut self) -> Result<(), Error> {
        self.display.clear(BACKGROUND).map_err(|_| Error::Display)?;

        self.fill_circle(START_STOP_CENTER, START_STOP_COLOR)?;
        self.fill_circle(PEDESTRIAN_CENTER, PEDESTRIAN_COLOR)?;

        self.print(START_STOP_LABEL, "Start/Stop")?;
        self.print(PEDESTRIAN_LABEL, "Pedestrian")
    }

    pub fn print(&mut self, position: Point, text: &str) -> Result<(), Error> {
        let style = MonoTextStyle::new(&FONT_6X10, LABEL_COLOR);
        Text::with_baseline(text, position, style, Baseline::Top)
            .draw(&mut self.display)
            .map(|_| ())
            .map_err(|_| Error::Display)
    }

    fn fill_circle(&mut self, center: Point, color: Rgb565) -> Result<(), Error> {
        Circle::with_center(center, 2 * RADIUS + 1)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.display)
            .map_err(|_| Error::Display)
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

impl<D: DrawTarget<Color = Rgb565>> LightSink for DisplayLights<D> {
    fn set(&mut self, light: Light, on: bool) -> Result<(), Error> {
        let index = light.ordinal();
        let color = if on { LAMP_COLORS[index] } else { BACKGROUND };
        self.fill_circle(LAMP_CENTERS[index], color)
    }
}
