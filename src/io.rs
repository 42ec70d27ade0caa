/*
 * The I/O edge of the traffic light.
 *
 * This module adapts the device's inputs and outputs to the capabilities
 * the controller works with. The intention is for these adapters, together
 * with the firmware's `main`, to be the only place that knows how a button
 * or a lamp is wired.
 *
 * There are two kinds of buttons. Physical ones are plain GPIO inputs,
 * possibly active-low. Virtual ones are regions of a resistive touchscreen:
 * the panel reports one raw coordinate per read, and a button counts as
 * pressed while that coordinate lies inside its region. Both kinds are
 * sampled together, once per pass of the control loop.
 *
 * The DESPI-M02 images only wire up the GPIO buttons; the touch buttons wait
 * for a panel driver to hand them a `PointerInput`.
 */

use embedded_graphics::prelude::Point;
use embedded_hal::digital::{InputPin, OutputPin};
use enum_ordinalize::Ordinalize;

use crate::error::Error;
use crate::render::{Light, LightSink};

/// One sample of both buttons, true meaning pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonLevels {
    pub start_stop: bool,
    pub pedestrian: bool,
}

pub trait Buttons {
    fn sample(&mut self) -> Result<ButtonLevels, Error>;
}

impl<B: Buttons + ?Sized> Buttons for &mut B {
    fn sample(&mut self) -> Result<ButtonLevels, Error> {
        (**self).sample()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    fn pressed(self, high: bool) -> bool {
        match self {
            Polarity::ActiveHigh => high,
            Polarity::ActiveLow => !high,
        }
    }
}

pub struct PinButtons<S, P> {
    start_stop: S,
    pedestrian: P,
    polarity: Polarity,
}

impl<S: InputPin, P: InputPin> PinButtons<S, P> {
    pub fn new(start_stop: S, pedestrian: P, polarity: Polarity) -> Self {
        PinButtons {
            start_stop,
            pedestrian,
            polarity,
        }
    }
}

impl<S: InputPin, P: InputPin> Buttons for PinButtons<S, P> {
    fn sample(&mut self) -> Result<ButtonLevels, Error> {
        let start_stop = self.start_stop.is_high().map_err(|_| Error::Input)?;
        let pedestrian = self.pedestrian.is_high().map_err(|_| Error::Input)?;
        Ok(ButtonLevels {
            start_stop: self.polarity.pressed(start_stop),
            pedestrian: self.polarity.pressed(pedestrian),
        })
    }
}

/// A source of raw touch coordinates, in whatever range the panel uses.
pub trait PointerInput {
    fn read_point(&mut self) -> Result<Point, Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// Exclusive bounds on both axes. `bottom` is the smaller y.
    Rect {
        left: i32,
        right: i32,
        bottom: i32,
        top: i32,
    },
    Circle { center: Point, radius: u32 },
}

impl HitRegion {
    pub const fn rect(left: i32, right: i32, bottom: i32, top: i32) -> Self {
        HitRegion::Rect {
            left,
            right,
            bottom,
            top,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        match *self {
            HitRegion::Rect {
                left,
                right,
                bottom,
                top,
            } => left < point.x && point.x < right && bottom < point.y && point.y < top,
            HitRegion::Circle { center, radius } => {
                let dx = i64::from(point.x) - i64::from(center.x);
                let dy = i64::from(point.y) - i64::from(center.y);
                let radius = i64::from(radius);
                dx * dx + dy * dy < radius * radius
            }
        }
    }
}

// Raw panel coordinates of the two virtual buttons drawn by the display.
pub const START_STOP_REGION: HitRegion = HitRegion::rect(1000, 1400, 1200, 1500);
pub const PEDESTRIAN_REGION: HitRegion = HitRegion::rect(1550, 1840, 1200, 1500);

pub struct TouchButtons<T> {
    pointer: T,
    start_stop: HitRegion,
    pedestrian: HitRegion,
}

impl<T: PointerInput> TouchButtons<T> {
    pub fn new(pointer: T) -> Self {
        Self::with_regions(pointer, START_STOP_REGION, PEDESTRIAN_REGION)
    }

    pub fn with_regions(pointer: T, start_stop: HitRegion, pedestrian: HitRegion) -> Self {
        TouchButtons {
            pointer,
            start_stop,
            pedestrian,
        }
    }
}

impl<T: PointerInput> Buttons for TouchButtons<T> {
    fn sample(&mut self) -> Result<ButtonLevels, Error> {
        let point = self.pointer.read_point()?;
        Ok(ButtonLevels {
            start_stop: self.start_stop.contains(point),
            pedestrian: self.pedestrian.contains(point),
        })
    }
}

/// Three lamps on GPIO, indexed red, yellow, green.
pub struct LedPins<P> {
    pins: [P; Light::VARIANT_COUNT],
    active_low: bool,
}

impl<P: OutputPin> LedPins<P> {
    pub fn new(red: P, yellow: P, green: P, active_low: bool) -> Self {
        LedPins {
            pins: [red, yellow, green],
            active_low,
        }
    }
}

impl<P: OutputPin> LightSink for LedPins<P> {
    fn set(&mut self, light: Light, on: bool) -> Result<(), Error> {
        let pin = &mut self.pins[light.ordinal()];
        let high = on != self.active_low;
        if high {
            pin.set_high().map_err(|_| Error::Output)
        } else {
            pin.set_low().map_err(|_| Error::Output)
        }
    }
}
