/*
 * Turning the present state into lit lamps.
 *
 * The renderer remembers what it last told each indicator and only passes
 * on a change. On LED pins that merely saves a few register writes, but on
 * a display every lamp is a filled circle, and redrawing three of them on
 * every pass is slow enough to flicker.
 *
 * Before the first call nothing is known about the indicators, so that call
 * writes all three once. After that, rendering the same state again writes
 * nothing at all.
 */

use enum_ordinalize::Ordinalize;

use crate::error::Error;
use crate::trafficlight::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Ordinalize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum Light {
    Red,
    Yellow,
    Green,
}

/// Something that can switch a single indicator on or off.
pub trait LightSink {
    fn set(&mut self, light: Light, on: bool) -> Result<(), Error>;
}

impl<S: LightSink + ?Sized> LightSink for &mut S {
    fn set(&mut self, light: Light, on: bool) -> Result<(), Error> {
        (**self).set(light, on)
    }
}

/// The indicator levels for a state. At most one of them is ever on.
pub fn lights_for(state: State) -> [bool; Light::VARIANT_COUNT] {
    let mut lights = [false; Light::VARIANT_COUNT];
    lights[Light::Red.ordinal()] = state.red();
    lights[Light::Yellow.ordinal()] = state.yellow();
    lights[Light::Green.ordinal()] = state.green();
    lights
}

pub struct Renderer<O> {
    sink: O,
    drawn: [Option<bool>; Light::VARIANT_COUNT],
}

impl<O: LightSink> Renderer<O> {
    pub fn new(sink: O) -> Self {
        Renderer {
            sink,
            drawn: [None; Light::VARIANT_COUNT],
        }
    }

    pub fn render(&mut self, state: State) -> Result<(), Error> {
        let wanted = lights_for(state);

        // Switch lamps off before switching the new one on, so that there is
        // never a moment with two lamps lit.
        for on in [false, true] {
            for &light in Light::VARIANTS {
                let index = light.ordinal();
                if wanted[index] == on && self.drawn[index] != Some(on) {
                    // Forget the lamp if the write fails, so it is retried.
                    self.drawn[index] = None;
                    self.sink.set(light, on)?;
                    self.drawn[index] = Some(on);
                }
            }
        }

        Ok(())
    }

    /*
     * Force every lamp off regardless of what was drawn before, trying all
     * of them even if one fails. Returns the first failure.
     */
    pub fn blank(&mut self) -> Result<(), Error> {
        let mut result = Ok(());
        for &light in Light::VARIANTS {
            let index = light.ordinal();
            match self.sink.set(light, false) {
                Ok(()) => self.drawn[index] = Some(false),
                Err(error) => {
                    self.drawn[index] = None;
                    if result.is_ok() {
                        result = Err(error);
                    }
                }
            }
        }
        result
    }

    /// What the renderer believes each lamp shows, `None` if unknown.
    pub fn drawn(&self, light: Light) -> Option<bool> {
        self.drawn[light.ordinal()]
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.sink
    }
}
