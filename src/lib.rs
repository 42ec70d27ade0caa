/*
 * A traffic light controller with hold-to-confirm buttons.
 *
 * The light is a small state machine: it sits dark in IDLE until the
 * start/stop button is held, then cycles between STOP and GO on a fixed
 * interval. Holding the pedestrian button during GO cuts the green short
 * through WARN. Holding start/stop at any point turns the light off again.
 *
 * Nothing in this library touches a particular board. Buttons, timers and
 * lights are reached through small capability traits, so the same control
 * loop runs from a tight polling loop, from timer events raised in another
 * context, or inside a unit test on the host.
 */

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

// This must come first so the macros are visible to the other modules.
#[macro_use]
mod fmt;

pub mod config;
pub mod control;
pub mod countdown;
pub mod debounce;
pub mod display;
pub mod error;
pub mod events;
pub mod io;
pub mod render;
pub mod trafficlight;

pub use config::{Config, Confirm, RequestPolicy};
pub use control::Controller;
pub use countdown::{Countdown, PeriodicTimer};
pub use error::Error;
pub use events::{Events, LatchedTimer, TimerId, run_timer};
pub use render::{Light, LightSink, Renderer};
pub use trafficlight::State;
