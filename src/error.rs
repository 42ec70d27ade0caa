/*
 * The controller has almost nothing that can go wrong: its inputs are
 * booleans and counters. What remains are a configuration that cannot be
 * turned into whole ticks, and the adapters at the edge, whose pins or
 * display may report a failure. The control loop answers any of these by
 * falling back to IDLE with every light off.
 */

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The tick is zero, or a duration is shorter than one tick.
    Config,
    /// A button or pointer read failed.
    Input,
    /// Driving an indicator pin failed.
    Output,
    /// Drawing on the display failed.
    Display,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config => f.write_str("invalid timing configuration"),
            Error::Input => f.write_str("button input failed"),
            Error::Output => f.write_str("light output failed"),
            Error::Display => f.write_str("display draw failed"),
        }
    }
}

impl core::error::Error for Error {}
