/*
 * Timing and policy knobs for the controller.
 *
 * Durations are kept as `embassy_time::Duration` so the firmware can hand
 * them straight to its timers, while the polling loop converts them into a
 * number of passes.
 */

use embassy_time::Duration;

use crate::error::Error;

/// How a button press becomes a confirmed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Confirm {
    /// The button must stay pressed for the full hold duration.
    Hold,
    /// A rising edge latches the button straight away.
    Edge,
}

/// Which confirmed-button rows of the state table ask for an immediate
/// transition instead of waiting for the transition timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestPolicy {
    /// Every start/stop row, and GO with pedestrian.
    Immediate,
    /// Only IDLE to STOP and GO to WARN. Turning the light off waits for
    /// the end of the current phase.
    Deferred,
    /// Buttons never hurry the light along.
    TimerOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub tick: Duration,
    pub hold: Duration,
    pub transition: Duration,
    pub confirm: Confirm,
    pub requests: RequestPolicy,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            tick: Duration::from_millis(10),
            hold: Duration::from_secs(2),
            transition: Duration::from_secs(5),
            confirm: Confirm::Hold,
            requests: RequestPolicy::Immediate,
        }
    }

    pub const fn with_tick(self, tick: Duration) -> Self {
        Config { tick, ..self }
    }

    pub const fn with_hold(self, hold: Duration) -> Self {
        Config { hold, ..self }
    }

    pub const fn with_transition(self, transition: Duration) -> Self {
        Config { transition, ..self }
    }

    pub const fn with_confirm(self, confirm: Confirm) -> Self {
        Config { confirm, ..self }
    }

    pub const fn with_requests(self, requests: RequestPolicy) -> Self {
        Config { requests, ..self }
    }

    pub fn validate(&self) -> Result<(), Error> {
        let tick = self.tick.as_micros();
        if tick == 0 || self.hold.as_micros() < tick || self.transition.as_micros() < tick {
            return Err(Error::Config);
        }
        Ok(())
    }

    /// The hold duration in polling passes. Only meaningful once validated.
    pub fn hold_ticks(&self) -> u32 {
        to_ticks(self.hold, self.tick)
    }

    /// The transition interval in polling passes.
    pub fn transition_ticks(&self) -> u32 {
        to_ticks(self.transition, self.tick)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn to_ticks(duration: Duration, tick: Duration) -> u32 {
    let tick = tick.as_micros().max(1);
    (duration.as_micros() / tick).min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_lab_timings() {
        let config = Config::default();
        assert_eq!(config.hold_ticks(), 200);
        assert_eq!(config.transition_ticks(), 500);
        assert_eq!(config.confirm, Confirm::Hold);
        assert_eq!(config.requests, RequestPolicy::Immediate);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn ticks_round_down() {
        let config = Config::new()
            .with_tick(Duration::from_millis(3))
            .with_hold(Duration::from_millis(10));
        assert_eq!(config.hold_ticks(), 3);
    }

    #[test]
    fn rejects_zero_tick() {
        let config = Config::new().with_tick(Duration::from_ticks(0));
        assert_eq!(config.validate(), Err(Error::Config));
    }

    #[test]
    fn rejects_duration_shorter_than_a_tick() {
        let config = Config::new()
            .with_tick(Duration::from_millis(100))
            .with_hold(Duration::from_millis(50));
        assert_eq!(config.validate(), Err(Error::Config));

        let config = Config::new()
            .with_tick(Duration::from_millis(100))
            .with_transition(Duration::from_millis(99));
        assert_eq!(config.validate(), Err(Error::Config));
    }
}
