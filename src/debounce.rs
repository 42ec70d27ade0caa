/*
 * Hold-to-confirm buttons.
 *
 * A button only counts once it has been held down, without letting go, for
 * the whole hold duration. Each button has its own hold timer: a rising
 * edge arms the button and starts the timer, a falling edge disarms it and
 * winds the timer back to the full duration. A press therefore cannot be
 * assembled from several shorter ones, and a bounce simply starts the wait
 * over.
 *
 * Once the timer runs out the button is confirmed. The confirmation stays
 * latched until the state machine actually commits a transition, so a
 * button held across a phase boundary is not lost. If the button is still
 * held after confirming, the timer starts again and the press confirms once
 * more a full hold duration later.
 */

use crate::config::Confirm;
use crate::countdown::PeriodicTimer;

#[derive(Debug)]
pub struct HoldButton<T> {
    timer: T,
    mode: Confirm,
    previous: bool,
    armed: bool,
    confirmed: bool,
}

impl<T: PeriodicTimer> HoldButton<T> {
    pub fn new(timer: T, mode: Confirm) -> Self {
        HoldButton {
            timer,
            mode,
            previous: false,
            armed: false,
            confirmed: false,
        }
    }

    /*
     * Feed one sample of the button level (true = pressed). Returns whether
     * this sample confirmed the press.
     */
    pub fn update(&mut self, level: bool) -> bool {
        let rising = level && !self.previous;
        let falling = !level && self.previous;
        self.previous = level;

        if rising {
            self.armed = true;
        } else if falling {
            self.armed = false;
        }

        if self.mode == Confirm::Edge {
            if rising && !self.confirmed {
                self.confirmed = true;
                return true;
            }
            return false;
        }

        if self.armed && !self.timer.is_running() {
            self.timer.start();
        } else if !self.armed {
            self.timer.stop();
            self.timer.reload();
        }

        if self.timer.poll_expired() {
            self.timer.stop();
            self.timer.clear_expired();
            self.timer.reload();
            if !self.confirmed {
                self.confirmed = true;
                return true;
            }
        }

        false
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /*
     * Called when a transition commits. Any expiry that fired but was not
     * yet seen by `update` is dropped too, otherwise it would confirm the
     * button again on the very next pass. The hold count carries on, so a
     * press that spans the transition still confirms one hold duration
     * after it began.
     */
    pub fn consume(&mut self) {
        self.confirmed = false;
        self.timer.clear_expired();
    }

    /// Wind the hold timer back to the full duration.
    pub fn restart(&mut self) {
        self.timer.reload();
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::Countdown;

    const HOLD: u32 = 5;

    // One pass of the polling loop: sample, then let a tick of time pass.
    fn pass(button: &mut HoldButton<Countdown>, level: bool) -> bool {
        let confirmed = button.update(level);
        button.timer_mut().tick();
        confirmed
    }

    fn hold_button() -> HoldButton<Countdown> {
        HoldButton::new(Countdown::new(HOLD), Confirm::Hold)
    }

    #[test]
    fn confirms_after_full_hold() {
        let mut button = hold_button();
        for _ in 0..HOLD {
            assert!(!pass(&mut button, true));
        }
        assert!(pass(&mut button, true));
        assert!(button.confirmed());
    }

    #[test]
    fn confirms_when_released_right_at_the_boundary() {
        let mut button = hold_button();
        for _ in 0..HOLD {
            pass(&mut button, true);
        }
        assert!(pass(&mut button, false));
    }

    #[test]
    fn short_presses_do_not_add_up() {
        let mut button = hold_button();
        for _ in 0..2 {
            for _ in 0..HOLD - 1 {
                pass(&mut button, true);
            }
            pass(&mut button, false);
        }
        for _ in 0..HOLD {
            pass(&mut button, false);
        }
        assert!(!button.confirmed());
    }

    #[test]
    fn release_stops_and_reloads_the_timer() {
        let mut button = hold_button();
        for _ in 0..HOLD / 2 {
            pass(&mut button, true);
        }
        assert!(button.timer().remaining() < HOLD);

        pass(&mut button, false);
        assert!(!button.timer().is_running());
        assert_eq!(button.timer().remaining(), HOLD);
        assert!(!button.confirmed());
        assert!(!button.is_armed());
    }

    #[test]
    fn confirmation_stays_latched_after_release() {
        let mut button = hold_button();
        for _ in 0..=HOLD {
            pass(&mut button, true);
        }
        for _ in 0..3 * HOLD {
            pass(&mut button, false);
        }
        assert!(button.confirmed());

        button.consume();
        assert!(!button.confirmed());
    }

    #[test]
    fn held_button_confirms_again_after_consume() {
        let mut button = hold_button();
        for _ in 0..=HOLD {
            pass(&mut button, true);
        }
        button.consume();

        let mut passes = 0;
        while !pass(&mut button, true) {
            passes += 1;
            assert!(passes <= 2 * HOLD);
        }
        assert!(button.confirmed());
    }

    #[test]
    fn consume_drops_an_unseen_expiry() {
        let mut button = hold_button();
        for _ in 0..HOLD {
            pass(&mut button, true);
        }
        assert!(button.timer_mut().poll_expired());
        button.consume();
        assert!(!button.update(true));
        assert!(!button.confirmed());
    }

    #[test]
    fn consume_keeps_the_hold_count() {
        let mut button = hold_button();
        pass(&mut button, true);
        pass(&mut button, true);
        assert_eq!(button.timer().remaining(), HOLD - 2);

        button.consume();
        assert_eq!(button.timer().remaining(), HOLD - 2);
        assert!(button.timer().is_running());

        for _ in 0..HOLD - 2 {
            assert!(!pass(&mut button, true));
        }
        assert!(pass(&mut button, true));
    }

    #[test]
    fn restart_winds_the_hold_back() {
        let mut button = hold_button();
        pass(&mut button, true);
        pass(&mut button, true);
        button.restart();
        assert_eq!(button.timer().remaining(), HOLD);
    }

    #[test]
    fn edge_mode_latches_on_rising_edge() {
        let mut button = HoldButton::new(Countdown::new(HOLD), Confirm::Edge);
        assert!(!pass(&mut button, false));
        assert!(pass(&mut button, true));
        assert!(!pass(&mut button, true));
        assert!(button.confirmed());
        assert!(!button.timer().is_running());
    }
}
