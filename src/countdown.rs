/*
 * Timers as the control loop sees them.
 *
 * The loop only ever starts, stops and reloads a timer, and asks whether it
 * has run out. `PeriodicTimer` captures exactly that, so a hardware timer
 * with an expiry interrupt and a counter that the loop advances itself look
 * the same from the outside.
 *
 * `Countdown` is the second kind. In order to keep the loop testable, time
 * is kept outside it: whoever drives the loop calls `tick` once per pass.
 * It behaves like the periodic down-counters on the lab board: on reaching
 * zero it raises its expiry flag, reloads, and carries on counting. Stopping
 * or reloading leaves a raised flag alone; only `clear_expired` lowers it.
 */

pub trait PeriodicTimer {
    fn start(&mut self);
    fn stop(&mut self);
    /// Reset the count to the full duration without changing whether the
    /// timer runs.
    fn reload(&mut self);
    fn is_running(&self) -> bool;
    /// Whether the timer has run out since the flag was last cleared.
    fn poll_expired(&mut self) -> bool;
    fn clear_expired(&mut self);
}

#[derive(Debug, Clone)]
pub struct Countdown {
    reload_value: u32,
    remaining: u32,
    running: bool,
    expired: bool,
}

impl Countdown {
    /// A stopped countdown of `ticks` passes. A zero length is treated as one.
    pub const fn new(ticks: u32) -> Self {
        let ticks = if ticks == 0 { 1 } else { ticks };
        Countdown {
            reload_value: ticks,
            remaining: ticks,
            running: false,
            expired: false,
        }
    }

    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        self.remaining -= 1;
        if self.remaining == 0 {
            self.expired = true;
            self.remaining = self.reload_value;
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl PeriodicTimer for Countdown {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn reload(&mut self) {
        self.remaining = self.reload_value;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn poll_expired(&mut self) -> bool {
        self.expired
    }

    fn clear_expired(&mut self) {
        self.expired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_count_while_stopped() {
        let mut countdown = Countdown::new(3);
        for _ in 0..10 {
            countdown.tick();
        }
        assert_eq!(countdown.remaining(), 3);
        assert!(!countdown.poll_expired());
    }

    #[test]
    fn expires_after_full_duration_and_keeps_running() {
        let mut countdown = Countdown::new(3);
        countdown.start();

        countdown.tick();
        countdown.tick();
        assert!(!countdown.poll_expired());

        countdown.tick();
        assert!(countdown.poll_expired());
        assert!(countdown.is_running());
        assert_eq!(countdown.remaining(), 3);
    }

    #[test]
    fn expiry_latches_until_cleared() {
        let mut countdown = Countdown::new(1);
        countdown.start();
        countdown.tick();

        countdown.stop();
        countdown.reload();
        assert!(countdown.poll_expired());

        countdown.clear_expired();
        assert!(!countdown.poll_expired());
    }

    #[test]
    fn reload_restarts_the_count() {
        let mut countdown = Countdown::new(4);
        countdown.start();
        countdown.tick();
        countdown.tick();
        countdown.tick();
        countdown.reload();
        for _ in 0..3 {
            countdown.tick();
        }
        assert!(!countdown.poll_expired());
        countdown.tick();
        assert!(countdown.poll_expired());
    }
}
