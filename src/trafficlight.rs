/*
 * The traffic light state machine proper.
 *
 * Deciding where to go next and committing to it are kept apart. The
 * control loop works out the next state on every pass from the confirmed
 * buttons, but only moves there once a transition has been asked for, by
 * the transition timer or by a button row that wants to act at once.
 *
 * The lights follow the present state alone (Moore style): nothing here
 * looks at the next state to decide what to show.
 */

use enum_ordinalize::Ordinalize;

use crate::config::RequestPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Ordinalize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum State {
    Idle,
    Stop,
    Go,
    Warn,
}

/// The buttons that have been held long enough, as seen by one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confirmed {
    pub start_stop: bool,
    pub pedestrian: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub next: State,
    /// The row asks to move now instead of at the next timer expiry.
    pub request: bool,
}

impl State {
    /*
     * Decode a state that came from outside the type system. Anything that
     * is not a known state means the value was corrupted, and the light
     * goes back to IDLE.
     */
    pub fn from_raw(raw: u8) -> State {
        State::from_ordinal(raw).unwrap_or(State::Idle)
    }

    pub fn raw(self) -> u8 {
        self.ordinal()
    }

    /*
     * Determine the next state, without changing the state that we are in.
     * Start/stop is checked first in every state, so it wins over the
     * pedestrian button when both are confirmed.
     */
    pub fn decide(self, confirmed: Confirmed, policy: RequestPolicy) -> Decision {
        let (next, request) = match (self, confirmed.start_stop, confirmed.pedestrian) {
            (State::Idle, true, _) => (State::Stop, !matches!(policy, RequestPolicy::TimerOnly)),
            (State::Idle, false, _) => (State::Idle, false),

            (State::Stop, true, _) => (State::Idle, matches!(policy, RequestPolicy::Immediate)),
            (State::Stop, false, _) => (State::Go, false),

            (State::Go, true, _) => (State::Idle, matches!(policy, RequestPolicy::Immediate)),
            (State::Go, false, true) => (State::Warn, !matches!(policy, RequestPolicy::TimerOnly)),
            (State::Go, false, false) => (State::Stop, false),

            (State::Warn, true, _) => (State::Idle, matches!(policy, RequestPolicy::Immediate)),
            (State::Warn, false, _) => (State::Stop, false),
        };

        Decision { next, request }
    }

    pub fn red(self) -> bool {
        match self {
            State::Stop => true,
            State::Idle | State::Go | State::Warn => false,
        }
    }

    pub fn yellow(self) -> bool {
        match self {
            State::Warn => true,
            State::Idle | State::Stop | State::Go => false,
        }
    }

    pub fn green(self) -> bool {
        match self {
            State::Go => true,
            State::Idle | State::Stop | State::Warn => false,
        }
    }
}
