/*
 * The control loop.
 *
 * One pass samples both buttons, feeds them to their hold debouncers, works
 * out the next state, shows the present state, and then commits to the next
 * state if a transition is due. A transition is due when the transition
 * timer has run out, or when the row of the state table picked by the
 * confirmed buttons asks to move right away. Both causes landing in the same
 * pass make a single transition.
 *
 * Committing clears both button confirmations and restarts the transition
 * timer, so the next automatic transition is a full interval after this one
 * rather than on the old schedule. A hold that fired but was not yet seen is
 * dropped, so it cannot confirm a button again straight after the change.
 * The pedestrian hold also starts over, since a pedestrian press only means
 * something against the state it was made in. A start/stop hold keeps
 * counting across the change.
 *
 * The controller does not care where time comes from. The polling light
 * owns `Countdown`s and calls `poll`, which advances them by one tick after
 * each pass. The interrupt-driven light hands it `LatchedTimer`s that run
 * on their own, and calls `step` whenever it is woken.
 */

use crate::config::Config;
use crate::countdown::{Countdown, PeriodicTimer};
use crate::debounce::HoldButton;
use crate::error::Error;
use crate::io::Buttons;
use crate::render::{LightSink, Renderer};
use crate::trafficlight::{Confirmed, State};

pub struct Controller<B, T, O> {
    config: Config,
    buttons: B,
    start_stop: HoldButton<T>,
    pedestrian: HoldButton<T>,
    transition: T,
    renderer: Renderer<O>,
    state: State,
    next: State,
    transition_requested: bool,
}

impl<B: Buttons, T: PeriodicTimer, O: LightSink> Controller<B, T, O> {
    /*
     * `start_stop_hold`, `pedestrian_hold` and `transition` are the three
     * timers, each set up for its own duration. The transition timer is
     * started here and runs for as long as the controller does.
     */
    pub fn new(
        config: Config,
        buttons: B,
        start_stop_hold: T,
        pedestrian_hold: T,
        mut transition: T,
        lights: O,
    ) -> Result<Self, Error> {
        config.validate()?;

        transition.clear_expired();
        transition.reload();
        transition.start();

        Ok(Controller {
            config,
            buttons,
            start_stop: HoldButton::new(start_stop_hold, config.confirm),
            pedestrian: HoldButton::new(pedestrian_hold, config.confirm),
            transition,
            renderer: Renderer::new(lights),
            state: State::Idle,
            next: State::Idle,
            transition_requested: false,
        })
    }

    /*
     * Run one pass of the loop and return the state it leaves behind. If an
     * adapter fails, the light falls back to IDLE with every lamp off before
     * the error is handed back.
     */
    pub fn step(&mut self) -> Result<State, Error> {
        match self.pass() {
            Ok(()) => Ok(self.state),
            Err(error) => {
                warn!("controller failed: {}, falling back to idle", error);
                self.fail_safe();
                Err(error)
            }
        }
    }

    fn pass(&mut self) -> Result<(), Error> {
        let levels = self.buttons.sample()?;

        if self.start_stop.update(levels.start_stop) {
            debug!("start/stop confirmed");
        }
        if self.pedestrian.update(levels.pedestrian) {
            debug!("pedestrian confirmed");
        }

        let decision = self.state.decide(self.confirmed(), self.config.requests);
        self.next = decision.next;
        self.transition_requested |= decision.request;

        self.renderer.render(self.state)?;

        let expired = self.transition.poll_expired();
        if self.transition_requested || expired {
            self.commit(expired);
        }

        Ok(())
    }

    fn commit(&mut self, expired: bool) {
        info!(
            "{} -> {} ({})",
            self.state,
            self.next,
            if expired { "timer" } else { "button" }
        );

        self.state = self.next;
        self.transition_requested = false;
        self.start_stop.consume();
        self.pedestrian.consume();
        self.pedestrian.restart();

        self.transition.clear_expired();
        self.transition.reload();
    }

    /*
     * Drop everything back to a dark IDLE. Lamps are switched off on a
     * best-effort basis; a sink that is failing may not manage it.
     */
    pub fn fail_safe(&mut self) {
        self.state = State::Idle;
        self.next = State::Idle;
        self.transition_requested = false;
        self.start_stop.consume();
        self.start_stop.restart();
        self.pedestrian.consume();
        self.pedestrian.restart();
        self.transition.clear_expired();
        self.transition.reload();
        let _ = self.renderer.blank();
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The state the light would move to if a transition happened now.
    pub fn next_state(&self) -> State {
        self.next
    }

    pub fn confirmed(&self) -> Confirmed {
        Confirmed {
            start_stop: self.start_stop.confirmed(),
            pedestrian: self.pedestrian.confirmed(),
        }
    }

    pub fn transition_timer(&self) -> &T {
        &self.transition
    }

    pub fn renderer(&self) -> &Renderer<O> {
        &self.renderer
    }

    pub fn buttons_mut(&mut self) -> &mut B {
        &mut self.buttons
    }
}

impl<B: Buttons, O: LightSink> Controller<B, Countdown, O> {
    /// A controller whose timers are counted in passes of `poll`.
    pub fn polling(config: Config, buttons: B, lights: O) -> Result<Self, Error> {
        config.validate()?;
        let hold = config.hold_ticks();
        Self::new(
            config,
            buttons,
            Countdown::new(hold),
            Countdown::new(hold),
            Countdown::new(config.transition_ticks()),
            lights,
        )
    }

    /*
     * One pass of the polling loop, after which one tick of time has gone
     * by. The caller paces the calls at `config.tick`.
     */
    pub fn poll(&mut self) -> Result<State, Error> {
        let result = self.step();
        self.start_stop.timer_mut().tick();
        self.pedestrian.timer_mut().tick();
        self.transition.tick();
        result
    }
}
