/*
 * Timer events shared between the timers and the control loop.
 *
 * In the interrupt-driven light, the two hold timers and the transition
 * timer run on their own and only report back that they have run out. The
 * control loop, running in its own context, picks those reports up on its
 * next pass. Every piece of shared state here is an atomic, and each side
 * only ever sets or clears whole flags, so correctness does not hinge on
 * which context may preempt which.
 *
 * Expiry is raised with `fire`. That can come from the async `run_timer`
 * below, or straight from a hardware interrupt handler. Either way the
 * control loop is woken through `wait`, which takes the place of spinning
 * on the flags.
 */

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_futures::select::{Either, select};
use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use embassy_time::{Duration, Timer};
use enum_ordinalize::Ordinalize;

use crate::countdown::PeriodicTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Ordinalize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum TimerId {
    StartStopHold,
    PedestrianHold,
    Transition,
}

struct TimerSlot<M: RawMutex> {
    running: AtomicBool,
    // Bumped on every reload, so a timer that was already waiting can tell
    // that its wait no longer counts.
    generation: AtomicU32,
    expired: AtomicBool,
    changed: Signal<M, ()>,
}

impl<M: RawMutex> TimerSlot<M> {
    const fn new() -> Self {
        TimerSlot {
            running: AtomicBool::new(false),
            generation: AtomicU32::new(0),
            expired: AtomicBool::new(false),
            changed: Signal::new(),
        }
    }
}

pub struct Events<M: RawMutex> {
    timers: [TimerSlot<M>; TimerId::VARIANT_COUNT],
    wake: Signal<M, ()>,
}

impl<M: RawMutex> Events<M> {
    pub const fn new() -> Self {
        Events {
            timers: [TimerSlot::new(), TimerSlot::new(), TimerSlot::new()],
            wake: Signal::new(),
        }
    }

    fn slot(&self, id: TimerId) -> &TimerSlot<M> {
        &self.timers[id.ordinal()]
    }

    /// Report that a timer ran out and wake the control loop.
    pub fn fire(&self, id: TimerId) {
        self.slot(id).expired.store(true, Ordering::Release);
        self.wake.signal(());
    }

    pub fn is_expired(&self, id: TimerId) -> bool {
        self.slot(id).expired.load(Ordering::Acquire)
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.slot(id).running.load(Ordering::Acquire)
    }

    /// Wait until some timer fires.
    pub async fn wait(&self) {
        self.wake.wait().await
    }

    pub fn timer(&self, id: TimerId) -> LatchedTimer<'_, M> {
        LatchedTimer { events: self, id }
    }
}

impl<M: RawMutex> Default for Events<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// The control loop's handle on one of the timers in `Events`.
pub struct LatchedTimer<'a, M: RawMutex> {
    events: &'a Events<M>,
    id: TimerId,
}

impl<M: RawMutex> PeriodicTimer for LatchedTimer<'_, M> {
    fn start(&mut self) {
        let slot = self.events.slot(self.id);
        if !slot.running.swap(true, Ordering::AcqRel) {
            slot.changed.signal(());
        }
    }

    fn stop(&mut self) {
        let slot = self.events.slot(self.id);
        if slot.running.swap(false, Ordering::AcqRel) {
            slot.changed.signal(());
        }
    }

    fn reload(&mut self) {
        let slot = self.events.slot(self.id);
        slot.generation.fetch_add(1, Ordering::AcqRel);
        if slot.running.load(Ordering::Acquire) {
            slot.changed.signal(());
        }
    }

    fn is_running(&self) -> bool {
        self.events.is_running(self.id)
    }

    fn poll_expired(&mut self) -> bool {
        self.events.is_expired(self.id)
    }

    fn clear_expired(&mut self) {
        self.events.slot(self.id).expired.store(false, Ordering::Release);
    }
}

/*
 * Drive one timer of `events` as a periodic timer of `duration`.
 *
 * While stopped it just waits to be started. While running, any start or
 * reload begins a fresh full interval. When an interval runs out the timer
 * fires and goes round again, like a periodic hardware timer; the hold
 * timers are stopped by their button once they have fired.
 */
pub async fn run_timer<M: RawMutex>(events: &Events<M>, id: TimerId, duration: Duration) -> ! {
    let slot = events.slot(id);
    trace!("timer {} running every {} ms", id, duration.as_millis());

    loop {
        if !slot.running.load(Ordering::Acquire) {
            slot.changed.wait().await;
            continue;
        }

        let generation = slot.generation.load(Ordering::Acquire);
        match select(Timer::after(duration), slot.changed.wait()).await {
            Either::First(()) => {
                if slot.running.load(Ordering::Acquire)
                    && slot.generation.load(Ordering::Acquire) == generation
                {
                    events.fire(id);
                }
            }
            Either::Second(()) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::future::Future;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_time::Instant;

    const PERIOD: Duration = Duration::from_millis(100);

    // Run `body` alongside the task driving `id`, until `body` finishes.
    fn with_timer<R>(
        events: &Events<NoopRawMutex>,
        id: TimerId,
        body: impl Future<Output = R>,
    ) -> R {
        match block_on(select(run_timer(events, id, PERIOD), body)) {
            Either::First(never) => match never {},
            Either::Second(result) => result,
        }
    }

    #[test]
    fn fire_latches_until_cleared() {
        let events: Events<NoopRawMutex> = Events::new();
        let mut timer = events.timer(TimerId::Transition);
        assert!(!timer.poll_expired());

        events.fire(TimerId::Transition);
        assert!(timer.poll_expired());
        assert!(timer.poll_expired());
        assert!(!events.is_expired(TimerId::StartStopHold));

        timer.clear_expired();
        assert!(!timer.poll_expired());
    }

    #[test]
    fn fire_wakes_the_waiter() {
        let events: Events<NoopRawMutex> = Events::new();
        events.fire(TimerId::PedestrianHold);
        block_on(events.wait());
        assert!(events.is_expired(TimerId::PedestrianHold));
    }

    #[test]
    fn start_and_stop_signal_only_on_change() {
        let events: Events<NoopRawMutex> = Events::new();
        let mut timer = events.timer(TimerId::StartStopHold);
        let slot = events.slot(TimerId::StartStopHold);

        timer.start();
        assert!(timer.is_running());
        assert!(slot.changed.try_take().is_some());

        timer.start();
        assert!(slot.changed.try_take().is_none());

        timer.stop();
        assert!(!timer.is_running());
        assert!(slot.changed.try_take().is_some());

        timer.stop();
        assert!(slot.changed.try_take().is_none());
    }

    #[test]
    fn reload_restarts_a_running_timer() {
        let events: Events<NoopRawMutex> = Events::new();
        let mut timer = events.timer(TimerId::Transition);
        let slot = events.slot(TimerId::Transition);

        timer.reload();
        assert_eq!(slot.generation.load(Ordering::Acquire), 1);
        assert!(slot.changed.try_take().is_none());

        timer.start();
        slot.changed.reset();
        timer.reload();
        assert_eq!(slot.generation.load(Ordering::Acquire), 2);
        assert!(slot.changed.try_take().is_some());
    }

    #[test]
    fn stop_keeps_a_fired_expiry() {
        let events: Events<NoopRawMutex> = Events::new();
        let mut timer = events.timer(TimerId::PedestrianHold);
        timer.start();
        events.fire(TimerId::PedestrianHold);
        timer.stop();
        timer.reload();
        assert!(timer.poll_expired());
    }

    #[test]
    fn started_timer_fires_after_its_period() {
        let events: Events<NoopRawMutex> = Events::new();
        let elapsed = with_timer(&events, TimerId::Transition, async {
            let started = Instant::now();
            events.timer(TimerId::Transition).start();
            events.wait().await;
            started.elapsed()
        });

        assert!(events.is_expired(TimerId::Transition));
        assert!(elapsed >= PERIOD);
    }

    #[test]
    fn reload_pushes_expiry_out_by_a_full_period() {
        let events: Events<NoopRawMutex> = Events::new();
        let elapsed = with_timer(&events, TimerId::Transition, async {
            let mut timer = events.timer(TimerId::Transition);
            timer.start();
            Timer::after(PERIOD / 2).await;

            let reloaded = Instant::now();
            timer.reload();

            // Past the point where the first interval would have run out.
            Timer::after(PERIOD * 3 / 4).await;
            assert!(!timer.poll_expired());

            events.wait().await;
            reloaded.elapsed()
        });

        assert!(events.is_expired(TimerId::Transition));
        assert!(elapsed >= PERIOD);
    }

    #[test]
    fn stopped_timer_never_fires() {
        let events: Events<NoopRawMutex> = Events::new();
        with_timer(&events, TimerId::PedestrianHold, async {
            let mut timer = events.timer(TimerId::PedestrianHold);
            timer.start();
            Timer::after(PERIOD / 2).await;
            timer.stop();
            Timer::after(PERIOD * 2).await;
        });

        assert!(!events.is_expired(TimerId::PedestrianHold));
        assert!(!events.is_running(TimerId::PedestrianHold));
    }
}
