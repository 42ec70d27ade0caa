#![no_std]
#![no_main]

/*
 * The interrupt-driven traffic light.
 *
 * The two hold timers and the transition timer each run in their own task
 * and only report back when they run out. The control task sleeps until one
 * of them does, or until the next sampling tick comes round, and then runs
 * a single pass of the state machine.
 */

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::select;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_time::{Duration, Ticker};
use panic_halt as _;

use trafficlight_fsm::io::{LedPins, PinButtons, Polarity};
use trafficlight_fsm::{Config, Controller, Events, LatchedTimer, TimerId, run_timer};

type Buttons = PinButtons<Input<'static>, Input<'static>>;
type Lamps = LedPins<Output<'static>>;
type TrafficLight = Controller<Buttons, LatchedTimer<'static, ThreadModeRawMutex>, Lamps>;

const CONFIG: Config = Config::new();

// Button levels are re-read this often even when no timer fires, so a press
// or release is seen promptly.
const SAMPLE_PERIOD: Duration = Duration::from_millis(10);

static EVENTS: Events<ThreadModeRawMutex> = Events::new();

#[embassy_executor::task(pool_size = 3)]
async fn timer_task(id: TimerId, duration: Duration) -> ! {
    run_timer(&EVENTS, id, duration).await
}

#[embassy_executor::task]
async fn control_task(mut trafficlight: TrafficLight) -> ! {
    let mut ticker = Ticker::every(SAMPLE_PERIOD);

    loop {
        if let Err(error) = trafficlight.step() {
            warn!("pass failed: {}", error);
        }

        select(EVENTS.wait(), ticker.next()).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());

    let lamps = LedPins::new(
        Output::new(peripherals.PE1, Level::Low, Speed::Low),
        Output::new(peripherals.PB9, Level::Low, Speed::Low),
        Output::new(peripherals.PB7, Level::Low, Speed::Low),
        false,
    );

    // Start/stop is the on-board button; pedestrian is a push button from
    // PE10 to ground. Both read low while pressed.
    let buttons = PinButtons::new(
        Input::new(peripherals.PE11, Pull::Up),
        Input::new(peripherals.PE10, Pull::Up),
        Polarity::ActiveLow,
    );

    let trafficlight = Controller::new(
        CONFIG,
        buttons,
        EVENTS.timer(TimerId::StartStopHold),
        EVENTS.timer(TimerId::PedestrianHold),
        EVENTS.timer(TimerId::Transition),
        lamps,
    )
    .unwrap();

    spawner
        .spawn(timer_task(TimerId::StartStopHold, CONFIG.hold))
        .unwrap();
    spawner
        .spawn(timer_task(TimerId::PedestrianHold, CONFIG.hold))
        .unwrap();
    spawner
        .spawn(timer_task(TimerId::Transition, CONFIG.transition))
        .unwrap();
    spawner.spawn(control_task(trafficlight)).unwrap();

    info!("traffic light running");
}
