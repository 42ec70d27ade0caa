#![no_std]
#![no_main]

/*
 * The polling traffic light.
 *
 * A single loop does everything: once per tick it samples the buttons, runs
 * the state machine, and advances the controller's own countdowns. Waiting
 * for the next tick is the only time it sleeps.
 */

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_time::Ticker;
use panic_halt as _;

use trafficlight_fsm::io::{LedPins, PinButtons, Polarity};
use trafficlight_fsm::{Config, Controller};

const CONFIG: Config = Config::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());

    let lamps = LedPins::new(
        Output::new(peripherals.PE1, Level::Low, Speed::Low),
        Output::new(peripherals.PB9, Level::Low, Speed::Low),
        Output::new(peripherals.PB7, Level::Low, Speed::Low),
        false,
    );

    let buttons = PinButtons::new(
        Input::new(peripherals.PE11, Pull::Up),
        Input::new(peripherals.PE10, Pull::Up),
        Polarity::ActiveLow,
    );

    let mut trafficlight = Controller::polling(CONFIG, buttons, lamps).unwrap();
    let mut ticker = Ticker::every(CONFIG.tick);

    info!(
        "traffic light polling every {} ms",
        CONFIG.tick.as_millis()
    );

    loop {
        if let Err(error) = trafficlight.poll() {
            warn!("pass failed: {}", error);
        }
        ticker.next().await;
    }
}
