//! Hub Light Show - Pet Training Hub Firmware
//!
//! Main firmware binary for RP2040-based training hubs. Once the hub is
//! ready, idle and untouched, it lights the three pads left to right in
//! green and turns them off again right to left, then waits for the next
//! chance to do it again.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

mod board;
mod config;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Light show firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();

    let hub = match board::build_hub(p) {
        Ok(hub) => hub,
        Err(e) => defmt::panic!("Board bring-up failed: {}", e),
    };
    info!("Hub wired: 3 pad lights, 3 pads, food machine sensors");

    spawner.spawn(tasks::show_task(hub, config)).unwrap();
    info!("Show task spawned");

    // Main loop - heartbeat
    loop {
        Timer::after_secs(60).await;
        trace!("Heartbeat");
    }
}
