//! Light show task
//!
//! Owns the hub and the stepper. Each tick gives the hub its time budget,
//! then polls the stepper once. The stepper never blocks, so the hub keeps
//! getting serviced while a pass waits out its holds.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};
use lightshow_core::config::{ShowConfig, APP_NAME};
use lightshow_core::sequence::{LightShow, ShowEvent};
use lightshow_core::traits::HubDriver;

use crate::board::BoardHub;

/// Light show task - runs passes forever
#[embassy_executor::task]
pub async fn show_task(mut hub: BoardHub, config: ShowConfig) {
    info!("Show task started");

    hub.initialize(APP_NAME);

    let budget_ms = config.hub_budget_ms;
    let mut show = LightShow::new(config);

    // Tick at the hub budget so one loop costs roughly one budget
    let mut ticker = Ticker::every(Duration::from_millis(budget_ms.max(1) as u64));

    loop {
        ticker.next().await;

        hub.run(budget_ms);

        if let Some(fault) = hub.take_fault() {
            warn!("Hub fault: {}", fault);
        }

        let now_ms = Instant::now().as_millis();
        if let Some(event) = show.poll(&mut hub, now_ms) {
            log_event(&show, event, hub.resyncs());
        }
    }
}

fn log_event(show: &LightShow, event: ShowEvent, resyncs: u32) {
    match event {
        ShowEvent::PassStarted => {
            info!(
                "{}: pass started, {}ms to go",
                show.config().player_name.as_str(),
                show.config().pass_duration_ms()
            );
        }
        ShowEvent::LightChanged { position, color } => {
            let stage = show.stage().map_or(0, |i| i + 1);
            debug!("Stage {}/6: light {} -> {}", stage, position, color);
        }
        ShowEvent::PassComplete => {
            info!(
                "{}: pass complete ({} total, {} pad resyncs)",
                show.config().player_name.as_str(),
                show.passes_completed(),
                resyncs
            );
        }
        ShowEvent::GateTimedOut(blocker) => {
            let gate = show.gate();
            let waited_ms = gate.timeout_ms().unwrap_or(0) as u64 * gate.timeouts() as u64;
            warn!("Hub still busy after {}ms: {}", waited_ms, blocker);
        }
        ShowEvent::Aborted => {
            warn!("Pass aborted");
        }
    }
}
