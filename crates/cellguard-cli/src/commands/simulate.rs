use cellguard_access::{AccessController, IntentMatcher, PulseOutcome};
use cellguard_config::CellGuardConfig;
use cellguard_core::{AccessEvent, AccessState, Clock, ManualClock, Timestamp};
use std::time::Duration;
use tokio::sync::broadcast::Receiver;
use tracing::debug;

use crate::dashboard;

const CONFIRMED_PULSES: usize = 5;
const MAX_ABSENT_PULSES: usize = 15;
/// How close to the deadline the operator's departure is fast-forwarded.
const LEAD_IN: Duration = Duration::from_secs(5);

/// Scripted audit on a manual clock. Real-time pauses are scaled by `pace`.
/// Returns the state the controller finished in.
pub async fn cmd_simulate(
    config: &CellGuardConfig,
    identity: &str,
    phrase: &str,
    pace: f64,
) -> cellguard_core::Result<AccessState> {
    let controller = AccessController::from_config(config)?;
    let matcher = IntentMatcher::new(&config.handshake.intents);
    let clock = ManualClock::new(Timestamp::EPOCH);
    let mut events = controller.subscribe();

    println!("{}", dashboard::banner());

    // 1. Standby
    controller.presence_tick(false, clock.now());
    dashboard::draw(&controller.snapshot(clock.now()))?;
    pause(pace, 1.0).await;

    // 2. Badge in
    println!("\n\n[ACTION] {identity} badging in with \"{phrase}\"...");
    let factor = matcher.confirms(phrase);
    if let Err(reason) = controller.request_override(identity, factor, clock.now()) {
        println!("⛔ Override denied: {reason}");
        dashboard::draw(&controller.snapshot(clock.now()))?;
        println!();
        print_transitions(&mut events)?;
        return Ok(controller.current_state());
    }

    // 3. Operator present
    for _ in 0..CONFIRMED_PULSES {
        clock.advance(Duration::from_millis(500));
        controller.presence_tick(true, clock.now());
        dashboard::draw(&controller.snapshot(clock.now()))?;
        pause(pace, 0.5).await;
    }

    // 4. Operator leaves; skip ahead to just before the deadline
    println!("\n\n[ACTION] Operator leaves area...");
    clock.advance(controller.threshold().saturating_sub(LEAD_IN));

    // 5. Countdown
    for _ in 0..MAX_ABSENT_PULSES {
        clock.advance(Duration::from_secs(1));
        let outcome = controller.presence_tick(false, clock.now());
        debug!(?outcome, at = %clock.now(), "absent pulse");
        dashboard::draw(&controller.snapshot(clock.now()))?;
        pause(pace, 1.0).await;
        if matches!(outcome, PulseOutcome::Expired { .. }) {
            break;
        }
    }

    println!(
        "\n\n--- AUDIT COMPLETE: SYSTEM STATE {} ---",
        controller.current_state()
    );
    print_transitions(&mut events)?;
    Ok(controller.current_state())
}

fn print_transitions(events: &mut Receiver<AccessEvent>) -> cellguard_core::Result<()> {
    println!("Transitions:");
    while let Ok(event) = events.try_recv() {
        println!("  {}", serde_json::to_string(&event)?);
    }
    Ok(())
}

async fn pause(pace: f64, secs: f64) {
    if pace <= 0.0 || !pace.is_finite() {
        return;
    }
    if let Ok(d) = Duration::try_from_secs_f64(secs * pace) {
        tokio::time::sleep(d).await;
    }
}
