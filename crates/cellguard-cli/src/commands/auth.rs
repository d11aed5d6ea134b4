use cellguard_access::{AccessController, IntentMatcher};
use cellguard_config::CellGuardConfig;
use cellguard_core::Clock;

pub(super) fn cmd_auth(
    config: &CellGuardConfig,
    clock: &dyn Clock,
    identity: &str,
    phrase: Option<String>,
    confirmed: bool,
    json: bool,
) -> cellguard_core::Result<()> {
    let controller = AccessController::from_config(config)?;
    let matcher = IntentMatcher::new(&config.handshake.intents);
    let factor = confirmed || phrase.as_deref().is_some_and(|p| matcher.confirms(p));

    let now = clock.now();
    let outcome = controller.request_override(identity, factor, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&controller.snapshot(now))?);
    }

    match outcome {
        Ok(tier) => {
            if !json {
                let profile = tier.profile();
                println!("✅ Override granted: {tier}");
                println!(
                    "   speed limit x{:.1}, stiffness boost x{:.1}, watchdog {:.0}s",
                    profile.speed_limit_scale,
                    profile.stiffness_boost,
                    controller.threshold().as_secs_f64()
                );
            }
            Ok(())
        }
        Err(reason) => {
            if !json {
                println!("⛔ Override denied: {reason}");
            }
            Err(reason.into())
        }
    }
}
