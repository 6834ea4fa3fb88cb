//! Tilt Gap - headless native runner
//!
//! Plays one autopilot round and logs where the game would navigate.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use tilt_gap::demo::Autopilot;
    use tilt_gap::results::PayloadSource;
    use tilt_gap::sim::GamePhase;
    use tilt_gap::{GameHost, Settings};

    /// Environment variable naming a result payload JSON file
    const RESULTS_ENV: &str = "TILT_GAP_RESULTS";
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after this many frames (well past the win time)
    const MAX_FRAMES: u32 = 60 * 120;

    env_logger::init();
    log::info!("Tilt Gap (native) starting...");

    let settings = Settings::load();

    let source = match std::env::var_os(RESULTS_ENV) {
        Some(path) => {
            let body = std::fs::read(&path)
                .with_context(|| format!("reading {} from {}", RESULTS_ENV, path.to_string_lossy()))?;
            PayloadSource::from_bytes(body)
        }
        None => PayloadSource::unreachable(format!("{} not set", RESULTS_ENV)),
    };

    let navigator = |destination: &str| {
        log::info!("Navigating to {}", destination);
        println!("{}", destination);
    };

    let mut host = GameHost::new(settings, source, navigator);
    host.load();
    host.appear();

    let button = host.scene().button().center;
    host.touch_down(button);
    host.touch_up(button);

    let pilot = Autopilot::default();
    let mut frames = 0;
    while host.scene().phase() == GamePhase::Running && frames < MAX_FRAMES {
        let sample = pilot.sample(host.scene());
        host.on_accelerometer(sample);
        host.update(FRAME_DT);
        frames += 1;
    }

    match host.scene().phase() {
        GamePhase::Ended(outcome) => {
            log::info!("Round finished after {} frames: {:?}", frames, outcome)
        }
        phase => anyhow::bail!("round did not finish after {} frames ({:?})", frames, phase),
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No web entry point
}
