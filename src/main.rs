//! Edu Arcade headless runner
//!
//! Drives each engine through its built-in levels and logs the results.
//! Usage: `edu-arcade [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use edu_arcade::Settings;

    env_logger::init();
    log::info!("Edu Arcade (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    let settings_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("Could not read {}: {}", path, e);
            None
        }
    });
    let settings = Settings::load(settings_json.as_deref());
    log::info!("Seed: {}", seed);

    run_plinko(seed, &settings);
    run_pinball(&settings);
    run_voyager(&settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives the library directly
}

#[cfg(not(target_arch = "wasm32"))]
fn run_plinko(seed: u64, settings: &edu_arcade::Settings) {
    use edu_arcade::plinko::{PlinkoAction, PlinkoSession};

    const BALLS: usize = 2000;

    let mut session = PlinkoSession::new(seed, settings.clone());
    let ids: Vec<u32> = session.state.levels.iter().map(|l| l.id).collect();
    for id in ids {
        session.dispatch(PlinkoAction::SelectLevel(id));
        session.simulate(BALLS);
        let stats = session.state.stats();
        log::info!(
            "Plinko {:>2} {:<22} match {:>5.1}%  stars {}  mean {:.2}  sd {:.2}",
            id,
            session.state.level.name,
            session.state.match_percent(),
            session.state.stars(),
            stats.mean,
            stats.std_dev
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_pinball(settings: &edu_arcade::Settings) {
    use edu_arcade::pinball::{GamePhase, PinballAction, PinballSession};

    let mut session = PinballSession::new(settings.clone());
    let ids: Vec<u32> = session.state.levels.iter().map(|l| l.id).collect();
    for id in ids {
        session.dispatch(PinballAction::SelectLevel(id));
        let name = session.state.level.name.clone();

        // Sweep whole degrees for a one-shot clear
        let solution = (0..360).map(f64::from).find(|&angle| {
            session.dispatch(PinballAction::ResetLevel);
            session.play_shot(angle);
            session.state.phase == GamePhase::Complete
        });
        match solution {
            Some(angle) => log::info!("Pinball {:>2} {:<16} cleared at {:.0}°", id, name, angle),
            None => log::info!("Pinball {:>2} {:<16} has no single-shot clear", id, name),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_voyager(settings: &edu_arcade::Settings) {
    use edu_arcade::voyager::{VoyagerAction, VoyagerPhase, VoyagerSession};

    let mut session = VoyagerSession::new(settings);
    let ids: Vec<u32> = session.state.levels.iter().map(|l| l.id).collect();
    for id in ids {
        session.dispatch(VoyagerAction::SelectLevel(id));
        let target = session.state.level.target;
        session.draw_vector(target);
        session.launch();
        while session.state.phase == VoyagerPhase::Launching {
            session.frame(1.0 / 60.0);
        }
        log::info!(
            "Voyager {:>2} {:<14} direct course: {:?}",
            id,
            session.state.level.name,
            session.state.phase
        );
    }
}
