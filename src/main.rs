//! Neurocasual entry point
//!
//! On the web this only initialises logging; the page drives `WebGame`.
//! Natively it plays one headless session with the built-in autopilot and
//! prints the summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
    }
    log::info!("Neurocasual ready");
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use clap::Parser;

    use neurocasual::AppConfig;
    use neurocasual::consts::PHYSICS_TICK_MS;
    use neurocasual::insight::{self, InsightProvider, ReflectiveInsight};
    use neurocasual::sim::{Autopilot, GameEvent, GameType, Session, SessionConfig};

    /// Play one session headless with the built-in autopilot
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Options {
        /// Game to play
        #[arg(value_name = "GAME", default_value = "orbit", value_parser = parse_game)]
        pub game: GameType,
        /// RNG seed for the session
        #[arg(value_name = "SEED", default_value_t = SessionConfig::default().seed)]
        pub seed: u64,
    }

    fn parse_game(name: &str) -> Result<GameType, String> {
        GameType::from_str(name).ok_or_else(|| {
            let names: Vec<&str> = GameType::ALL.iter().map(|g| g.as_str()).collect();
            format!("unknown game '{}' (expected one of: {})", name, names.join(", "))
        })
    }

    pub fn run(options: Options) {
        let config = AppConfig::load();
        let mut session = Session::new(SessionConfig {
            seed: options.seed,
            ..Default::default()
        });
        let mut pilot = Autopilot::new();

        log::info!("Playing {} headless (seed {})", options.game.as_str(), options.seed);
        session.start(options.game);

        let mut summary = None;
        let (mut hits, mut misses, mut shifts) = (0u32, 0u32, 0u32);
        while session.is_running() {
            for input in pilot.inputs(&session) {
                session.handle_input(input);
            }
            session.advance(PHYSICS_TICK_MS);

            for event in session.drain_events() {
                log::trace!("{:?} -> {}", event, event.audio_cue().as_str());
                match event {
                    GameEvent::Hit => hits += 1,
                    GameEvent::Miss => misses += 1,
                    GameEvent::RuleShift { .. } => shifts += 1,
                    GameEvent::SessionEnded(s) => summary = Some(s),
                    _ => {}
                }
            }
        }

        let Some(summary) = summary else {
            log::warn!("Session ended without a summary");
            return;
        };

        println!("game:         {}", summary.game.as_str());
        println!("score:        {:.0}", summary.score);
        println!("accuracy:     {:.1}% ({}/{})", summary.accuracy, summary.hit_count, summary.total_clicks);
        match summary.average_click_ms {
            Some(ms) => println!("click speed:  {:.0} ms", ms),
            None => println!("click speed:  n/a"),
        }
        println!("rule shifts:  {}", shifts);
        println!("events:       {} hits, {} misses", hits, misses);
        println!("passed:       {}", summary.passed_threshold);

        if config.should_request_insight() {
            let text = Rc::new(RefCell::new(None));
            let sink = Rc::clone(&text);
            ReflectiveInsight.request(
                summary,
                Box::new(move |result| *sink.borrow_mut() = Some(insight::resolve(result))),
            );
            if let Some(text) = text.borrow().as_deref() {
                println!("\n{}", text);
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Neurocasual (native) starting...");

    headless::run(headless::Options::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
