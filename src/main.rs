//! Wordfall entry point
//!
//! On the web this wires DOM events and the animation loop to [`WebGame`].
//! Natively it plays one demo session with the autopilot on a simulated clock
//! and records the result in the local leaderboard.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlInputElement};

    use wordfall::consts::GAME_AREA_SELECTOR;
    use wordfall::platform::web::WebGame;

    /// Optional page-level hook, e.g. `window.renderWordfall`
    fn global_fn(name: &str) -> Option<js_sys::Function> {
        let window = web_sys::window()?;
        js_sys::Reflect::get(&window, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Wordfall starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, cannot start");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let mut game = WebGame::new(GAME_AREA_SELECTOR);
        match global_fn("renderWordfall") {
            Some(render) => game.set_on_frame(render),
            None => log::warn!("window.renderWordfall missing, frames will not be drawn"),
        }
        if let Some(reporter) = global_fn("submitScore") {
            game.set_reporter(reporter);
        }
        if let Some(refresh) = global_fn("refreshLeaderboard") {
            game.set_on_refresh(refresh);
        }
        let game = Rc::new(RefCell::new(game));

        setup_input_handlers(game.clone());
        setup_start_button(game.clone());
        setup_powerup_clicks(game.clone());
        setup_navigation(game.clone());

        request_animation_frame(game);

        log::info!("Wordfall running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<WebGame>>) {
        let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("word-input"))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            log::warn!("#word-input missing, typing disabled");
            return;
        };

        let field = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if game.borrow_mut().input(&field.value()) {
                field.set_value("");
            }
        });
        let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_start_button(game: Rc<RefCell<WebGame>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id("start-btn") else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let name = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("gaming-name-input"))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|el| el.value())
                .unwrap_or_default();

            let mut g = game.borrow_mut();
            if name.trim().is_empty() {
                g.play_as_guest();
            } else if let Err(e) = g.set_player(&name) {
                log::warn!("Rejected gaming name: {:?}", e);
                g.play_as_guest();
            }
            g.start(now());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Power-up elements carry `data-powerup-id`; clicks bubble to the play area
    fn setup_powerup_clicks(game: Rc<RefCell<WebGame>>) {
        let Some(area) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(GAME_AREA_SELECTOR).ok().flatten())
        else {
            log::warn!("{} missing, power-ups cannot be claimed", GAME_AREA_SELECTOR);
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let id = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-powerup-id]").ok().flatten())
                .and_then(|el| el.get_attribute("data-powerup-id"))
                .and_then(|id| id.parse::<u32>().ok());
            if let Some(id) = id {
                game.borrow_mut().activate(id, now());
            }
        });
        let _ = area.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Leaving the tab clears the board; coming back resumes
    fn setup_navigation(game: Rc<RefCell<WebGame>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                g.navigate_away();
                log::info!("Tab hidden, session suspended");
            } else if g.resume(now()) {
                log::info!("Tab visible, session resumed");
            }
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
        let events = game.borrow_mut().frame(time);
        if events != "[]" {
            if let Some(hook) = global_fn("onWordfallEvents") {
                let _ = hook.call1(&JsValue::NULL, &JsValue::from_str(&events));
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use wordfall::consts::*;
    use wordfall::platform::{Autopilot, HeadlessSurface, run_demo, wall_clock_ms};
    use wordfall::profile::validate_gaming_name;
    use wordfall::{GameSession, HighScores, LocalReporter, Tuning, Vocabulary, submit_result};

    env_logger::init();
    log::info!("Wordfall (native) starting...");

    let seed = std::env::var("WORDFALL_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| wall_clock_ms() as u64);
    let player = std::env::args()
        .nth(1)
        .and_then(|name| match validate_gaming_name(&name) {
            Ok(name) => Some(name),
            Err(e) => {
                log::warn!("Ignoring gaming name {:?}: {}", name, e);
                None
            }
        });

    let mut session = GameSession::new(Tuning::load(), Vocabulary::builtin(), seed);
    let mut surface = HeadlessSurface::new(HEADLESS_WIDTH, HEADLESS_HEIGHT);
    let mut autopilot = Autopilot::new(AUTOPILOT_REACTION_MS);

    println!("Autopilot playing (seed {seed})...");
    let Some(result) = run_demo(
        &mut session,
        &mut autopilot,
        &mut surface,
        DEMO_STEP_MS,
        DEMO_LIMIT_MS,
    ) else {
        println!("Demo hit the time limit at score {}", session.score());
        return;
    };

    println!(
        "Game over: score {}, {} wpm, {} words in {:.1}s ({} power-ups)",
        result.score,
        result.wpm,
        result.words_typed,
        result.duration_ms / 1000.0,
        autopilot.claimed
    );

    let mut reporter = LocalReporter::new(HighScores::load(), player);
    let _ = submit_result(&mut reporter, &result, || log::debug!("Leaderboard refresh"));
    for (rank, entry) in reporter.scores.entries.iter().enumerate() {
        println!(
            "{:>2}. {:<15} {:>6} {:>4} wpm",
            rank + 1,
            entry.name,
            entry.score,
            entry.wpm
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
