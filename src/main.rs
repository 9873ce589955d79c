//! Neon Dash entry point
//!
//! Wires the browser (input, overlays, animation frames) to the game session on
//! wasm32. Natively it plays a level headless and logs how far it got.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent, TouchEvent};

    use neon_dash::sim::{GameEvent, GamePhase};
    use neon_dash::snapshot::{LevelSummary, Snapshot};
    use neon_dash::{Game, LevelCatalog, ProgressStore, Tuning};

    // Drawing and sound live in JS; both hooks are optional
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            if (typeof window.dashRender === 'function') {
                window.dashRender(JSON.parse(json));
            }
        }

        export function play_cue(name) {
            if (typeof window.dashCue === 'function') {
                window.dashCue(name);
            }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
        fn play_cue(name: &str);
    }

    struct App {
        game: Game,
        last_phase: GamePhase,
    }

    fn cue_name(event: &GameEvent) -> Option<&'static str> {
        match event {
            GameEvent::Jumped => Some("jump"),
            GameEvent::OrbUsed { .. } => Some("orb"),
            GameEvent::PadUsed => Some("pad"),
            GameEvent::PortalEntered { .. } => Some("portal"),
            GameEvent::Died { .. } => Some("death"),
            GameEvent::LevelCompleted => Some("complete"),
            GameEvent::ScoreChanged { .. } => None,
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Per-frame HUD numbers
    fn update_hud(document: &Document, snapshot: &Snapshot) {
        set_text(document, "hud-progress", &format!("{}%", snapshot.progress));
        set_text(document, "hud-score", &snapshot.score.to_string());
    }

    /// Show the overlay for the new phase
    fn update_overlays(document: &Document, phase: GamePhase, snapshot: &Snapshot) {
        set_visible(document, "menu", phase == GamePhase::Menu);
        set_visible(document, "hud", phase != GamePhase::Menu);
        set_visible(document, "pause-menu", phase == GamePhase::Paused);
        set_visible(document, "game-over", phase == GamePhase::GameOver);
        set_visible(document, "level-complete", phase == GamePhase::LevelComplete);

        if let Some(name) = &snapshot.level_name {
            set_text(document, "level-name", name);
        }
        if phase == GamePhase::GameOver {
            set_text(document, "final-progress", &format!("{}%", snapshot.progress));
        }
    }

    /// Rebuild the level buttons with current best progress
    fn build_level_menu(app: &Rc<RefCell<App>>, summaries: &[LevelSummary]) {
        let Some(document) = document() else {
            return;
        };
        let Some(list) = document.get_element_by_id("level-list") else {
            log::warn!("No #level-list element; level menu unavailable");
            return;
        };
        list.set_text_content(None);

        for summary in summaries {
            let Ok(button) = document.create_element("button") else {
                continue;
            };
            button.set_class_name("level-btn");
            button.set_text_content(Some(&format!(
                "{} {} {}%",
                summary.name,
                "\u{2605}".repeat(summary.stars as usize),
                summary.best_percent
            )));

            let app = app.clone();
            let index = summary.index;
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Err(e) = app.borrow_mut().game.start(index) {
                    log::error!("Failed to start level {}: {}", index, e);
                }
            });
            let _ =
                button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();

            let _ = list.append_child(&button);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Dash starting...");

        let Some(document) = document() else {
            log::error!("No document; nothing to run");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let catalog = LevelCatalog::builtin();
        let progress = ProgressStore::load(catalog.len());
        let game = Game::new(catalog, Tuning::default(), progress);
        let summaries = game.level_summaries();
        let app = Rc::new(RefCell::new(App {
            game,
            last_phase: GamePhase::Menu,
        }));

        build_level_menu(&app, &summaries);
        update_overlays(&document, GamePhase::Menu, &app.borrow().game.snapshot());

        setup_input_handlers(&document, app.clone());
        setup_buttons(&document, app.clone());
        setup_auto_pause(app.clone());

        request_animation_frame(app);

        log::info!("Neon Dash running!");
    }

    fn is_jump_key(key: &str) -> bool {
        matches!(key, " " | "Space" | "ArrowUp" | "w" | "W")
    }

    fn setup_input_handlers(document: &Document, app: Rc<RefCell<App>>) {
        // Keyboard: Space/Up jumps, Escape/P pauses
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut a = app.borrow_mut();
                if is_jump_key(&key) {
                    event.prevent_default();
                    // Auto-repeat is not a new press
                    if !event.repeat() {
                        a.game.on_jump_press();
                    }
                } else if matches!(key.as_str(), "Escape" | "p" | "P") {
                    a.game.toggle_pause();
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if is_jump_key(&event.key()) {
                    app.borrow_mut().game.on_jump_release();
                }
            });
            let _ =
                document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    let mut a = app.borrow_mut();
                    if a.game.phase() == GamePhase::Running {
                        a.game.on_jump_press();
                    }
                }
            });
            let _ = document
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.on_jump_release();
            });
            let _ = document
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut a = app.borrow_mut();
                if a.game.phase() == GamePhase::Running {
                    event.prevent_default();
                    a.game.on_jump_press();
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().game.on_jump_release();
            });
            let _ = document
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, app: Rc<RefCell<App>>, action: fn(&mut Game)) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::debug!("No #{} button", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            action(&mut app.borrow_mut().game);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        on_click(document, "restart-btn", app.clone(), |game| {
            if let Err(e) = game.restart() {
                log::warn!("Restart ignored: {}", e);
            }
        });
        on_click(document, "next-level-btn", app.clone(), |game| {
            if let Err(e) = game.advance_to_next_level() {
                log::warn!("Next level ignored: {}", e);
            }
        });
        on_click(document, "resume-btn", app.clone(), Game::resume);
        on_click(document, "menu-btn", app.clone(), Game::show_menu);
        on_click(document, "win-menu-btn", app.clone(), Game::show_menu);
        on_click(document, "pause-menu-btn", app, Game::show_menu);
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    if a.game.phase() == GamePhase::Running {
                        a.game.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                if a.game.phase() == GamePhase::Running {
                    a.game.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let Some(document) = document() else {
            return;
        };

        let menu_rows = {
            let mut a = app.borrow_mut();
            for event in a.game.frame(time) {
                if let Some(cue) = cue_name(&event) {
                    play_cue(cue);
                }
            }

            let snapshot = a.game.snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => render_frame(&json),
                Err(e) => log::error!("Failed to serialize frame: {}", e),
            }
            update_hud(&document, &snapshot);

            let phase = a.game.phase();
            if phase != a.last_phase {
                a.last_phase = phase;
                update_overlays(&document, phase, &snapshot);
                (phase == GamePhase::Menu).then(|| a.game.level_summaries())
            } else {
                None
            }
        };

        if let Some(rows) = menu_rows {
            build_level_menu(&app, &rows);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_dash::Game;
    use neon_dash::consts::TICKS_PER_SCORE;

    env_logger::init();
    log::info!("Neon Dash (native) starting...");
    log::info!("Native mode runs one level headless - run with `trunk serve` for the web version");

    let index = match std::env::args().nth(1).map(|arg| arg.parse::<usize>()) {
        None => 0,
        Some(Ok(index)) => index,
        Some(Err(e)) => {
            log::error!("Level index must be a number: {}", e);
            std::process::exit(2);
        }
    };

    let mut game = Game::default();
    if let Err(e) = game.start(index) {
        log::error!("{}", e);
        std::process::exit(2);
    }

    // One tick past the level's full length is always enough to finish
    let limit = game
        .catalog()
        .get(index)
        .map_or(0, |level| level.duration as usize * TICKS_PER_SCORE as usize + 1);
    for _ in 0..limit {
        game.step(1.0);
        if !matches!(game.phase(), neon_dash::sim::GamePhase::Running) {
            break;
        }
    }

    if let Some(sim) = game.sim() {
        log::info!(
            "Level {} ended {:?} at score {} ({}% - best {}%, {} live entities)",
            index,
            sim.phase,
            sim.score,
            sim.progress,
            game.progress().best(index),
            sim.entities.len()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
