//! Lucky Lotto entry point
//!
//! Handles platform-specific initialization. On the web this wires the page
//! to the state machine; natively it runs a short console demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, MouseEvent};

    use lucky_lotto::app::{BallView, ButtonView, LottoApp, TimerHandle, TimerKind, ViewModel, strings};
    use lucky_lotto::platform::{BrowserHost, BrowserScheduler, DocumentCookies, TimerDispatch};
    use lucky_lotto::{Sampler, Settings};

    type WebApp = LottoApp<DocumentCookies, BrowserScheduler, BrowserHost>;

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_button(document: &Document, id: &str, button: &ButtonView) {
        if let Some(btn) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        {
            btn.set_text_content(Some(button.label));
            btn.set_disabled(!button.enabled);
        }
    }

    fn balls_html(balls: &[BallView], small: bool) -> String {
        balls
            .iter()
            .enumerate()
            .map(|(i, ball)| {
                let motion = if small {
                    ""
                } else if ball.spinning {
                    " spin"
                } else {
                    " bounce-in"
                };
                format!(
                    r#"<div class="ball{}{} {}" style="animation-delay: {:.1}s">{}</div>"#,
                    if small { " small" } else { "" },
                    motion,
                    ball.tier.css_class(),
                    i as f32 * 0.1,
                    ball.number
                )
            })
            .collect()
    }

    /// Push a view snapshot into the DOM
    fn render_view(view: &ViewModel) {
        let document = document();

        // Header caption
        match &view.saved_caption {
            Some(caption) => {
                set_text(&document, "saved-caption", caption);
                set_hidden(&document, "saved-caption", false);
            }
            None => set_hidden(&document, "saved-caption", true),
        }

        // Current balls or placeholder
        if let Some(el) = document.get_element_by_id("balls") {
            match view.placeholder {
                Some(text) => {
                    el.set_inner_html("");
                    el.set_text_content(Some(text));
                }
                None => el.set_inner_html(&balls_html(&view.balls, false)),
            }
        }

        // Confetti
        if let Some(el) = document.get_element_by_id("confetti") {
            let pieces: String = view
                .confetti
                .iter()
                .map(|p| {
                    format!(
                        r#"<div class="confetti-piece {}" style="left: {:.1}%; animation-delay: {:.2}s; animation-duration: {:.2}s"></div>"#,
                        p.color_class(),
                        p.left_pct,
                        p.delay_s,
                        p.duration_s
                    )
                })
                .collect();
            el.set_inner_html(&pieces);
        }

        set_button(&document, "generate-btn", &view.spin_button);
        match &view.save_button {
            Some(button) => {
                set_button(&document, "save-btn", button);
                set_hidden(&document, "save-btn", false);
            }
            None => set_hidden(&document, "save-btn", true),
        }

        // Saved sets
        set_hidden(&document, "saved-panel", view.saved_rows.is_empty());
        if let Some(el) = document.get_element_by_id("saved-list") {
            let rows: String = view
                .saved_rows
                .iter()
                .map(|row| {
                    format!(
                        r#"<div class="saved-row"><span class="seq">#{}</span><div class="balls">{}</div></div>"#,
                        row.seq,
                        balls_html(&row.balls, true)
                    )
                })
                .collect();
            el.set_inner_html(&rows);
        }
        set_text(&document, "retention-note", &view.retention_note);

        set_hidden(&document, "delete-modal", !view.delete_modal);

        match &view.toast {
            Some(message) => {
                set_text(&document, "toast-message", message);
                set_hidden(&document, "toast", false);
            }
            None => set_hidden(&document, "toast", true),
        }
    }

    fn on_click(document: &Document, id: &str, app: &Rc<RefCell<WebApp>>, action: fn(&mut WebApp)) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing #{} in page", id);
            return;
        };
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut app = app.borrow_mut();
            action(&mut app);
            render_view(&app.view());
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lucky Lotto starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::load();
        let jar = DocumentCookies::new(&document).expect("not an HTML document");
        let dispatch = TimerDispatch::default();
        let scheduler = BrowserScheduler::new(window.clone(), dispatch.clone());
        let host = BrowserHost::new(document.clone());

        let app = Rc::new(RefCell::new(LottoApp::new(
            settings,
            jar,
            scheduler,
            host,
            Sampler::from_entropy(),
        )));

        // Timers route back into the app once it exists
        let weak = Rc::downgrade(&app);
        dispatch.set(Rc::new(move |kind: TimerKind, handle: TimerHandle| {
            if let Some(app) = weak.upgrade() {
                let mut app = app.borrow_mut();
                app.on_timer(kind, handle);
                render_view(&app.view());
            }
        }));

        // Static labels
        set_text(&document, "download-btn", strings::DOWNLOAD);
        set_text(&document, "delete-btn", strings::DELETE_ALL);
        set_text(&document, "delete-title", strings::DELETE_TITLE);
        set_text(&document, "delete-body", strings::DELETE_BODY);
        set_text(&document, "delete-cancel-btn", strings::DELETE_CANCEL);
        set_text(&document, "delete-confirm-btn", strings::DELETE_CONFIRM);

        on_click(&document, "generate-btn", &app, |app| {
            app.generate();
        });
        on_click(&document, "save-btn", &app, |app| {
            if let Err(e) = app.save() {
                log::info!("Save declined: {}", e);
            }
        });
        on_click(&document, "download-btn", &app, |app| {
            let _ = app.download();
        });
        on_click(&document, "delete-btn", &app, |app| app.request_delete_all());
        on_click(&document, "delete-cancel-btn", &app, |app| app.cancel_delete_all());
        on_click(&document, "delete-confirm-btn", &app, |app| app.confirm_delete_all());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        render_view(&app.borrow().view());
        log::info!("Lucky Lotto running ({} saved sets)", app.borrow().saved().len());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lucky_lotto::app::{HeadlessHost, ManualScheduler};
    use lucky_lotto::persistence::MemoryCookies;
    use lucky_lotto::{LottoApp, Sampler, Settings};

    env_logger::init();
    log::info!("Lucky Lotto (native) starting...");
    log::info!("The widget itself runs in the browser - use `trunk serve` for the web version");

    // Optional JSON settings override as the first argument
    let settings = match std::env::args().nth(1) {
        Some(path) => load_settings(&path),
        None => Settings::load(),
    };
    let spin_ms = u64::from(settings.timing.spin_ms);

    let mut app = LottoApp::new(
        settings,
        MemoryCookies::new(),
        ManualScheduler::new(),
        HeadlessHost::local(),
        Sampler::from_entropy(),
    );

    println!("\nDrawing 5 sets...");
    for _ in 0..5 {
        app.generate();
        app.advance(spin_ms);
        let Some(set) = app.state().result else {
            continue;
        };
        match app.save() {
            Ok(()) => println!("  saved   [{}]", set),
            Err(e) => println!("  skipped [{}]: {}", set, e),
        }
    }

    match app.download() {
        Ok(filename) => {
            let surface = &app.host().surface;
            println!(
                "\nTicket {} ({}x{}, {} draw ops)",
                filename,
                surface.width,
                surface.height,
                surface.ops.len()
            );
        }
        Err(e) => eprintln!("\nTicket failed: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: &str) -> lucky_lotto::Settings {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| lucky_lotto::Settings::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(settings) => {
            log::info!("Loaded settings from {}", path);
            settings
        }
        Err(e) => {
            log::warn!("Ignoring settings file {}: {}", path, e);
            lucky_lotto::Settings::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
