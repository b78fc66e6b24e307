//! Browser bindings
//!
//! - [`DomRenderer`]: applies render directives to the page's elements
//! - [`WebStorage`]: LocalStorage, or memory when the browser refuses it
//! - [`run`]: wires buttons and input, then pumps the session every animation frame

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, KeyboardEvent, MouseEvent, TouchEvent, Window,
};

use crate::error::StorageError;
use crate::highscores::HighScoreEntry;
use crate::persistence::{MemoryStorage, Storage};
use crate::renderer::{Directive, Glow, Handle, RenderSink, SpriteKind};
use crate::scheduler::TimerQueue;
use crate::session::Session;
use crate::tuning::Tuning;
use crate::ui::{Button, InputEvent};

type WebSession = Session<TimerQueue, DomRenderer, WebStorage>;

/// Inline style state of one sprite
#[derive(Debug, Clone, Copy, Default)]
struct SpriteStyle {
    pos: Vec2,
    rotation: Option<f32>,
    glow: Glow,
}

impl SpriteStyle {
    fn css(&self) -> String {
        let mut css = format!("transform: translate({}px, {}px)", self.pos.x, self.pos.y);
        if let Some(deg) = self.rotation {
            css.push_str(&format!(" rotate({deg}deg)"));
        }
        css.push(';');
        let shadow = match self.glow {
            Glow::None => None,
            Glow::Shielded => Some("0 0 10px #0f0, 0 0 15px #0f0, 0 0 20px #0f0"),
            Glow::ShieldBreak => Some("0 0 10px #ff0, 0 0 15px #ff0"),
        };
        if let Some(shadow) = shadow {
            css.push_str(&format!(" box-shadow: {shadow};"));
        }
        css
    }
}

/// Render sink over the game page's DOM
pub struct DomRenderer {
    document: Document,
    container: Element,
    ship: Element,
    sprites: HashMap<Handle, Element>,
    styles: HashMap<Handle, SpriteStyle>,
}

impl DomRenderer {
    pub fn new(document: Document) -> Result<Self, JsValue> {
        let container = document
            .query_selector(".planet-container")?
            .ok_or_else(|| JsValue::from_str("missing .planet-container"))?;
        let ship = document
            .get_element_by_id("ship")
            .ok_or_else(|| JsValue::from_str("missing #ship"))?;
        Ok(Self {
            document,
            container,
            ship,
            sprites: HashMap::new(),
            styles: HashMap::new(),
        })
    }

    fn element(&self, handle: Handle) -> Option<&Element> {
        match handle {
            Handle::Ship => Some(&self.ship),
            _ => self.sprites.get(&handle),
        }
    }

    fn restyle(&mut self, handle: Handle, update: impl FnOnce(&mut SpriteStyle)) {
        let style = self.styles.entry(handle).or_default();
        update(style);
        let css = style.css();
        if let Some(el) = self.element(handle) {
            let _ = el.set_attribute("style", &css);
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn create(&mut self, handle: Handle, kind: SpriteKind) -> Result<(), JsValue> {
        let el = self.document.create_element("div")?;
        match kind {
            SpriteKind::Obstacle => el.set_class_name("obstacle"),
            SpriteKind::PowerUp(kind) => {
                el.set_class_name("power-up");
                el.set_attribute("data-type", kind.as_str())?;
            }
        }
        self.container.append_child(&el)?;
        self.sprites.insert(handle, el);
        Ok(())
    }

    fn show_high_scores(&self, entries: &[HighScoreEntry]) -> Result<(), JsValue> {
        let Some(list) = self.document.get_element_by_id("high-scores-list") else {
            return Ok(());
        };
        list.set_inner_html("");
        for entry in entries {
            let li = self.document.create_element("li")?;
            li.set_text_content(Some(&format!("{}: {}", entry.name, entry.score)));
            list.append_child(&li)?;
        }
        Ok(())
    }
}

impl RenderSink for DomRenderer {
    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Create { handle, kind } => {
                if let Err(e) = self.create(handle, kind) {
                    log::warn!("Could not create sprite {handle:?}: {e:?}");
                }
            }
            Directive::Position { handle, pos } => self.restyle(handle, |s| s.pos = pos),
            Directive::Rotate { handle, degrees } => {
                self.restyle(handle, |s| s.rotation = Some(degrees))
            }
            Directive::Glow { handle, glow } => self.restyle(handle, |s| s.glow = glow),
            Directive::Destroy { handle } => {
                if let Some(el) = self.sprites.remove(&handle) {
                    el.remove();
                }
                self.styles.remove(&handle);
            }
            Directive::ShowScreen(screen) => self.set_hidden(screen.element_id(), false),
            Directive::HideScreen(screen) => self.set_hidden(screen.element_id(), true),
            Directive::Score(score) => self.set_text("score", &format!("Score: {score}")),
            Directive::HighScore(score) => {
                self.set_text("high-score", &format!("High Score: {score}"))
            }
            Directive::FinalScore {
                score,
                new_high_score,
            } => {
                self.set_text("final-score", &format!("Score: {score}"));
                self.set_hidden("new-high-score", !new_high_score);
            }
            Directive::HighScoreList(entries) => {
                if let Err(e) = self.show_high_scores(&entries) {
                    log::warn!("Could not render high scores: {e:?}");
                }
            }
        }
    }
}

/// LocalStorage when available, memory otherwise (private browsing, sandboxed frames)
pub enum WebStorage {
    Local(web_sys::Storage),
    Memory(MemoryStorage),
}

impl WebStorage {
    pub fn open(window: &Window) -> Self {
        match window.local_storage() {
            Ok(Some(storage)) => WebStorage::Local(storage),
            _ => {
                log::warn!("LocalStorage unavailable, scores will not persist");
                WebStorage::Memory(MemoryStorage::new())
            }
        }
    }
}

impl Storage for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            WebStorage::Local(storage) => storage
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}"))),
            WebStorage::Memory(memory) => memory.get_item(key),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            WebStorage::Local(storage) => {
                storage
                    .set_item(key, value)
                    .map_err(|e| StorageError::WriteRejected {
                        key: key.to_string(),
                        reason: format!("{e:?}"),
                    })
            }
            WebStorage::Memory(memory) => memory.set_item(key, value),
        }
    }
}

/// Mount the game on the current page
pub fn run() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let seed = js_sys::Date::now() as u64;
    let session = Session::new(
        TimerQueue::new(),
        DomRenderer::new(document.clone())?,
        WebStorage::open(&window),
        Tuning::default(),
        seed,
    );
    let game = Rc::new(RefCell::new(session));

    wire_buttons(&document, &game)?;
    wire_input(&window, &game)?;
    start_frame_loop(&window, game)?;
    log::info!("Orbit Shift mounted (seed {seed})");
    Ok(())
}

fn wire_buttons(document: &Document, game: &Rc<RefCell<WebSession>>) -> Result<(), JsValue> {
    for button in Button::ALL {
        let Some(el) = document.get_element_by_id(button.element_id()) else {
            log::warn!("Missing button #{}", button.element_id());
            continue;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().press(button);
        });
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn wire_input(window: &Window, game: &Rc<RefCell<WebSession>>) -> Result<(), JsValue> {
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            game.borrow_mut().handle_input(&InputEvent::Key(event.code()));
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let game = game.clone();
        // Handled taps cancel the compatibility mousedown, so one tap is one shift.
        // Window touch listeners default to passive, which ignores prevent_default.
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            if game.borrow_mut().handle_input(&InputEvent::TouchStart) {
                event.prevent_default();
            }
        });
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        window.add_event_listener_with_callback_and_add_event_listener_options(
            "touchstart",
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        closure.forget();
    }
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().handle_input(&InputEvent::PointerDown);
        });
        window.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Pump the session from `requestAnimationFrame` for the page's lifetime
fn start_frame_loop(window: &Window, game: Rc<RefCell<WebSession>>) -> Result<(), JsValue> {
    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = callback.clone();
    *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
        game.borrow_mut().pump(timestamp);
        if let (Some(window), Some(cb)) = (web_sys::window(), next.borrow().as_ref()) {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }));
    if let Some(cb) = callback.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}
