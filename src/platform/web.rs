//! Browser bindings
//!
//! `WebGame` wraps a [`Session`] for JavaScript: the page forwards pointer
//! input, calls `frame(dt)` from `requestAnimationFrame`, renders the returned
//! JSON snapshot and plays the drained audio cues. Insights come from an
//! optional `globalThis.neurocasualInsight(prompt, system)` function that
//! returns a string or a promise of one.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::config::AppConfig;
use crate::insight::{self, InsightError, InsightProvider, ReflectiveInsight, SessionSummary};
use crate::sim::{Autopilot, EntityId, GameEvent, GameType, InputEvent, Session, SessionConfig};
use crate::Viewport;

#[wasm_bindgen(inline_js = "
    export function request_insight(prompt, system) {
        const provider = globalThis.neurocasualInsight;
        if (typeof provider !== 'function') {
            return Promise.reject(new Error('no insight provider'));
        }
        return Promise.resolve(provider(prompt, system));
    }

    export function has_insight_provider() {
        return typeof globalThis.neurocasualInsight === 'function';
    }
")]
extern "C" {
    fn request_insight(prompt: &str, system: &str) -> js_sys::Promise;
    fn has_insight_provider() -> bool;
}

/// Insight provider backed by a page-supplied JS function
struct JsInsight;

impl InsightProvider for JsInsight {
    fn request(&self, summary: SessionSummary, on_done: Box<dyn FnOnce(Result<String, InsightError>)>) {
        if !has_insight_provider() {
            on_done(Err(InsightError::Unavailable));
            return;
        }
        let promise = request_insight(&insight::build_prompt(&summary), insight::SYSTEM_INSTRUCTION);
        wasm_bindgen_futures::spawn_local(async move {
            let result = match JsFuture::from(promise).await {
                Ok(value) => value.as_string().ok_or(InsightError::Empty),
                Err(e) => Err(InsightError::Provider(format!("{:?}", e))),
            };
            on_done(result);
        });
    }
}

/// Event as handed to JS: the semantic event plus its audio cue name
#[derive(Serialize)]
struct EventOut<'a> {
    cue: &'static str,
    event: &'a GameEvent,
}

fn to_js_error(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    config: AppConfig,
    autopilot: Option<Autopilot>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, seed: f64) -> WebGame {
        let session = Session::new(SessionConfig {
            viewport: Viewport::new(width, height),
            seed: seed as u64,
            ..Default::default()
        });
        WebGame {
            session,
            config: AppConfig::load(),
            autopilot: None,
        }
    }

    /// Start `game` by name; false if the name is unknown
    pub fn start(&mut self, game: &str) -> bool {
        match GameType::from_str(game) {
            Some(game) => {
                self.session.start(game);
                true
            }
            None => {
                log::warn!("Unknown game: {}", game);
                false
            }
        }
    }

    /// Let the built-in player drive the session (attract screen)
    pub fn set_demo(&mut self, enabled: bool) {
        self.autopilot = enabled.then(Autopilot::new);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.set_viewport(Viewport::new(width, height));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.session.handle_input(InputEvent::PointerMove { x, y });
    }

    pub fn pointer_down(&mut self) {
        self.session.handle_input(InputEvent::PointerDown);
    }

    pub fn pointer_up(&mut self) {
        self.session.handle_input(InputEvent::PointerUp);
    }

    /// Click at a point; hit-tested against live entities
    pub fn tap(&mut self, x: f32, y: f32) {
        self.session.handle_input(InputEvent::Tap { x, y });
    }

    /// Click already resolved to an entity by the page (or empty space)
    pub fn click(&mut self, entity: Option<u32>) {
        self.session.handle_input(InputEvent::Click(entity.map(EntityId)));
    }

    /// Advance by `dt_ms` and return the snapshot as JSON
    pub fn frame(&mut self, dt_ms: f64) -> Result<String, JsValue> {
        if let Some(pilot) = self.autopilot.as_mut() {
            for input in pilot.inputs(&self.session) {
                self.session.handle_input(input);
            }
        }
        self.session.advance(dt_ms);
        serde_json::to_string(&self.session.snapshot()).map_err(to_js_error)
    }

    /// Events since the last call, as a JSON array of `{cue, event}`
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        let events = self.session.drain_events();
        let out: Vec<EventOut> = events
            .iter()
            .map(|event| EventOut {
                cue: event.audio_cue().as_str(),
                event,
            })
            .collect();
        serde_json::to_string(&out).map_err(to_js_error)
    }

    /// End the running session early
    pub fn end(&mut self) {
        self.session.end();
    }

    pub fn return_to_menu(&mut self) {
        self.session.return_to_menu();
    }

    /// Replace the feature flags with a JSON object pushed by the page
    pub fn set_config(&mut self, json: &str) -> Result<(), JsValue> {
        let config = AppConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        config.save();
        self.config = config;
        Ok(())
    }

    pub fn interstitial_after_session(&self) -> bool {
        self.config.interstitial_after_session()
    }

    /// Ask for a post-session insight; `callback` receives the text once.
    /// Returns false if there is nothing to summarise or insights are off.
    pub fn request_insight(&self, callback: js_sys::Function) -> bool {
        if !self.config.should_request_insight() {
            return false;
        }
        let Some(summary) = self.session.summary() else {
            return false;
        };

        let fallback = ReflectiveInsight::reflect(&summary);
        JsInsight.request(
            summary,
            Box::new(move |result| {
                let text = match result {
                    Err(InsightError::Unavailable) => fallback,
                    other => insight::resolve(other),
                };
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&text)) {
                    log::warn!("Insight callback failed: {:?}", e);
                }
            }),
        );
        true
    }
}
