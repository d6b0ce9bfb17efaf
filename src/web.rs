//! Browser bindings
//!
//! The page owns rendering, the camera and the dice physics engine. It hands
//! a physics object to `WebGame`, forwards clicks, and calls `frame` once per
//! animation frame to get the snapshot it draws.

use glam::{Quat, Vec3};
use wasm_bindgen::prelude::*;

use crate::audio::AudioManager;
use crate::game::Game;
use crate::physics::{BodyHandle, DicePhysics, DieBodyDesc};
use crate::settings::Settings;
use crate::sim::GameEvent;

#[wasm_bindgen]
extern "C" {
    /// Rigid-body world implemented in JavaScript
    pub type PhysicsBridge;

    #[wasm_bindgen(method, js_name = createBody)]
    #[allow(clippy::too_many_arguments)]
    fn create_body(
        this: &PhysicsBridge,
        half_x: f32,
        half_y: f32,
        half_z: f32,
        density: f32,
        friction: f32,
        restitution: f32,
        position: Vec<f32>,
        rotation: Vec<f32>,
    ) -> u32;

    #[wasm_bindgen(method)]
    fn step(this: &PhysicsBridge, dt: f32);

    /// `[x, y, z, w]`
    #[wasm_bindgen(method, js_name = getOrientation)]
    fn get_orientation(this: &PhysicsBridge, handle: u32) -> JsValue;

    /// `[x, y, z]`
    #[wasm_bindgen(method, js_name = getPosition)]
    fn get_position(this: &PhysicsBridge, handle: u32) -> JsValue;

    #[wasm_bindgen(method, js_name = removeBody)]
    fn remove_body(this: &PhysicsBridge, handle: u32);
}

/// Read up to N numbers from a JS array; missing entries are zero
fn read_floats<const N: usize>(value: &JsValue) -> [f32; N] {
    let array = js_sys::Array::from(value);
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = array.get(i as u32).as_f64().unwrap_or(0.0) as f32;
    }
    out
}

/// `DicePhysics` over the page's physics object
pub struct JsPhysics {
    bridge: PhysicsBridge,
}

impl DicePhysics for JsPhysics {
    fn create_body(&mut self, desc: &DieBodyDesc, position: Vec3, rotation: Quat) -> BodyHandle {
        let h = desc.half_extents;
        BodyHandle(self.bridge.create_body(
            h.x,
            h.y,
            h.z,
            desc.density,
            desc.friction,
            desc.restitution,
            position.to_array().to_vec(),
            rotation.to_array().to_vec(),
        ))
    }

    fn step(&mut self, dt: f32) {
        self.bridge.step(dt);
    }

    fn orientation(&self, handle: BodyHandle) -> Quat {
        let q = read_floats::<4>(&self.bridge.get_orientation(handle.0));
        let rotation = Quat::from_array(q);
        if rotation.length_squared() > 0.0 {
            rotation.normalize()
        } else {
            log::warn!("Physics returned no orientation for body {}", handle.0);
            Quat::IDENTITY
        }
    }

    fn position(&self, handle: BodyHandle) -> Vec3 {
        Vec3::from_array(read_floats::<3>(&self.bridge.get_position(handle.0)))
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        self.bridge.remove_body(handle.0);
    }
}

/// Set up panic reporting and console logging once the module loads
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Dice Golf starting...");
}

/// Game handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    game: Game<JsPhysics>,
    audio: AudioManager,
    settings: Settings,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    /// New game on a fresh course. `seed` defaults to the current time.
    #[wasm_bindgen(constructor)]
    pub fn new(physics: PhysicsBridge, seed: Option<f64>) -> Result<WebGame, JsValue> {
        let seed = seed.unwrap_or_else(js_sys::Date::now) as u64;
        let mut game = Game::new(seed, JsPhysics { bridge: physics })
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let settings = Settings::load();
        game.apply_settings(&settings);
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        log::info!("Game initialized with seed: {}", seed);
        Ok(WebGame {
            game,
            audio,
            settings,
            last_time: None,
        })
    }

    pub fn roll(&mut self) {
        self.game.roll();
    }

    pub fn putt(&mut self) {
        self.game.putt();
    }

    /// Club 1-5: driver, long iron, wedge, chip, putter
    pub fn select_dice(&mut self, number: u8) {
        self.game.select_dice(number);
    }

    pub fn change_dice_amount(&mut self, delta: i32) {
        self.game.change_dice_amount(delta);
    }

    pub fn select_move(&mut self, x: i32, y: i32) {
        self.game.select_move(x, y);
    }

    pub fn next_hole(&mut self) {
        self.game.next_hole();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.audio.apply_settings(&self.settings);
        self.settings.save();
    }

    pub fn set_volume(&mut self, master: f32, sfx: f32) {
        self.settings.master_volume = master.clamp(0.0, 1.0);
        self.settings.sfx_volume = sfx.clamp(0.0, 1.0);
        self.audio.apply_settings(&self.settings);
        self.settings.save();
    }

    pub fn set_tracers(&mut self, on: bool) {
        self.settings.tracers = on;
        self.settings.save();
    }

    /// Current settings as JSON
    pub fn settings_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.settings).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Completed holes as JSON
    pub fn scorecard_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.game.session().scorecard())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Advance to `time_ms` (a `requestAnimationFrame` timestamp) and return
    /// the snapshot to draw, as JSON
    pub fn frame(&mut self, time_ms: f64) -> Result<String, JsValue> {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(time_ms);
        self.game.update(dt);

        for event in self.game.drain_events() {
            if let GameEvent::HoleGenerated { .. } = event {
                self.audio.stop_all();
            }
            self.audio.handle_event(&event);
        }
        self.remember_club();

        let mut snapshot = self.game.snapshot();
        if !self.settings.tracers {
            snapshot.tracers.clear();
        }
        if !self.settings.effective_celebrations() {
            snapshot.celebration = None;
            snapshot.celebration_image = None;
        }
        serde_json::to_string(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl WebGame {
    /// Persist club and dice count when the player changes them
    fn remember_club(&mut self) {
        let turn = self.game.session().turn();
        if turn.selected_dice_kind != self.settings.club
            || turn.dice_amount != self.settings.dice_amount
        {
            self.settings.club = turn.selected_dice_kind;
            self.settings.dice_amount = turn.dice_amount;
            self.settings.save();
        }
    }
}
