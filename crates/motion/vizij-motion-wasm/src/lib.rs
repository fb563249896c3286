use js_sys::Function;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_motion_core::{Config, MotionEngine, NodeIndex, NodeTransform};

#[wasm_bindgen]
pub struct VizijMotion {
    core: MotionEngine<NodeIndex>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Serialize with plain JS objects for maps (no `Map` instances).
fn to_js<T: Serialize>(value: &T, what: &str) -> Result<JsValue, JsError> {
    value
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

#[wasm_bindgen]
impl VizijMotion {
    /// Create a new engine. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new VizijMotion({ delimiter: ";", initial_loop: false })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijMotion, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(VizijMotion {
            core: MotionEngine::new(NodeIndex::new(), cfg),
        })
    }

    /// Register a scene node by name. `transform` is optional
    /// `{ position, rotation (radians), scale }`; it also becomes the rest pose.
    #[wasm_bindgen(js_name = register_node)]
    pub fn register_node(&mut self, name: String, transform: JsValue) -> Result<(), JsError> {
        let transform: NodeTransform = if jsvalue_is_undefined_or_null(&transform) {
            NodeTransform::default()
        } else {
            swb::from_value(transform)
                .map_err(|e| JsError::new(&format!("register_node transform error: {e}")))?
        };
        self.core.resolver_mut().insert(name, transform);
        Ok(())
    }

    /// Current transform of a registered node, or undefined.
    #[wasm_bindgen(js_name = node_transform)]
    pub fn node_transform(&self, name: &str) -> Result<JsValue, JsError> {
        match self.core.resolver().get(name) {
            Some(t) => to_js(t, "node_transform"),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Put every registered node back to the pose it was registered with.
    #[wasm_bindgen(js_name = reset_to_rest)]
    pub fn reset_to_rest(&mut self) {
        self.core.resolver_mut().reset_to_rest();
    }

    /// Parse and install CSV motion text. Returns the parse report.
    #[wasm_bindgen(js_name = load_timeline)]
    pub fn load_timeline(&mut self, text: &str) -> Result<JsValue, JsError> {
        let report = self.core.load_timeline(text);
        to_js(&report, "load_timeline")
    }

    pub fn play(&mut self) {
        self.core.play();
    }

    pub fn pause(&mut self) {
        self.core.pause();
    }

    pub fn stop(&mut self) {
        self.core.stop();
    }

    #[wasm_bindgen(js_name = set_speed)]
    pub fn set_speed(&mut self, speed: f64) -> Result<(), JsError> {
        self.core
            .set_speed(speed)
            .map_err(|e| JsError::new(&format!("set_speed: {e}")))
    }

    #[wasm_bindgen(js_name = set_loop)]
    pub fn set_loop(&mut self, loop_enabled: bool) {
        self.core.set_loop(loop_enabled);
    }

    #[wasm_bindgen(js_name = set_progress)]
    pub fn set_progress(&mut self, fraction: f64) -> Result<(), JsError> {
        self.core
            .set_progress(fraction)
            .map_err(|e| JsError::new(&format!("set_progress: {e}")))
    }

    /// Advance by dt (milliseconds). Returns Outputs JSON.
    pub fn tick(&mut self, dt_ms: f64) -> Result<JsValue, JsError> {
        let out = self.core.tick(dt_ms);
        to_js(out, "outputs")
    }

    /// Advance by the configured fallback frame time. Returns Outputs JSON.
    #[wasm_bindgen(js_name = advance_frame)]
    pub fn advance_frame(&mut self) -> Result<JsValue, JsError> {
        let out = self.core.advance_frame();
        to_js(out, "outputs")
    }

    /// Outputs of the most recent call.
    pub fn outputs(&self) -> Result<JsValue, JsError> {
        to_js(self.core.outputs(), "outputs")
    }

    /// `{ playing, loop, speed, progress, timeMs, durationMs }`
    #[wasm_bindgen(js_name = get_state)]
    pub fn get_state(&self) -> Result<JsValue, JsError> {
        to_js(&self.core.state(), "state")
    }

    /// Register `listener(state)`, called synchronously after every state change.
    #[wasm_bindgen(js_name = set_listener)]
    pub fn set_listener(&mut self, listener: Function) {
        self.core.set_listener(move |state| {
            let Ok(arg) = state.serialize(&swb::Serializer::json_compatible()) else {
                return;
            };
            // Listener exceptions are swallowed.
            let _ = listener.call1(&JsValue::UNDEFINED, &arg);
        });
    }

    #[wasm_bindgen(js_name = clear_listener)]
    pub fn clear_listener(&mut self) {
        self.core.clear_listener();
    }

    #[wasm_bindgen(js_name = duration_ms)]
    pub fn duration_ms(&self) -> f64 {
        self.core.timeline().duration_ms()
    }

    #[wasm_bindgen(js_name = track_count)]
    pub fn track_count(&self) -> usize {
        self.core.timeline().track_count()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
