//! WASM bindings for Thermoslab.
//!
//! This module provides JavaScript-friendly bindings for running a slab
//! simulation in the browser, typically a few steps per animation frame.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmSlabSim } from 'thermoslab';
//!
//! await init();
//!
//! const slab = `
//!   .grid nx=40 nz=10 lx=50m lz=5m
//!   .time dt=0.1 end=300
//!   .source temp=85 period=20
//! `;
//!
//! const sim = new WasmSlabSim(slab);
//!
//! function frame() {
//!   sim.run_steps(10);
//!   draw(sim.field(), sim.nx, sim.nz);
//!   if (!sim.is_finished()) requestAnimationFrame(frame);
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::config::SlabConfig;
use crate::dsl;
use crate::error::SlabError;
use crate::solver::Simulator;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: SlabError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible slab simulator.
///
/// Wraps the native `Simulator` with a JavaScript-friendly API.
#[wasm_bindgen]
pub struct WasmSlabSim {
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmSlabSim {
    /// Create a simulator from a slab description string.
    ///
    /// # Returns
    /// A new `WasmSlabSim` instance or an error if the description is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(slab_dsl: &str) -> Result<WasmSlabSim, JsValue> {
        let ast = dsl::parse(slab_dsl).map_err(to_js)?;
        let config = SlabConfig::from_ast(&ast).map_err(to_js)?;
        let simulator = Simulator::new(config).map_err(to_js)?;
        Ok(WasmSlabSim { simulator })
    }

    /// Advance one time step. Returns `true` once the simulation has finished.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<bool, JsValue> {
        let status = self.simulator.step().map_err(to_js)?;
        Ok(status.is_finished())
    }

    /// Advance up to `count` steps, stopping early when finished.
    ///
    /// Returns `true` once the simulation has finished.
    #[wasm_bindgen]
    pub fn run_steps(&mut self, count: usize) -> Result<bool, JsValue> {
        let status = self.simulator.run_steps(count).map_err(to_js)?;
        Ok(status.is_finished())
    }

    /// Copy of the field, row-major with row 0 at the bed.
    #[wasm_bindgen]
    pub fn field(&self) -> Vec<f64> {
        self.simulator.field().as_slice().to_vec()
    }

    /// Current simulation time in seconds.
    #[wasm_bindgen(getter)]
    pub fn time(&self) -> f64 {
        self.simulator.time()
    }

    #[wasm_bindgen(getter)]
    pub fn nx(&self) -> usize {
        self.simulator.field().nx()
    }

    #[wasm_bindgen(getter)]
    pub fn nz(&self) -> usize {
        self.simulator.field().nz()
    }

    /// Time steady state was reached, or `undefined`.
    #[wasm_bindgen]
    pub fn steady_state_time(&self) -> Option<f64> {
        self.simulator.steady_state_time()
    }

    #[wasm_bindgen]
    pub fn is_finished(&self) -> bool {
        self.simulator.status().is_finished()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
