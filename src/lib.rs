#![cfg_attr(target_arch = "wasm32", allow(dead_code))]
//! Lightning-text logo and nucleus shader background for the waitlist page.
//!
//! The simulation core (bolts, sparks, the glyph scanner, the frame stage and
//! the shader host state machine) is target independent and runs against the
//! [`surface::Surface`] and [`shader::GpuContext`] traits. The browser
//! bindings that implement those traits over Canvas2D and WebGL2 are only
//! compiled for wasm32.

pub mod bitmap;
pub mod bolt;
pub mod color;
pub mod config;
pub mod entropy;
pub mod error;
pub mod scanner;
pub mod shader;
pub mod spark;
pub mod stage;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use bolt::Bolt;
pub use color::Rgba;
pub use config::{LogoConfig, SpawnChance};
pub use entropy::{Entropy, SeededEntropy};
pub use error::FxError;
pub use scanner::GlyphScanner;
pub use shader::{GpuContext, HostState, ShaderError, ShaderHost};
pub use spark::{Burst, Spark};
pub use stage::LightningStage;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    pub mod canvas;
    pub mod events;
    pub mod logo;
    pub mod nucleus;
    pub mod render;
    pub mod webgl;

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        // a logger may already be installed by the host page or a test harness
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("realms_viz loaded");
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{
    logo::{LightningLogo, LogoOptions},
    nucleus::NucleusBackground,
};
