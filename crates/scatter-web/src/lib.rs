//! Browser host for `scatter-engine`.
//!
//! Exposes a small `#[wasm_bindgen]` surface: `mount` an image onto a canvas,
//! `unmount` it, and `export_artifact` a self-contained replay of the current
//! session. Replays embed this same module and call `mount` on load.

pub mod image_source;
pub mod listeners;
pub mod mount;
pub mod runner;

use std::cell::RefCell;

use scatter_engine::{ExportOptions, ReplayRuntime, SimConfig};
use wasm_bindgen::prelude::*;

pub use mount::Mount;
pub use runner::{FrameDriver, SessionRunner};

thread_local! {
    static MOUNT: RefCell<Option<Mount>> = RefCell::new(None);
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js(err: scatter_engine::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_config(json: Option<String>) -> Result<SimConfig, scatter_engine::Error> {
    match json {
        Some(json) if !json.trim().is_empty() => SimConfig::from_json(&json),
        _ => Ok(SimConfig::default()),
    }
}

/// Show `image_url` as particles on the canvas `canvas_id`. Any previous
/// mount is torn down first.
#[wasm_bindgen]
pub fn mount(canvas_id: &str, image_url: &str, config_json: Option<String>) -> Result<(), JsValue> {
    init_logging();
    unmount();
    let config = parse_config(config_json).map_err(to_js)?;
    let mounted = Mount::new(canvas_id, image_url, config)?;
    MOUNT.with(|cell| *cell.borrow_mut() = Some(mounted));
    Ok(())
}

/// Stop the frame loop, detach listeners and release particles.
#[wasm_bindgen]
pub fn unmount() {
    let previous = MOUNT.with(|cell| cell.borrow_mut().take());
    drop(previous);
}

#[wasm_bindgen]
pub fn particle_count() -> u32 {
    MOUNT.with(|cell| cell.borrow().as_ref().map_or(0, |m| m.particle_count() as u32))
}

/// Build a replay document for `image` with the mounted session's config.
///
/// `runtime_js` and `runtime_wasm` are this package's `no-modules` glue and
/// module bytes, as fetched by the page.
#[wasm_bindgen]
pub fn export_artifact(
    image: &[u8],
    runtime_js: &str,
    runtime_wasm: &[u8],
    title: Option<String>,
) -> Result<String, JsValue> {
    init_logging();
    let config = MOUNT.with(|cell| cell.borrow().as_ref().map(Mount::config).unwrap_or_default());
    let runtime = ReplayRuntime {
        script: runtime_js,
        wasm: runtime_wasm,
    };
    let options = title
        .map(|title| ExportOptions { title })
        .unwrap_or_default();
    scatter_engine::export_artifact(image, &runtime, &config, &options).map_err(to_js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_config_uses_defaults() {
        assert_eq!(parse_config(None).unwrap(), SimConfig::default());
        assert_eq!(parse_config(Some("  ".into())).unwrap(), SimConfig::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config = parse_config(Some(r#"{"pointer_radius": 60}"#.into())).unwrap();
        assert_eq!(config.pointer_radius, 60.0);
        assert_eq!(config.friction, SimConfig::default().friction);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(parse_config(Some(r#"{"friction": 0}"#.into())).is_err());
        assert!(parse_config(Some("not json".into())).is_err());
    }
}
