//! Replay artifact assembly.
//!
//! A replay is one HTML document with everything inlined: the processed image,
//! the session's `SimConfig`, and the web runtime (wasm-bindgen `no-modules`
//! glue plus the wasm module). Its bootstrap calls the same `mount` entry point
//! as the live page, so the replay runs the exact engine build that exported it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::api::config::SimConfig;
use crate::api::error::{Error, Result};

const TEMPLATE: &str = include_str!("replay.html");

const IMAGE_SECTION: &str = "scatter-image";
const CONFIG_SECTION: &str = "scatter-config";
const WASM_SECTION: &str = "scatter-runtime-wasm";

const WASM_MAGIC: &[u8] = b"\0asm";

/// The compiled web host to embed: glue script and module bytes.
#[derive(Debug, Clone, Copy)]
pub struct ReplayRuntime<'a> {
    /// wasm-bindgen glue built with `--target no-modules`.
    pub script: &'a str,
    /// The matching `_bg.wasm` module.
    pub wasm: &'a [u8],
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Document title, HTML-escaped on output.
    pub title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "Particle Art".to_string(),
        }
    }
}

/// Build a self-contained replay document for `image` (encoded bytes, e.g. PNG).
///
/// Nothing is produced unless every part validates: the payload must decode as
/// an image and the runtime must contain both a script and a wasm module.
pub fn export_artifact(
    image: &[u8],
    runtime: &ReplayRuntime<'_>,
    config: &SimConfig,
    options: &ExportOptions,
) -> Result<String> {
    if image.is_empty() {
        return Err(Error::EmptyPayload);
    }
    let format = image::guess_format(image).map_err(|_| Error::UnrecognizedImage)?;
    image::load_from_memory_with_format(image, format)?;

    if runtime.script.trim().is_empty() {
        return Err(Error::MissingRuntime("glue script"));
    }
    if !runtime.wasm.starts_with(WASM_MAGIC) {
        return Err(Error::MissingRuntime("WebAssembly module"));
    }

    config.validate()?;
    let config_json = config.to_json()?.replace("</", "<\\/");
    let image_b64 = STANDARD.encode(image);
    let wasm_b64 = STANDARD.encode(runtime.wasm);
    let script = escape_script(runtime.script);
    let title = escape_html(&options.title);

    let artifact = render(TEMPLATE, |key| match key {
        "title" => Some(title.as_str()),
        "config" => Some(config_json.as_str()),
        "mime" => Some(format.to_mime_type()),
        "image" => Some(image_b64.as_str()),
        "wasm" => Some(wasm_b64.as_str()),
        "runtime" => Some(script.as_str()),
        _ => None,
    });

    log::info!(
        "replay artifact: {} bytes ({} image, {} runtime)",
        artifact.len(),
        image.len(),
        runtime.wasm.len() + runtime.script.len()
    );
    Ok(artifact)
}

/// Decode the image payload embedded in a replay document.
pub fn extract_payload(artifact: &str) -> Result<Vec<u8>> {
    let b64 = section(artifact, IMAGE_SECTION).ok_or(Error::PayloadNotFound("image"))?;
    Ok(STANDARD.decode(b64.trim())?)
}

/// Read back the simulation config a replay document will run with.
pub fn extract_config(artifact: &str) -> Result<SimConfig> {
    let json = section(artifact, CONFIG_SECTION).ok_or(Error::PayloadNotFound("config"))?;
    SimConfig::from_json(&json.replace("<\\/", "</"))
}

/// Decode the wasm module embedded in a replay document.
pub fn extract_runtime_wasm(artifact: &str) -> Result<Vec<u8>> {
    let b64 = section(artifact, WASM_SECTION).ok_or(Error::PayloadNotFound("runtime module"))?;
    Ok(STANDARD.decode(b64.trim())?)
}

/// Text content of the `<script id="{id}" ...>` element.
fn section<'a>(artifact: &'a str, id: &str) -> Option<&'a str> {
    let marker = format!("id=\"{id}\"");
    let tag_start = artifact.find(&marker)?;
    let body_start = tag_start + artifact[tag_start..].find('>')? + 1;
    let body_len = artifact[body_start..].find("</script>")?;
    Some(&artifact[body_start..body_start + body_len])
}

/// Single pass over `{{key}}` placeholders. Substituted values are not rescanned.
fn render<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                let key = &after[..close];
                match lookup(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[close + 2..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Keep inline script text from closing its element early.
fn escape_script(script: &str) -> String {
    // ASCII lowercasing keeps byte offsets, so matches index `script` directly.
    let lower = script.to_ascii_lowercase();
    let mut out = String::with_capacity(script.len());
    let mut last = 0;
    for (pos, _) in lower.match_indices("</script") {
        out.push_str(&script[last..pos]);
        out.push_str("<\\/");
        last = pos + 2;
    }
    out.push_str(&script[last..]);
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
