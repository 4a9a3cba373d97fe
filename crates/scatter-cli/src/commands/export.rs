//! `scatter export`: self-contained HTML replay

use anyhow::{bail, Context, Result};
use clap::Args;
use scatter_engine::export::extract_runtime_wasm;
use scatter_engine::{export_artifact, extract_config, extract_payload, ExportOptions, ReplayRuntime, SimConfig};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::{load_config, load_image};

/// Glue script emitted by `wasm-bindgen --target no-modules` for scatter-web.
const RUNTIME_SCRIPT: &str = "scatter_web.js";
/// The matching wasm module.
const RUNTIME_MODULE: &str = "scatter_web_bg.wasm";

#[derive(Args)]
pub struct ExportArgs {
    /// Image to embed
    pub image: PathBuf,

    /// Directory holding the built scatter-web runtime
    #[arg(long)]
    pub runtime: PathBuf,

    /// Output HTML path
    #[arg(short, long)]
    pub out: PathBuf,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,

    /// Simulation config (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read the written file back and check its payload and config
    #[arg(long)]
    pub verify: bool,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let (bytes, _) = load_image(&args.image)?;
    let (script, wasm) = load_runtime(&args.runtime)?;

    let runtime = ReplayRuntime {
        script: &script,
        wasm: &wasm,
    };
    let options = args
        .title
        .map(|title| ExportOptions { title })
        .unwrap_or_default();

    let artifact = export_artifact(&bytes, &runtime, &config, &options)
        .with_context(|| format!("Failed to export {}", args.image.display()))?;
    fs::write(&args.out, &artifact)
        .with_context(|| format!("Failed to write replay: {}", args.out.display()))?;
    println!("Wrote {} ({} bytes)", args.out.display(), artifact.len());

    if args.verify {
        verify(&args.out, &bytes, &config, &wasm)?;
        println!("Verified: payload, config and runtime round-trip");
    }
    Ok(())
}

fn load_runtime(dir: &Path) -> Result<(String, Vec<u8>)> {
    let script_path = dir.join(RUNTIME_SCRIPT);
    let module_path = dir.join(RUNTIME_MODULE);
    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read runtime script: {}", script_path.display()))?;
    let wasm = fs::read(&module_path)
        .with_context(|| format!("Failed to read runtime module: {}", module_path.display()))?;
    log::debug!(
        "runtime from {}: {} byte script, {} byte module",
        dir.display(),
        script.len(),
        wasm.len()
    );
    Ok((script, wasm))
}

fn verify(path: &Path, image: &[u8], config: &SimConfig, wasm: &[u8]) -> Result<()> {
    let written = fs::read_to_string(path)
        .with_context(|| format!("Failed to re-read replay: {}", path.display()))?;
    let payload = extract_payload(&written).context("Replay has no readable image payload")?;
    if payload != image {
        bail!("Replay payload differs from the source image");
    }
    let embedded = extract_config(&written).context("Replay has no readable config")?;
    if &embedded != config {
        bail!("Replay config differs from the exported config");
    }
    let module = extract_runtime_wasm(&written).context("Replay has no readable runtime module")?;
    if module != wasm {
        bail!("Replay runtime module differs from {RUNTIME_MODULE}");
    }
    Ok(())
}
