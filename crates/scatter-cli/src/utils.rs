//! Argument parsing and file helpers shared by the commands

use anyhow::{Context, Result};
use scatter_engine::{DecodedImage, SimConfig, Viewport};
use std::fs;
use std::path::Path;

/// Parse a `WIDTHxHEIGHT` viewport such as `1000x800`.
pub fn parse_viewport(s: &str) -> Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid width '{w}': {e}"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid height '{h}': {e}"))?;
    if width == 0 || height == 0 {
        return Err(format!("viewport must be non-empty, got {width}x{height}"));
    }
    Ok(Viewport::new(width, height))
}

/// Parse an `X,Y` pointer position in viewport coordinates.
pub fn parse_pointer(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x = x
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid x '{x}': {e}"))?;
    let y = y
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid y '{y}': {e}"))?;
    if !x.is_finite() || !y.is_finite() {
        return Err("pointer coordinates must be finite".to_string());
    }
    Ok((x, y))
}

/// Load a config file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    SimConfig::from_json(&json).with_context(|| format!("Invalid config: {}", path.display()))
}

/// Read an image file, returning its raw bytes and the decoded pixels.
pub fn load_image(path: &Path) -> Result<(Vec<u8>, DecodedImage)> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?;
    let image = DecodedImage::decode(&bytes)
        .with_context(|| format!("Failed to decode image: {}", path.display()))?;
    Ok((bytes, image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn viewport_parsing() {
        assert_eq!(parse_viewport("1000x800").unwrap(), Viewport::new(1000, 800));
        assert_eq!(parse_viewport("640X480").unwrap(), Viewport::new(640, 480));
        assert!(parse_viewport("1000").is_err());
        assert!(parse_viewport("0x10").is_err());
        assert!(parse_viewport("axb").is_err());
    }

    #[test]
    fn pointer_parsing() {
        assert_eq!(parse_pointer("150,50").unwrap(), (150.0, 50.0));
        assert_eq!(parse_pointer(" 1.5 , -2 ").unwrap(), (1.5, -2.0));
        assert!(parse_pointer("150").is_err());
        assert!(parse_pointer("inf,0").is_err());
    }

    #[test]
    fn config_defaults_without_path() {
        assert_eq!(load_config(None).unwrap(), SimConfig::default());
    }

    #[test]
    fn config_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"pointer_radius": 42, "friction": 0.9}}"#).unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.pointer_radius, 42.0);
        assert_eq!(config.friction, 0.9);
        assert_eq!(config.ease, SimConfig::default().ease);
    }

    #[test]
    fn invalid_config_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"friction": 1.5}}"#).unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn undecodable_image_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"definitely not an image").unwrap();
        assert!(load_image(file.path()).is_err());
    }
}
