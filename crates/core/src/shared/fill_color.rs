use thiserror::Error;

/// One pixel as an `[r, g, b]` byte triplet.
pub type Rgb = [u8; 3];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FillColorError {
    #[error("expected 3 comma-separated components, got {0}")]
    ComponentCount(usize),
    #[error("component {0:?} is not an integer in 0-255")]
    InvalidComponent(String),
}

/// Parses an `"r,g,b"` color string. Whitespace around components is
/// ignored.
pub fn parse_color(text: &str) -> Result<Rgb, FillColorError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(FillColorError::ComponentCount(parts.len()));
    }
    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part
            .parse::<u8>()
            .map_err(|_| FillColorError::InvalidComponent((*part).to_string()))?;
    }
    Ok(rgb)
}

/// Parses `text`, falling back to `fallback` (with a warning) when the
/// string is malformed.
pub fn parse_color_or(text: &str, fallback: Rgb) -> Rgb {
    match parse_color(text) {
        Ok(rgb) => rgb,
        Err(e) => {
            log::warn!("Invalid color format {text:?} ({e}); using {fallback:?}");
            fallback
        }
    }
}
