use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized color: {0}")]
pub struct InvalidColor(pub String);

/// A marker color token, accepted exactly when the SVG rasterizer can paint
/// with it: CSS color names, `#rgb` / `#rrggbb` hex codes and CSS color
/// functions. Stored trimmed and lowercase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerColor(String);

impl MarkerColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MarkerColor {
    fn default() -> Self {
        MarkerColor("red".to_string())
    }
}

impl FromStr for MarkerColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        // The token is written into an attribute verbatim
        if token.is_empty() || token.contains(['\'', '"', '<', '>', '&']) {
            return Err(InvalidColor(s.to_string()));
        }

        svgtypes::Color::from_str(&token)
            .map(|_| MarkerColor(token))
            .map_err(|_| InvalidColor(s.to_string()))
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
