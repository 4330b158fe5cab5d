use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size of the region read back from the framebuffer after every frame.
///
/// Parsing and deserialization reject zero dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Dimensions")]
pub struct ReadbackSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ReadbackSize {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
        }
    }
}

impl ReadbackSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bytes needed to hold the region as RGBA8.
    pub fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl fmt::Display for ReadbackSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid readback size `{0}` (expected WIDTHxHEIGHT, e.g. 400x400)")]
pub struct InvalidReadbackSize(String);

impl FromStr for ReadbackSize {
    type Err = InvalidReadbackSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidReadbackSize(s.to_string());
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;
        Self::try_from(Dimensions { width, height })
    }
}

/// Unchecked wire form of [`ReadbackSize`].
#[derive(Deserialize)]
struct Dimensions {
    width: u32,
    height: u32,
}

impl TryFrom<Dimensions> for ReadbackSize {
    type Error = InvalidReadbackSize;

    fn try_from(Dimensions { width, height }: Dimensions) -> Result<Self, Self::Error> {
        if width == 0 || height == 0 {
            return Err(InvalidReadbackSize(format!("{width}x{height}")));
        }
        Ok(Self { width, height })
    }
}

/// Render component configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Draw as an overlay into a shared surface: no clear, no present,
    /// window left visible. When `false` the component owns a hidden
    /// window which it clears and presents every frame.
    pub single_window: bool,
    pub readback: ReadbackSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_readback_is_400_square() {
        let config = RenderConfig::default();
        assert!(!config.single_window);
        assert_eq!(config.readback, ReadbackSize::new(400, 400));
        assert_eq!(config.readback.byte_len(), 400 * 400 * 4);
    }

    #[test]
    fn parse_readback_size() {
        assert_eq!("640x480".parse(), Ok(ReadbackSize::new(640, 480)));
        assert_eq!("32X16".parse(), Ok(ReadbackSize::new(32, 16)));
        assert!("640".parse::<ReadbackSize>().is_err());
        assert!("ax4".parse::<ReadbackSize>().is_err());
        assert!("-1x4".parse::<ReadbackSize>().is_err());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            "0x400".parse::<ReadbackSize>(),
            Err(InvalidReadbackSize("0x400".into()))
        );
        assert!("400x0".parse::<ReadbackSize>().is_err());
    }

    #[test]
    fn deserialize_rejects_zero_dimensions() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "readback": { "width": 32, "height": 16 } }"#).unwrap();
        assert_eq!(config.readback, ReadbackSize::new(32, 16));

        let err = serde_json::from_str::<RenderConfig>(
            r#"{ "readback": { "width": 0, "height": 400 } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("0x400"), "{err}");
    }

    #[test]
    fn display_round_trips_through_parse() {
        let size = ReadbackSize::new(128, 64);
        assert_eq!(size.to_string().parse(), Ok(size));
    }
}
