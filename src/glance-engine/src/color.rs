//! Color-space derivation for custom styles.
//!
//! Custom styles keep the user's accent verbatim and derive the rest of the
//! palette in HSL: fixed lightness targets per mode, saturation clamped so
//! backgrounds stay quiet. Malformed accent input degrades to neutral gray
//! instead of failing.

use serde::{Deserialize, Serialize};

use crate::styles::{FontPair, PresetColors, StyleCatalog, StylePreset};

/// Light/dark rendering mode for a custom style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// User-chosen customization: accent color, a catalog preset to borrow the
/// font pairing from, and a mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomStyle {
    /// Accent color as `#rrggbb`.
    pub accent_color: String,
    /// Name of the catalog preset whose fonts to borrow.
    pub font_pairing: String,
    pub mode: Mode,
}

/// HSL triple: hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Convert `#rrggbb` to HSL. Anything that is not 6-digit hex degrades to
/// neutral gray (h=0, s=0, l=50).
pub fn hex_to_hsl(hex: &str) -> Hsl {
    let Some(raw) = parse_hex(hex) else {
        return Hsl {
            h: 0.0,
            s: 0.0,
            l: 50.0,
        };
    };
    let r = f64::from(raw[0]) / 255.0;
    let g = f64::from(raw[1]) / 255.0;
    let b = f64::from(raw[2]) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f64::EPSILON {
        return Hsl {
            h: 0.0,
            s: 0.0,
            l: (l * 100.0).round(),
        };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < f64::EPSILON {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if (max - g).abs() < f64::EPSILON {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    Hsl {
        h: (h * 360.0).round(),
        s: (s * 100.0).round(),
        l: (l * 100.0).round(),
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let raw = hex.strip_prefix('#')?;
    if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some([
        u8::from_str_radix(&raw[0..2], 16).ok()?,
        u8::from_str_radix(&raw[2..4], 16).ok()?,
        u8::from_str_radix(&raw[4..6], 16).ok()?,
    ])
}

/// Convert HSL back to `#rrggbb`.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let s_norm = s / 100.0;
    let l_norm = l / 100.0;

    let c = (1.0 - (2.0 * l_norm - 1.0).abs()) * s_norm;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l_norm - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let to_byte = |n: f64| ((n + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", to_byte(r), to_byte(g), to_byte(b))
}

/// Derive the full palette from an accent hex and a mode. The accent passes
/// through unchanged, even when malformed.
pub fn derive_colors(accent_hex: &str, mode: Mode) -> PresetColors {
    let Hsl { h, s, .. } = hex_to_hsl(accent_hex);

    match mode {
        Mode::Dark => PresetColors {
            bg: hsl_to_hex(h, s.min(30.0), 10.0),
            text: hsl_to_hex(h, 10.0, 90.0),
            surface: hsl_to_hex(h, s.min(25.0), 15.0),
            accent: accent_hex.to_string(),
        },
        Mode::Light => PresetColors {
            bg: hsl_to_hex(h, s.min(30.0), 97.0),
            text: hsl_to_hex(h, s.min(30.0), 15.0),
            surface: "#ffffff".to_string(),
            accent: accent_hex.to_string(),
        },
    }
}

/// Name of the preset whose fonts are borrowed when the requested pairing
/// is absent from the catalog.
const DEFAULT_FONT_SOURCE: &str = "midnight-scholar";

/// Compose a full preset from a custom style: derived colors, fonts borrowed
/// from a named catalog entry, and a synthesized mood line.
pub fn build_custom_preset(catalog: &StyleCatalog, custom: &CustomStyle) -> StylePreset {
    let fonts: FontPair = catalog
        .preset_by_name(&custom.font_pairing)
        .or_else(|| catalog.preset_by_name(DEFAULT_FONT_SOURCE))
        .map(|p| p.fonts.clone())
        .unwrap_or(FontPair {
            heading: "Space Grotesk".into(),
            body: "Inter".into(),
        });

    let colors = derive_colors(&custom.accent_color, custom.mode);

    let vibrancy = if hex_to_hsl(&custom.accent_color).s > 50.0 {
        "vibrant"
    } else {
        "warm"
    };
    let mood = format!("custom {}, {}", custom.mode.as_str(), vibrancy);

    StylePreset {
        name: format!("custom-{}", custom.mode.as_str()),
        colors,
        fonts,
        mood,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_hsl_round_trip() {
        // #06B6D4 is hsl(189, 94%, 43%) within rounding.
        let hsl = hex_to_hsl("#06B6D4");
        assert!((hsl.h - 189.0).abs() <= 1.0);
        assert!(hsl.s > 90.0);
        let back = hsl_to_hex(hsl.h, hsl.s, hsl.l);
        assert!(back.starts_with('#') && back.len() == 7);
    }

    #[test]
    fn test_malformed_hex_degrades_to_gray() {
        let hsl = hex_to_hsl("not-a-hex");
        assert_eq!(
            hsl,
            Hsl {
                h: 0.0,
                s: 0.0,
                l: 50.0
            }
        );
        assert_eq!(hex_to_hsl("#12345"), hex_to_hsl("nope"));
    }

    #[test]
    fn test_derive_colors_dark_and_light() {
        for mode in [Mode::Dark, Mode::Light] {
            let colors = derive_colors("#06B6D4", mode);
            assert_eq!(colors.accent, "#06B6D4");
            for field in [&colors.bg, &colors.text, &colors.surface] {
                assert!(!field.is_empty());
            }
        }
        assert_eq!(derive_colors("#06B6D4", Mode::Light).surface, "#ffffff");
    }

    #[test]
    fn test_derive_colors_malformed_does_not_panic() {
        let colors = derive_colors("not-a-hex", Mode::Dark);
        assert_eq!(colors.accent, "not-a-hex");
        assert!(colors.bg.starts_with('#'));
        assert!(colors.text.starts_with('#'));
        assert!(colors.surface.starts_with('#'));
    }

    #[test]
    fn test_build_custom_preset_borrows_fonts_with_fallback() {
        let catalog = StyleCatalog::default();
        let custom = CustomStyle {
            accent_color: "#f43f5e".into(),
            font_pairing: "warm-notebook".into(),
            mode: Mode::Light,
        };
        let preset = build_custom_preset(&catalog, &custom);
        assert_eq!(preset.fonts.heading, "Playfair Display");
        assert_eq!(preset.name, "custom-light");
        // Saturation of #f43f5e is > 50 -> vibrant.
        assert_eq!(preset.mood, "custom light, vibrant");

        let absent = CustomStyle {
            font_pairing: "does-not-exist".into(),
            ..custom
        };
        let preset = build_custom_preset(&catalog, &absent);
        assert_eq!(preset.fonts.heading, "Space Grotesk");
    }

    #[test]
    fn test_low_saturation_accent_is_warm() {
        let catalog = StyleCatalog::default();
        let custom = CustomStyle {
            accent_color: "#808080".into(),
            font_pairing: "midnight-scholar".into(),
            mode: Mode::Dark,
        };
        let preset = build_custom_preset(&catalog, &custom);
        assert_eq!(preset.mood, "custom dark, warm");
    }
}
