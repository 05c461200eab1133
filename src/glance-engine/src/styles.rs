//! Style presets and the preset catalog.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Color palette for a preset. Hex strings, `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetColors {
    pub bg: String,
    pub text: String,
    pub accent: String,
    pub surface: String,
}

/// Heading/body font pairing (Google Fonts family names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPair {
    pub heading: String,
    pub body: String,
}

/// A named visual style: palette, font pairing, and a mood line that feeds
/// the renderer prompt. Immutable once selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePreset {
    pub name: String,
    pub colors: PresetColors,
    pub fonts: FontPair,
    pub mood: String,
}

impl StylePreset {
    fn new(
        name: &str,
        (bg, text, accent, surface): (&str, &str, &str, &str),
        (heading, body): (&str, &str),
        mood: &str,
    ) -> Self {
        Self {
            name: name.into(),
            colors: PresetColors {
                bg: bg.into(),
                text: text.into(),
                accent: accent.into(),
                surface: surface.into(),
            },
            fonts: FontPair {
                heading: heading.into(),
                body: body.into(),
            },
            mood: mood.into(),
        }
    }
}

/// Read-only table of named presets. Injected rather than global so tests
/// can substitute a fixed catalog.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    presets: Vec<StylePreset>,
}

impl StyleCatalog {
    /// Build a catalog from an explicit preset list.
    pub fn new(presets: Vec<StylePreset>) -> Self {
        Self { presets }
    }

    /// Uniform random choice over the catalog.
    pub fn random_preset(&self) -> StylePreset {
        self.presets
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(fallback_preset)
    }

    /// Look up a preset by name.
    pub fn preset_by_name(&self, name: &str) -> Option<&StylePreset> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::new(vec![
            StylePreset::new(
                "midnight-scholar",
                ("#0f172a", "#e2e8f0", "#38bdf8", "#1e293b"),
                ("Space Grotesk", "Inter"),
                "dark, technical, clean",
            ),
            StylePreset::new(
                "warm-notebook",
                ("#fef3c7", "#451a03", "#d97706", "#ffffff"),
                ("Playfair Display", "Source Sans 3"),
                "warm, editorial, approachable",
            ),
            StylePreset::new(
                "forest-green",
                ("#064e3b", "#d1fae5", "#34d399", "#065f46"),
                ("Merriweather", "Lato"),
                "natural, calm, earthy",
            ),
            StylePreset::new(
                "sunset-coral",
                ("#fff1f2", "#4c0519", "#f43f5e", "#ffffff"),
                ("Poppins", "Nunito"),
                "energetic, vibrant, friendly",
            ),
            StylePreset::new(
                "ocean-deep",
                ("#0c4a6e", "#e0f2fe", "#0ea5e9", "#075985"),
                ("Archivo", "IBM Plex Sans"),
                "professional, deep, modern",
            ),
            StylePreset::new(
                "lavender-dream",
                ("#faf5ff", "#3b0764", "#a855f7", "#ffffff"),
                ("DM Serif Display", "DM Sans"),
                "elegant, soft, creative",
            ),
            StylePreset::new(
                "charcoal-minimal",
                ("#18181b", "#fafafa", "#a1a1aa", "#27272a"),
                ("Geist", "Geist Mono"),
                "stark, focused, monochrome",
            ),
            StylePreset::new(
                "terracotta",
                ("#fef2f2", "#7c2d12", "#ea580c", "#ffffff"),
                ("Libre Baskerville", "Karla"),
                "classic, warm, grounded",
            ),
            StylePreset::new(
                "arctic-frost",
                ("#f0f9ff", "#0c4a6e", "#06b6d4", "#ffffff"),
                ("Outfit", "Work Sans"),
                "crisp, airy, minimal",
            ),
            StylePreset::new(
                "golden-hour",
                ("#fffbeb", "#78350f", "#f59e0b", "#ffffff"),
                ("Cormorant Garamond", "Fira Sans"),
                "luxurious, refined, warm",
            ),
        ])
    }
}

/// Emergency preset used only if a catalog is constructed empty.
fn fallback_preset() -> StylePreset {
    StylePreset::new(
        "midnight-scholar",
        ("#0f172a", "#e2e8f0", "#38bdf8", "#1e293b"),
        ("Space Grotesk", "Inter"),
        "dark, technical, clean",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_ten_presets() {
        let catalog = StyleCatalog::default();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.preset_by_name("midnight-scholar").is_some());
        assert!(catalog.preset_by_name("no-such-preset").is_none());
    }

    #[test]
    fn test_random_preset_comes_from_catalog() {
        let catalog = StyleCatalog::default();
        for _ in 0..20 {
            let preset = catalog.random_preset();
            assert!(catalog.preset_by_name(&preset.name).is_some());
        }
    }

    #[test]
    fn test_empty_catalog_falls_back() {
        let catalog = StyleCatalog::new(vec![]);
        assert_eq!(catalog.random_preset().name, "midnight-scholar");
    }
}
