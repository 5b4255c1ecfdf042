use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::extensions::Easing;
use crate::grouping::GroupingConfig;
use crate::reel::{Color, SpinConfig, Symbol, SymbolSet};

/// Per-snippet overrides loaded from JSON at runtime.
/// Every section is optional; absent fields keep the snippet's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnippetManifest {
    /// Replacement reel faces, in outcome order.
    #[serde(default)]
    pub symbols: Vec<SymbolDescriptor>,
    #[serde(default)]
    pub spin: Option<SpinOverrides>,
    #[serde(default)]
    pub tiles: Option<TileOverrides>,
}

/// One reel face.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDescriptor {
    pub glyph: String,
    /// Accent color as `#rrggbb`.
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpinOverrides {
    pub duration: Option<f32>,
    pub stagger: Option<f32>,
    pub complete_after: Option<f32>,
    pub reveal_stagger: Option<f32>,
    /// Also sets the reel count.
    pub initial_outcomes: Option<Vec<usize>>,
    /// `"Linear"`, `"BackOut"` or `{ "Bezier": { "x1": .., "y1": .., "x2": .., "y2": .. } }`.
    pub easing: Option<Easing>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileOverrides {
    pub count: Option<usize>,
    pub columns: Option<usize>,
    /// Square tile size.
    pub cell: Option<f32>,
    pub gap: Option<f32>,
    pub padding: Option<f32>,
    pub snap_back_duration: Option<f32>,
    pub snap_back_easing: Option<Easing>,
}

impl SnippetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The replacement symbol set, if the manifest lists any.
    pub fn symbol_set(&self) -> Result<Option<SymbolSet>> {
        if self.symbols.is_empty() {
            return Ok(None);
        }
        let symbols = self
            .symbols
            .iter()
            .map(|d| -> Result<Symbol> {
                Ok(Symbol::new(d.glyph.clone(), Color::from_hex(&d.color)?))
            })
            .collect::<Result<Vec<_>>>()?;
        SymbolSet::new(symbols).map(Some)
    }

    /// `base` with the spin overrides applied. Not validated.
    pub fn apply_spin(&self, base: &SpinConfig) -> SpinConfig {
        let mut config = base.clone();
        let Some(spin) = &self.spin else { return config };
        if let Some(v) = spin.duration {
            config.duration = v;
        }
        if let Some(v) = spin.stagger {
            config.stagger = v;
        }
        if let Some(v) = spin.complete_after {
            config.complete_after = v;
        }
        if let Some(v) = spin.reveal_stagger {
            config.reveal_stagger = v;
        }
        if let Some(v) = spin.easing {
            config.easing = v;
        }
        if let Some(outcomes) = &spin.initial_outcomes {
            config.reel_count = outcomes.len();
            config.initial_outcomes = outcomes.clone();
        }
        config
    }

    /// `base` with the tile overrides applied. Not validated.
    pub fn apply_grouping(&self, base: &GroupingConfig) -> GroupingConfig {
        let mut config = *base;
        let Some(tiles) = &self.tiles else { return config };
        if let Some(v) = tiles.count {
            config.tile_count = v;
        }
        if let Some(v) = tiles.columns {
            config.layout.columns = v;
        }
        if let Some(v) = tiles.cell {
            config.layout.cell = glam::Vec2::splat(v);
        }
        if let Some(v) = tiles.gap {
            config.layout.gap = v;
        }
        if let Some(v) = tiles.padding {
            config.layout.padding = v;
        }
        if let Some(v) = tiles.snap_back_duration {
            config.snap_back_duration = v;
        }
        if let Some(v) = tiles.snap_back_easing {
            config.snap_back_easing = v;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabError;

    #[test]
    fn empty_object_changes_nothing() {
        let manifest = SnippetManifest::from_json("{}").unwrap();
        assert!(manifest.symbol_set().unwrap().is_none());
        assert_eq!(manifest.apply_spin(&SpinConfig::fruit_spin()), SpinConfig::fruit_spin());
        assert_eq!(
            manifest.apply_grouping(&GroupingConfig::default()),
            GroupingConfig::default()
        );
    }

    #[test]
    fn parse_symbols_and_spin_overrides() {
        let json = r##"{
            "symbols": [
                { "glyph": "A", "color": "#ff0000" },
                { "glyph": "B", "color": "#00ff00" }
            ],
            "spin": { "complete_after": 6.0, "initial_outcomes": [1, 0] }
        }"##;
        let manifest = SnippetManifest::from_json(json).unwrap();
        let set = manifest.symbol_set().unwrap().unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap().color, Color::from_rgb8(0, 255, 0));

        let spin = manifest.apply_spin(&SpinConfig::fruit_spin());
        assert_eq!(spin.reel_count, 2);
        assert_eq!(spin.initial_outcomes, vec![1, 0]);
        assert_eq!(spin.complete_after, 6.0);
        assert_eq!(spin.duration, 4.0);
        assert!(spin.validate(&set).is_ok());
    }

    #[test]
    fn tile_overrides() {
        let json = r#"{ "tiles": { "count": 6, "columns": 3, "cell": 48.0 } }"#;
        let config = SnippetManifest::from_json(json)
            .unwrap()
            .apply_grouping(&GroupingConfig::default());
        assert_eq!(config.tile_count, 6);
        assert_eq!(config.layout.columns, 3);
        assert_eq!(config.layout.cell, glam::Vec2::splat(48.0));
        assert_eq!(config.layout.gap, 16.0);
    }

    #[test]
    fn easing_overrides() {
        let json = r#"{
            "spin": { "easing": { "Bezier": { "x1": 0.25, "y1": 0.1, "x2": 0.25, "y2": 1.0 } } },
            "tiles": { "snap_back_easing": "Linear" }
        }"#;
        let manifest = SnippetManifest::from_json(json).unwrap();
        let spin = manifest.apply_spin(&SpinConfig::fruit_spin());
        assert_eq!(spin.easing, Easing::Bezier(crate::extensions::CubicBezier::new(0.25, 0.1, 0.25, 1.0)));
        let tiles = manifest.apply_grouping(&GroupingConfig::default());
        assert_eq!(tiles.snap_back_easing, Easing::Linear);

        assert!(SnippetManifest::from_json(r#"{ "spin": { "easing": "Bounce" } }"#).is_err());
    }

    #[test]
    fn bad_color_is_reported() {
        let json = r#"{ "symbols": [ { "glyph": "A", "color": "red" } ] }"#;
        let manifest = SnippetManifest::from_json(json).unwrap();
        assert!(matches!(manifest.symbol_set(), Err(LabError::InvalidColor(_))));
    }

    #[test]
    fn malformed_json_is_a_manifest_error() {
        assert!(matches!(
            SnippetManifest::from_json("{ \"spin\": 3 }"),
            Err(LabError::Manifest(_))
        ));
    }
}
