//! Stage configuration: palette, population and sizing.
//!
//! Every field has a default, so a host document only needs to carry the
//! values it wants to override:
//!
//! ```json
//! { "min_population": 6, "palette": [{ "color": "#ffd6e0", "weight": 3 }] }
//! ```

use serde::{Deserialize, Serialize};
use stage_engine::{ConfigError, Rng};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// `#rrggbb`
    pub color: String,
    pub weight: f32,
}

/// One hand-placed creature of the opening batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    /// Horizontal position as a fraction of the stage width.
    pub x: f32,
    pub color: String,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleeperConfig {
    pub size: f32,
    pub color: String,
    /// Gap between the sleeper's right side and the stage edge.
    pub inset: f32,
    /// Seconds between sleep glyphs.
    pub snore_interval: f32,
}

impl Default for SleeperConfig {
    fn default() -> Self {
        Self {
            size: 70.0,
            color: "#c9b8ff".into(),
            inset: 24.0,
            snore_interval: 1.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub palette: Vec<PaletteEntry>,
    /// Active creatures the stage keeps at least (the sleeper does not count).
    pub min_population: usize,
    pub size_min: f32,
    pub size_max: f32,
    /// Leg length as a fraction of the body size.
    pub leg_ratio: f32,
    pub initial: Vec<SpawnEntry>,
    pub sleeper: SleeperConfig,
    /// Random stream for replacement spawns. The host passes a fresh value
    /// per page load; without one the engine's fixed seed is kept.
    pub seed: Option<u64>,
}

impl Default for StageConfig {
    fn default() -> Self {
        let palette = [
            ("#ffffff", 4.0),
            ("#fff4d6", 3.0),
            ("#ffd6e0", 3.0),
            ("#d6f0ff", 3.0),
            ("#d8ffd6", 2.0),
            ("#ffb86b", 1.0),
            ("#7a6cff", 0.5),
        ];
        let initial = [
            (0.12, "#ffd6e0", 80.0),
            (0.27, "#d6f0ff", 64.0),
            (0.41, "#ffffff", 92.0),
            (0.55, "#fff4d6", 58.0),
            (0.68, "#d8ffd6", 74.0),
            (0.80, "#ffb86b", 66.0),
        ];
        Self {
            palette: palette
                .iter()
                .map(|&(color, weight)| PaletteEntry { color: color.into(), weight })
                .collect(),
            min_population: 5,
            size_min: 50.0,
            size_max: 100.0,
            leg_ratio: 0.35,
            initial: initial
                .iter()
                .map(|&(x, color, size)| SpawnEntry { x, color: color.into(), size })
                .collect(),
            sleeper: SleeperConfig::default(),
            seed: None,
        }
    }
}

impl StageConfig {
    /// Parse and validate a host-supplied document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: StageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        WeightedPalette::from_entries(&self.palette)?;
        if self.min_population == 0 {
            return Err(ConfigError::invalid("min_population", "must be at least 1"));
        }
        if !(self.size_min > 0.0 && self.size_min <= self.size_max) {
            return Err(ConfigError::invalid(
                "size_min",
                format!("need 0 < size_min <= size_max, got {}..{}", self.size_min, self.size_max),
            ));
        }
        if !(self.leg_ratio > 0.0) {
            return Err(ConfigError::invalid("leg_ratio", "must be positive"));
        }
        for entry in &self.initial {
            parse_hex_color(&entry.color).map_err(|e| ConfigError::invalid("initial", e))?;
            if !(0.0..=1.0).contains(&entry.x) {
                return Err(ConfigError::invalid("initial", format!("x {} outside 0..1", entry.x)));
            }
            if !(entry.size > 0.0) {
                return Err(ConfigError::invalid("initial", "size must be positive"));
            }
        }
        parse_hex_color(&self.sleeper.color).map_err(|e| ConfigError::invalid("sleeper.color", e))?;
        if !(self.sleeper.size > 0.0) {
            return Err(ConfigError::invalid("sleeper.size", "must be positive"));
        }
        if !(self.sleeper.snore_interval > 0.0) {
            return Err(ConfigError::invalid("sleeper.snore_interval", "must be positive"));
        }
        Ok(())
    }
}

/// Parse `#rrggbb` (leading `#` optional) into 0xRRGGBB.
pub fn parse_hex_color(s: &str) -> Result<u32, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(format!("colour `{}` is not #rrggbb", s));
    }
    u32::from_str_radix(hex, 16).map_err(|_| format!("colour `{}` is not hex", s))
}

/// Colour table with cumulative weights. One uniform draw picks a colour.
#[derive(Debug, Clone)]
pub struct WeightedPalette {
    colors: Vec<u32>,
    cumulative: Vec<f32>,
}

impl WeightedPalette {
    pub fn from_entries(entries: &[PaletteEntry]) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::invalid("palette", "needs at least one colour"));
        }
        let mut colors = Vec::with_capacity(entries.len());
        let mut cumulative = Vec::with_capacity(entries.len());
        let mut total = 0.0;
        for entry in entries {
            if !(entry.weight >= 0.0) {
                return Err(ConfigError::invalid("palette", format!("negative weight for {}", entry.color)));
            }
            colors.push(parse_hex_color(&entry.color).map_err(|e| ConfigError::invalid("palette", e))?);
            total += entry.weight;
            cumulative.push(total);
        }
        if total <= 0.0 {
            return Err(ConfigError::invalid("palette", "weights sum to zero"));
        }
        Ok(Self { colors, cumulative })
    }

    /// A palette that always yields `color`.
    pub fn single(color: u32) -> Self {
        Self {
            colors: vec![color],
            cumulative: vec![1.0],
        }
    }

    pub fn total(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Colour whose cumulative band contains `roll` in [0, total).
    pub fn select(&self, roll: f32) -> u32 {
        let i = self.cumulative.partition_point(|&c| c <= roll);
        self.colors[i.min(self.colors.len() - 1)]
    }

    pub fn pick(&self, rng: &mut Rng) -> u32 {
        self.select(rng.next_f32() * self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = StageConfig::default();
        config.validate().unwrap();
        assert_eq!(config.min_population, 5);
        assert!(config.initial.len() >= config.min_population);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config = StageConfig::from_json(r#"{ "min_population": 7, "sleeper": { "inset": 40 } }"#).unwrap();
        assert_eq!(config.min_population, 7);
        assert_eq!(config.sleeper.inset, 40.0);
        assert_eq!(config.sleeper.snore_interval, SleeperConfig::default().snore_interval);
        assert_eq!(config.palette, StageConfig::default().palette);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn seed_is_read_when_present() {
        let config = StageConfig::from_json(r#"{ "seed": 1718000000000 }"#).unwrap();
        assert_eq!(config.seed, Some(1_718_000_000_000));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(StageConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn bad_values_are_rejected() {
        let empty = r#"{ "palette": [] }"#;
        assert!(matches!(
            StageConfig::from_json(empty),
            Err(ConfigError::Invalid { field: "palette", .. })
        ));
        let zero = r##"{ "palette": [{ "color": "#ffffff", "weight": 0 }] }"##;
        assert!(StageConfig::from_json(zero).is_err());
        let sizes = r#"{ "size_min": 90, "size_max": 40 }"#;
        assert!(matches!(
            StageConfig::from_json(sizes),
            Err(ConfigError::Invalid { field: "size_min", .. })
        ));
        let colour = r##"{ "sleeper": { "color": "#12" } }"##;
        assert!(StageConfig::from_json(colour).is_err());
    }

    #[test]
    fn hex_colours_parse() {
        assert_eq!(parse_hex_color("#ff8800"), Ok(0xff8800));
        assert_eq!(parse_hex_color("00ff00"), Ok(0x00ff00));
        assert!(parse_hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn selection_follows_cumulative_bands() {
        let palette = WeightedPalette::from_entries(&[
            PaletteEntry { color: "#000001".into(), weight: 1.0 },
            PaletteEntry { color: "#000002".into(), weight: 0.0 },
            PaletteEntry { color: "#000003".into(), weight: 3.0 },
        ])
        .unwrap();
        assert_eq!(palette.total(), 4.0);
        assert_eq!(palette.select(0.0), 1);
        assert_eq!(palette.select(0.99), 1);
        assert_eq!(palette.select(1.0), 3);
        assert_eq!(palette.select(3.99), 3);
    }

    #[test]
    fn picks_favour_heavier_colours() {
        let palette = WeightedPalette::from_entries(&[
            PaletteEntry { color: "#000001".into(), weight: 1.0 },
            PaletteEntry { color: "#000002".into(), weight: 9.0 },
        ])
        .unwrap();
        let mut rng = Rng::new(99);
        let heavy = (0..1000).filter(|_| palette.pick(&mut rng) == 2).count();
        assert!(heavy > 800, "heavy colour picked {} times", heavy);
    }
}
