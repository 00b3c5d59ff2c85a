// src/config.rs
//! Конфигурация генерации мира
//!
//! Этот модуль определяет всё, что вызывающий код передаёт генератору:
//! - Сид мира (непрозрачная строка, обычно 32 hex-символа)
//! - Веса типов местности
//! - Параметры каналов шума (высота, влажность, реки, острова)
//!
//! Ядро никогда не изменяет эти структуры: UI владеет своей копией и передаёт
//! неизменяемый снимок в каждый запрос. Все структуры поддерживают
//! сериализацию в TOML/JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::biome::{GlobalBiome, classify_global_biome_with};
use crate::elevation::elevation_from_sample;
use crate::hex::HexCoord;
use crate::noise::OctaveSettings;
use crate::resources::{HexResources, ResourceTable, TerrainResources, sample_resources};
use crate::terrain::{TerrainSample, TerrainType, TerrainWeights, sample_terrain};

/// Ошибки загрузки и сохранения конфигурации
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Не удалось прочитать файл
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Не удалось записать файл
    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),

    /// Файл не является корректным TOML
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Не удалось сериализовать в TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Файл не является корректным JSON
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Параметры каналов шума
///
/// Значения вне разумных диапазонов не отвергаются: генератор их просто использует.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    /// Канал высоты (макромасштаб)
    #[serde(default = "default_height_channel")]
    pub height: OctaveSettings,

    /// Показатель степени для высоты:
    /// - `>1.0` → больше низин и воды,
    /// - `=1.0` → без изменений.
    #[serde(default = "default_height_exponent")]
    pub height_exponent: f64,

    /// Канал влажности (меньше октав, крупнее детали)
    #[serde(default = "default_moisture_channel")]
    pub moisture: OctaveSettings,

    /// Канал рек
    #[serde(default = "default_river_channel")]
    pub river: OctaveSettings,

    /// Полуширина русла: река там, где `|river − 0.5| < river_width`
    #[serde(default = "default_river_width")]
    pub river_width: f64,

    /// Высокочастотный канал островов в глубоком океане
    #[serde(default = "default_island_channel")]
    pub island: OctaveSettings,

    /// Порог, выше которого в глубоком океане появляется остров
    #[serde(default = "default_island_cutoff")]
    pub island_cutoff: f64,
}

fn default_height_channel() -> OctaveSettings {
    OctaveSettings::new(0.015, 6)
}
fn default_height_exponent() -> f64 {
    1.2
}
fn default_moisture_channel() -> OctaveSettings {
    OctaveSettings::new(0.008, 4)
}
fn default_river_channel() -> OctaveSettings {
    OctaveSettings::new(0.02, 3)
}
fn default_river_width() -> f64 {
    0.012
}
fn default_island_channel() -> OctaveSettings {
    OctaveSettings::new(0.12, 2)
}
fn default_island_cutoff() -> f64 {
    0.85
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            height: default_height_channel(),
            height_exponent: default_height_exponent(),
            moisture: default_moisture_channel(),
            river: default_river_channel(),
            river_width: default_river_width(),
            island: default_island_channel(),
            island_cutoff: default_island_cutoff(),
        }
    }
}

/// Основные параметры мира
///
/// Полный набор входных данных генератора. Сохранения игры хранят только его
/// (плюс позицию игрока), а весь мир воспроизводится заново.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSettings {
    /// Сид мира; трактуется как непрозрачные байты
    pub seed: String,

    /// Относительные частоты типов местности
    #[serde(default)]
    pub weights: TerrainWeights,

    /// Параметры шума (по умолчанию стандартные)
    #[serde(default)]
    pub noise: NoiseSettings,
}

impl WorldSettings {
    #[must_use]
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            weights: TerrainWeights::default(),
            noise: NoiseSettings::default(),
        }
    }

    #[must_use]
    pub fn with_weights(mut self, weights: TerrainWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # world.toml
    /// seed = "A3726246D353E0C7ADEA4FF766C4D6E7"
    ///
    /// [weights]
    /// deep_water = 20
    /// forest = 30
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(ConfigError::Read)?;
        let settings: Self = toml::from_str(&contents)?;
        debug!(path = %path.display(), seed = %settings.seed, "loaded world settings");
        Ok(settings)
    }

    /// Загружает параметры из JSON-файла
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save_toml_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(ConfigError::Write)
    }

    /// Промежуточная выборка шума для гекса
    #[must_use]
    pub fn sample_at(&self, hex: HexCoord) -> TerrainSample {
        sample_terrain(hex, &self.seed, &self.weights, &self.noise)
    }

    #[must_use]
    pub fn terrain_at(&self, hex: HexCoord) -> TerrainType {
        self.sample_at(hex).terrain()
    }

    #[must_use]
    pub fn biome_at(&self, hex: HexCoord) -> GlobalBiome {
        classify_global_biome_with(hex, &self.seed, &self.weights, &self.noise)
    }

    #[must_use]
    pub fn elevation_at(&self, hex: HexCoord) -> i32 {
        elevation_from_sample(&self.sample_at(hex))
    }

    /// Ресурсы гекса; тип местности вычисляется здесь же
    #[must_use]
    pub fn resources_at(
        &self,
        hex: HexCoord,
        table: &ResourceTable,
        custom: Option<&TerrainResources>,
    ) -> HexResources {
        sample_resources(hex, &self.seed, self.terrain_at(hex), table, custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let settings: WorldSettings = toml::from_str(r#"seed = "abc""#).unwrap();
        assert_eq!(settings.seed, "abc");
        assert_eq!(settings.weights, TerrainWeights::default());
        assert_eq!(settings.noise, NoiseSettings::default());
    }

    #[test]
    fn noise_defaults_match_documented_constants() {
        let noise = NoiseSettings::default();
        assert_eq!(noise.height, OctaveSettings::new(0.015, 6));
        assert_eq!(noise.height.persistence, 0.5);
        assert_eq!(noise.height.lacunarity, 2.0);
        assert_eq!(noise.height_exponent, 1.2);
        assert_eq!(noise.moisture, OctaveSettings::new(0.008, 4));
        assert_eq!(noise.river, OctaveSettings::new(0.02, 3));
        assert_eq!(noise.river_width, 0.012);
        assert_eq!(noise.island, OctaveSettings::new(0.12, 2));
        assert_eq!(noise.island_cutoff, 0.85);
    }

    #[test]
    fn partial_sections_fill_missing_fields() {
        let settings: WorldSettings = toml::from_str(
            r#"
            seed = "abc"

            [weights]
            forest = 60

            [noise]
            river_width = 0.05

            [noise.height]
            scale = 0.03
            octaves = 4
            "#,
        )
        .unwrap();
        assert_eq!(settings.weights.forest, 60);
        assert_eq!(settings.weights.grass, TerrainWeights::default().grass);
        assert!((settings.noise.river_width - 0.05).abs() < f64::EPSILON);
        assert_eq!(settings.noise.height.octaves, 4);
        assert!((settings.noise.height.persistence - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.noise.moisture, NoiseSettings::default().moisture);
    }

    #[test]
    fn toml_round_trip_preserves_settings() {
        let settings = WorldSettings::new("A3726246D353E0C7ADEA4FF766C4D6E7");
        let text = toml::to_string_pretty(&settings).unwrap();
        let back: WorldSettings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = WorldSettings::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn json_settings_parse() {
        let settings: WorldSettings =
            serde_json::from_str(r#"{"seed": "xyz", "weights": {"snow": 0}}"#).unwrap();
        assert_eq!(settings.weights.snow, 0);
    }
}
