//! Глобальные биомы: географическая надстройка над физической местностью
//!
//! Чистое переименование той же выборки `(height, moisture, is_river)`:
//! добавляется только псевдотемпература, выведенная из высоты, и никакой
//! дополнительной случайности.

use serde::{Deserialize, Serialize};

use crate::config::NoiseSettings;
use crate::hex::HexCoord;
use crate::terrain::{TerrainSample, TerrainWeights, sample_terrain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalBiome {
    Rainforest,
    Savanna,
    Grassland,
    Desert,
    Taiga,
    Tundra,
    Wetlands,
}

impl GlobalBiome {
    pub const ALL: [GlobalBiome; 7] = [
        GlobalBiome::Rainforest,
        GlobalBiome::Savanna,
        GlobalBiome::Grassland,
        GlobalBiome::Desert,
        GlobalBiome::Taiga,
        GlobalBiome::Tundra,
        GlobalBiome::Wetlands,
    ];

    pub fn to_rgb(&self) -> [u8; 3] {
        match self {
            GlobalBiome::Rainforest => [30, 100, 30],
            GlobalBiome::Savanna => [200, 180, 100],
            GlobalBiome::Grassland => [150, 200, 100],
            GlobalBiome::Desert => [210, 190, 120],
            GlobalBiome::Taiga => [100, 150, 100],
            GlobalBiome::Tundra => [200, 220, 180],
            GlobalBiome::Wetlands => [80, 100, 60],
        }
    }
}

/// Псевдотемпература: 1.0 на уровне моря, 0.0 на максимальной высоте
#[must_use]
pub fn pseudo_temperature(sample: &TerrainSample) -> f64 {
    let sea_level = sample.thresholds.water;
    let land_range = 1.0 - sea_level;
    if land_range <= f64::EPSILON {
        return 1.0;
    }
    1.0 - ((sample.height - sea_level) / land_range).clamp(0.0, 1.0)
}

/// Назначает биом по выборке, используя те же пороги, что и классификатор местности
#[must_use]
pub fn classify_biome_sample(sample: &TerrainSample) -> GlobalBiome {
    let t = &sample.thresholds;
    let h = sample.height;

    // Вода и русла — водно-болотные угодья
    if sample.is_river || h < t.water {
        return GlobalBiome::Wetlands;
    }

    let temp = pseudo_temperature(sample);
    let humid = sample.moisture;

    // 1. Высокогорья: снег — тундра, горы — тайга
    if h > t.snow_start || temp < 0.15 {
        return GlobalBiome::Tundra;
    }
    if h > t.mountain_start || temp < 0.35 {
        return GlobalBiome::Taiga;
    }

    // 2. Тёплые и умеренные зоны делим по влажности
    let warm = temp > 0.6;
    if humid < 0.35 {
        if warm {
            GlobalBiome::Desert
        } else {
            GlobalBiome::Grassland
        }
    } else if humid > 0.65 {
        if warm {
            GlobalBiome::Rainforest
        } else {
            GlobalBiome::Wetlands
        }
    } else if warm {
        GlobalBiome::Savanna
    } else {
        GlobalBiome::Grassland
    }
}

#[must_use]
pub fn classify_global_biome_with(
    hex: HexCoord,
    seed: &str,
    weights: &TerrainWeights,
    noise: &NoiseSettings,
) -> GlobalBiome {
    classify_biome_sample(&sample_terrain(hex, seed, weights, noise))
}

/// Глобальный биом гекса с параметрами шума по умолчанию
#[must_use]
pub fn classify_global_biome(hex: HexCoord, seed: &str, weights: &TerrainWeights) -> GlobalBiome {
    classify_global_biome_with(hex, seed, weights, &NoiseSettings::default())
}
