//! Классификация местности по весам
//!
//! Веса типов местности превращаются в пороги высоты, выборка шума
//! `(height, moisture, is_river)` — в тип местности. Пороги не кэшируются:
//! они пересчитываются на каждый запрос (вызывающий код может мемоизировать их сам).

use serde::{Deserialize, Serialize};

use crate::config::NoiseSettings;
use crate::hash::{Cyrb53, unit_float};
use crate::hex::{HexCoord, noise_plane};

/// Сдвиги каналов в плоскости шума
const MOISTURE_OFFSET: f64 = 500.0;
const RIVER_OFFSET: f64 = 1000.0;
const ISLAND_OFFSET: f64 = 2000.0;

/// Насколько ниже уровня воды опускается русло
const RIVER_DEPTH: f64 = 0.01;

/// Доля веса песка, уходящая на ширину пляжа; остальное влияет на частоту пустынь
const BEACH_SHARE: f64 = 0.4;

/// "Влажность" сухопутных типов для сдвига влажности
const SAND_WETNESS: f64 = 0.2;
const GRASS_WETNESS: f64 = 0.5;
const FOREST_WETNESS: f64 = 0.8;
const MOISTURE_BIAS_SCALE: f64 = 0.5;

const DRY_MOISTURE: f64 = 0.35;
const WET_MOISTURE: f64 = 0.65;
/// Холмы выше этой доли `mountain_start` зарастают лесом
const HILL_FACTOR: f64 = 0.8;

/// Физический тип местности
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    DeepWater,
    Water,
    Sand,
    Grass,
    Forest,
    Mountain,
    Snow,
}

impl TerrainType {
    pub const ALL: [TerrainType; 7] = [
        TerrainType::DeepWater,
        TerrainType::Water,
        TerrainType::Sand,
        TerrainType::Grass,
        TerrainType::Forest,
        TerrainType::Mountain,
        TerrainType::Snow,
    ];

    #[must_use]
    pub fn is_water(self) -> bool {
        matches!(self, TerrainType::DeepWater | TerrainType::Water)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TerrainType::DeepWater => "deep_water",
            TerrainType::Water => "water",
            TerrainType::Sand => "sand",
            TerrainType::Grass => "grass",
            TerrainType::Forest => "forest",
            TerrainType::Mountain => "mountain",
            TerrainType::Snow => "snow",
        }
    }

    #[must_use]
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            TerrainType::DeepWater => [0, 48, 110],
            TerrainType::Water => [30, 100, 180],
            TerrainType::Sand => [220, 200, 130],
            TerrainType::Grass => [110, 180, 80],
            TerrainType::Forest => [40, 110, 50],
            TerrainType::Mountain => [130, 120, 110],
            TerrainType::Snow => [240, 240, 250],
        }
    }
}

impl std::fmt::Display for TerrainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Относительные частоты типов местности
///
/// Набор категорий фиксирован. Нулевая сумма допустима и обрабатывается
/// подстановкой порогов по умолчанию.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainWeights {
    pub deep_water: u32,
    pub water: u32,
    pub sand: u32,
    pub grass: u32,
    pub forest: u32,
    pub mountain: u32,
    pub snow: u32,
}

impl Default for TerrainWeights {
    fn default() -> Self {
        Self {
            deep_water: 20,
            water: 15,
            sand: 10,
            grass: 25,
            forest: 15,
            mountain: 10,
            snow: 5,
        }
    }
}

impl TerrainWeights {
    /// Все веса нулевые
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            deep_water: 0,
            water: 0,
            sand: 0,
            grass: 0,
            forest: 0,
            mountain: 0,
            snow: 0,
        }
    }

    /// Только один тип местности с весом 1
    #[must_use]
    pub fn only(terrain: TerrainType) -> Self {
        let mut weights = Self::zero();
        weights.set(terrain, 1);
        weights
    }

    #[must_use]
    pub fn get(&self, terrain: TerrainType) -> u32 {
        match terrain {
            TerrainType::DeepWater => self.deep_water,
            TerrainType::Water => self.water,
            TerrainType::Sand => self.sand,
            TerrainType::Grass => self.grass,
            TerrainType::Forest => self.forest,
            TerrainType::Mountain => self.mountain,
            TerrainType::Snow => self.snow,
        }
    }

    pub fn set(&mut self, terrain: TerrainType, weight: u32) {
        let slot = match terrain {
            TerrainType::DeepWater => &mut self.deep_water,
            TerrainType::Water => &mut self.water,
            TerrainType::Sand => &mut self.sand,
            TerrainType::Grass => &mut self.grass,
            TerrainType::Forest => &mut self.forest,
            TerrainType::Mountain => &mut self.mountain,
            TerrainType::Snow => &mut self.snow,
        };
        *slot = weight;
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        TerrainType::ALL.iter().map(|&t| u64::from(self.get(t))).sum()
    }
}

/// Пороги высоты, выведенные из весов
///
/// Всегда `0 ≤ deep_water ≤ water ≤ sand ≤ mountain_start ≤ snow_start ≤ 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub deep_water: f64,
    pub water: f64,
    pub sand: f64,
    pub mountain_start: f64,
    pub snow_start: f64,
    /// Сдвиг влажности: положительный в "лесных" конфигурациях
    pub moisture_bias: f64,
}

impl Thresholds {
    /// Пороги для вырожденных весов (сумма равна нулю)
    pub const DEFAULT: Thresholds = Thresholds {
        deep_water: 0.3,
        water: 0.4,
        sand: 0.45,
        mountain_start: 0.85,
        snow_start: 0.92,
        moisture_bias: 0.0,
    };

    #[must_use]
    pub fn from_weights(weights: &TerrainWeights) -> Self {
        let total = weights.total();
        if total == 0 {
            return Self::DEFAULT;
        }

        let total = total as f64;
        let p = |t: TerrainType| f64::from(weights.get(t)) / total;
        let (p_deep, p_water, p_sand) = (
            p(TerrainType::DeepWater),
            p(TerrainType::Water),
            p(TerrainType::Sand),
        );
        let (p_grass, p_forest) = (p(TerrainType::Grass), p(TerrainType::Forest));
        let (p_mountain, p_snow) = (p(TerrainType::Mountain), p(TerrainType::Snow));

        // Монотонность держим явно: суммы с плавающей точкой могут разойтись на ulp
        let deep_water = p_deep.clamp(0.0, 1.0);
        let water = (p_deep + p_water).clamp(deep_water, 1.0);
        let sand = (water + BEACH_SHARE * p_sand).clamp(water, 1.0);
        let snow_start = (1.0 - p_snow).clamp(sand, 1.0);
        let mountain_start = (snow_start - p_mountain).clamp(sand, snow_start);

        let land = p_sand + p_grass + p_forest;
        let moisture_bias = if land > 0.0 {
            let wetness =
                (SAND_WETNESS * p_sand + GRASS_WETNESS * p_grass + FOREST_WETNESS * p_forest)
                    / land;
            (wetness - 0.5) * MOISTURE_BIAS_SCALE
        } else {
            0.0
        };

        Self {
            deep_water,
            water,
            sand,
            mountain_start,
            snow_start,
            moisture_bias,
        }
    }

    /// Есть ли полоса суши между водой и горами.
    ///
    /// Без неё ни русло, ни остров образоваться не могут.
    #[must_use]
    pub fn has_land_band(&self) -> bool {
        self.water < self.mountain_start
    }
}

/// Выборка шума для одного гекса; живёт в пределах одного запроса
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerrainSample {
    /// Высота в `[0, 1]` после прорезки рек и подъёма островов
    pub height: f64,
    pub moisture: f64,
    pub is_river: bool,
    pub thresholds: Thresholds,
}

impl TerrainSample {
    #[must_use]
    pub fn terrain(&self) -> TerrainType {
        classify_sample(self)
    }
}

/// Сид канала шума, выведенный из сида мира
fn channel_seed(seed: &str, channel: &str) -> f64 {
    let mut hasher = Cyrb53::default();
    hasher.write(seed.as_bytes());
    hasher.write_separator();
    hasher.write(channel.as_bytes());
    unit_float(hasher.finish()) * 1000.0
}

/// Строит выборку шума для гекса.
///
/// Высота после `height^exponent` может быть изменена: русло опускает её чуть ниже
/// уровня воды, остров в глубоком океане поднимает до порога песка. Эта
/// изменённая высота идёт и в классификацию, и в расчёт высоты над уровнем моря.
#[must_use]
pub fn sample_terrain(
    hex: HexCoord,
    seed: &str,
    weights: &TerrainWeights,
    noise: &NoiseSettings,
) -> TerrainSample {
    let thresholds = Thresholds::from_weights(weights);
    let (x, y) = noise_plane(hex);

    let raw = noise.height.sample(x, y, 0.0, channel_seed(seed, "height"));
    let mut height = libm::pow(raw, noise.height_exponent).clamp(0.0, 1.0);

    let moisture = noise
        .moisture
        .sample(x, y, MOISTURE_OFFSET, channel_seed(seed, "moisture"));
    let moisture = (moisture + thresholds.moisture_bias).clamp(0.0, 1.0);

    let mut is_river = false;
    if thresholds.has_land_band() && height > thresholds.water && height < thresholds.mountain_start
    {
        let river = noise
            .river
            .sample(x, y, RIVER_OFFSET, channel_seed(seed, "river"));
        if (river - 0.5).abs() < noise.river_width {
            is_river = true;
            height = (thresholds.water - RIVER_DEPTH).max(0.0);
        }
    }

    if !is_river && thresholds.has_land_band() && height < thresholds.deep_water {
        let island = noise
            .island
            .sample(x, y, ISLAND_OFFSET, channel_seed(seed, "island"));
        if island > noise.island_cutoff {
            height = thresholds.sand;
        }
    }

    TerrainSample {
        height,
        moisture,
        is_river,
        thresholds,
    }
}

/// Тип местности по выборке; срабатывает первое подходящее правило
#[must_use]
pub fn classify_sample(sample: &TerrainSample) -> TerrainType {
    let t = &sample.thresholds;
    let h = sample.height;

    if sample.is_river {
        return TerrainType::Water;
    }
    if h < t.deep_water {
        return TerrainType::DeepWater;
    }
    if h < t.water {
        return TerrainType::Water;
    }
    if h < t.sand {
        return TerrainType::Sand;
    }
    if h > t.mountain_start {
        return if h > t.snow_start {
            TerrainType::Snow
        } else {
            TerrainType::Mountain
        };
    }

    // Средние высоты делим по влажности
    if sample.moisture < DRY_MOISTURE {
        TerrainType::Sand
    } else if sample.moisture > WET_MOISTURE || h > t.mountain_start * HILL_FACTOR {
        TerrainType::Forest
    } else {
        TerrainType::Grass
    }
}

/// Тип местности гекса с параметрами шума по умолчанию
#[must_use]
pub fn classify_terrain(hex: HexCoord, seed: &str, weights: &TerrainWeights) -> TerrainType {
    sample_terrain(hex, seed, weights, &NoiseSettings::default()).terrain()
}
