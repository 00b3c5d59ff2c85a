//! Высота над уровнем моря в метрах

use crate::config::NoiseSettings;
use crate::hex::HexCoord;
use crate::terrain::{TerrainSample, TerrainWeights, sample_terrain};

/// Высота Эвереста: потолок суши
pub const MAX_ELEVATION_M: f64 = 8848.0;
/// Дно океана при высоте 0
pub const MAX_DEPTH_M: f64 = 5000.0;

const LAND_RANGE_EPSILON: f64 = 1e-9;

/// Переводит нормированную высоту в метры относительно уровня моря `sea_level`.
///
/// - Ниже уровня моря глубина растёт линейно до `-MAX_DEPTH_M` при `height = 0`.
/// - Выше — квадратично: `((h − sea) / (1 − sea))² × 8848`, так что большая часть
///   суши остаётся низкой, а пиков достигает только хвост распределения.
///
/// Уровень моря 0 и мир без суши дают 0 вместо деления на ноль.
#[must_use]
pub fn elevation_from_height(height: f64, sea_level: f64) -> i32 {
    let meters = if height < sea_level {
        if sea_level <= 0.0 {
            return 0;
        }
        let depth_ratio = (sea_level - height) / sea_level;
        -depth_ratio.min(1.0) * MAX_DEPTH_M
    } else {
        let land_range = 1.0 - sea_level;
        if land_range <= LAND_RANGE_EPSILON {
            return 0;
        }
        let t = ((height - sea_level) / land_range).min(1.0);
        t * t * MAX_ELEVATION_M
    };
    meters.floor() as i32
}

/// Высота для уже построенной выборки: уровень моря — порог воды той же выборки
#[must_use]
pub fn elevation_from_sample(sample: &TerrainSample) -> i32 {
    elevation_from_height(sample.height, sample.thresholds.water)
}

/// Высота гекса в метрах с параметрами шума по умолчанию
#[must_use]
pub fn elevation_meters(hex: HexCoord, seed: &str, weights: &TerrainWeights) -> i32 {
    elevation_from_sample(&sample_terrain(
        hex,
        seed,
        weights,
        &NoiseSettings::default(),
    ))
}
