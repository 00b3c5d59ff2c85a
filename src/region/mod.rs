pub mod png;

use serde::Serialize;
use tracing::{debug, info_span};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::biome::{GlobalBiome, classify_biome_sample};
use crate::config::WorldSettings;
use crate::elevation::elevation_from_sample;
use crate::hex::{HexCoord, hex_ring};
use crate::resources::{HexResources, ResourceTable, sample_resources};
use crate::terrain::TerrainType;

/// Всё, что генератор знает об одном гексе
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HexReport {
    pub hex: HexCoord,
    pub terrain: TerrainType,
    pub biome: GlobalBiome,
    pub elevation_m: i32,
    pub is_river: bool,
    pub resources: HexResources,
}

/// Полный отчёт по одному гексу: выборка шума строится один раз
#[must_use]
pub fn describe_hex(settings: &WorldSettings, hex: HexCoord, table: &ResourceTable) -> HexReport {
    let sample = settings.sample_at(hex);
    let terrain = sample.terrain();
    HexReport {
        hex,
        terrain,
        biome: classify_biome_sample(&sample),
        elevation_m: elevation_from_sample(&sample),
        is_river: sample.is_river,
        resources: sample_resources(hex, &settings.seed, terrain, table, None),
    }
}

/// Генерирует все гексы диска радиуса `radius` вокруг `center`.
///
/// Порядок отчётов совпадает с порядком [`hex_ring`]. Гексы независимы, поэтому
/// с фичей `parallel` они считаются через rayon без какой-либо синхронизации;
/// результат от этого не меняется.
#[must_use]
pub fn generate_region(
    settings: &WorldSettings,
    center: HexCoord,
    radius: u32,
    table: &ResourceTable,
) -> Vec<HexReport> {
    let _span = info_span!("generate_region", %center, radius).entered();
    let hexes = hex_ring(center, radius);

    #[cfg(feature = "parallel")]
    let reports: Vec<HexReport> = hexes
        .par_iter()
        .map(|&hex| describe_hex(settings, hex, table))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let reports: Vec<HexReport> = hexes
        .iter()
        .map(|&hex| describe_hex(settings, hex, table))
        .collect();

    debug!(hexes = reports.len(), "region generated");
    reports
}

/// Сколько гексов каждого типа местности в регионе
#[must_use]
pub fn terrain_histogram(reports: &[HexReport]) -> Vec<(TerrainType, usize)> {
    TerrainType::ALL
        .iter()
        .map(|&t| (t, reports.iter().filter(|r| r.terrain == t).count()))
        .collect()
}
