//! Ресурсы гекса: растения, животные, минералы и редкие камни
//!
//! Для каждой категории — бросок плотности, бросок количества и
//! детерминированная перетасовка Фишера–Йетса списка кандидатов. У каждого
//! броска и каждого шага перетасовки свой контекст, поэтому категории и позиции
//! не коррелируют между собой.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::hash::deterministic_random;
use crate::hex::HexCoord;
use crate::terrain::TerrainType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Vegetation,
    Animals,
    Minerals,
    RareStones,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 4] = [
        ResourceCategory::Vegetation,
        ResourceCategory::Animals,
        ResourceCategory::Minerals,
        ResourceCategory::RareStones,
    ];

    /// Префикс контекстных строк для бросков этой категории
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ResourceCategory::Vegetation => "vegetation",
            ResourceCategory::Animals => "animals",
            ResourceCategory::Minerals => "minerals",
            ResourceCategory::RareStones => "rare_stones",
        }
    }

    /// Вероятность того, что в гексе вообще есть что-то из категории
    #[must_use]
    pub fn density(self) -> f64 {
        match self {
            ResourceCategory::Vegetation => 0.85,
            ResourceCategory::Animals => 0.15,
            ResourceCategory::Minerals => 0.20,
            ResourceCategory::RareStones => 0.02,
        }
    }

    /// Сколько находок взять, если бросок плотности удался
    #[must_use]
    pub fn roll_count(self, hex: HexCoord, seed: &str) -> usize {
        let roll = deterministic_random(hex.q, hex.r, seed, &format!("{}_count", self.key()));
        match self {
            ResourceCategory::Vegetation => 1 + (roll * 4.0) as usize,
            ResourceCategory::Animals => 1 + (roll * 3.0) as usize,
            ResourceCategory::Minerals => 1 + (roll * 2.0) as usize,
            ResourceCategory::RareStones => {
                // Второй камень выпадает в 20% случаев
                let extra =
                    deterministic_random(hex.q, hex.r, seed, &format!("{}_extra", self.key()));
                if extra < 0.2 { 2 } else { 1 }
            }
        }
    }
}

/// Запись таблицы ресурсов
///
/// Обязательно только имя; остальные поля (картинки, локализация и т.п.)
/// ядро не интерпретирует и копирует как есть.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub name: String,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ResourceEntry {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: BTreeMap::new(),
        }
    }
}

/// Четыре списка ресурсов одного типа местности
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainResources {
    pub animals: Vec<ResourceEntry>,
    pub vegetation: Vec<ResourceEntry>,
    pub minerals: Vec<ResourceEntry>,
    pub rare_stones: Vec<ResourceEntry>,
}

impl TerrainResources {
    #[must_use]
    pub fn list(&self, category: ResourceCategory) -> &[ResourceEntry] {
        match category {
            ResourceCategory::Vegetation => &self.vegetation,
            ResourceCategory::Animals => &self.animals,
            ResourceCategory::Minerals => &self.minerals,
            ResourceCategory::RareStones => &self.rare_stones,
        }
    }
}

/// Таблица ресурсов по типам местности; принадлежит вызывающему коду
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTable(pub BTreeMap<TerrainType, TerrainResources>);

impl ResourceTable {
    #[must_use]
    pub fn get(&self, terrain: TerrainType) -> Option<&TerrainResources> {
        self.0.get(&terrain)
    }

    pub fn insert(&mut self, terrain: TerrainType, resources: TerrainResources) {
        self.0.insert(terrain, resources);
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Небольшая встроенная таблица, чтобы генератор работал без внешних файлов
    #[must_use]
    pub fn with_defaults() -> Self {
        fn entries(names: &[&str]) -> Vec<ResourceEntry> {
            names.iter().map(|&n| ResourceEntry::named(n)).collect()
        }

        let mut table = Self::default();
        table.insert(
            TerrainType::DeepWater,
            TerrainResources {
                animals: entries(&["Whale", "Giant Squid", "Shark"]),
                vegetation: entries(&["Kelp"]),
                minerals: entries(&["Manganese Nodule"]),
                rare_stones: entries(&["Black Pearl"]),
            },
        );
        table.insert(
            TerrainType::Water,
            TerrainResources {
                animals: entries(&["Salmon", "Crab", "Otter"]),
                vegetation: entries(&["Seaweed", "Reed", "Water Lily"]),
                minerals: entries(&["Clay", "Salt"]),
                rare_stones: entries(&["Pearl"]),
            },
        );
        table.insert(
            TerrainType::Sand,
            TerrainResources {
                animals: entries(&["Camel", "Scorpion", "Sand Lizard"]),
                vegetation: entries(&["Cactus", "Date Palm", "Tumbleweed"]),
                minerals: entries(&["Quartz Sand", "Flint"]),
                rare_stones: entries(&["Desert Rose", "Amber"]),
            },
        );
        table.insert(
            TerrainType::Grass,
            TerrainResources {
                animals: entries(&["Rabbit", "Bison", "Horse", "Deer"]),
                vegetation: entries(&["Wheat", "Clover", "Wildflowers", "Tall Grass"]),
                minerals: entries(&["Limestone", "Clay"]),
                rare_stones: entries(&["Agate"]),
            },
        );
        table.insert(
            TerrainType::Forest,
            TerrainResources {
                animals: entries(&["Wolf", "Bear", "Fox", "Boar"]),
                vegetation: entries(&["Oak", "Pine", "Mushrooms", "Berries", "Fern"]),
                minerals: entries(&["Peat", "Iron Ore"]),
                rare_stones: entries(&["Emerald", "Jade"]),
            },
        );
        table.insert(
            TerrainType::Mountain,
            TerrainResources {
                animals: entries(&["Mountain Goat", "Eagle", "Snow Leopard"]),
                vegetation: entries(&["Edelweiss", "Lichen", "Juniper"]),
                minerals: entries(&["Granite", "Copper Ore", "Gold Ore", "Coal"]),
                rare_stones: entries(&["Ruby", "Sapphire", "Diamond"]),
            },
        );
        table.insert(
            TerrainType::Snow,
            TerrainResources {
                animals: entries(&["Polar Bear", "Arctic Fox", "Snow Owl"]),
                vegetation: entries(&["Moss", "Arctic Willow"]),
                minerals: entries(&["Ice", "Silver Ore"]),
                rare_stones: entries(&["Moonstone"]),
            },
        );
        table
    }
}

/// Найденные в гексе ресурсы; вычисляются заново при каждом вызове
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HexResources {
    pub vegetation: Vec<ResourceEntry>,
    pub animals: Vec<ResourceEntry>,
    pub minerals: Vec<ResourceEntry>,
    pub rare_stones: Vec<ResourceEntry>,
}

impl HexResources {
    #[must_use]
    pub fn get(&self, category: ResourceCategory) -> &[ResourceEntry] {
        match category {
            ResourceCategory::Vegetation => &self.vegetation,
            ResourceCategory::Animals => &self.animals,
            ResourceCategory::Minerals => &self.minerals,
            ResourceCategory::RareStones => &self.rare_stones,
        }
    }

    fn slot_mut(&mut self, category: ResourceCategory) -> &mut Vec<ResourceEntry> {
        match category {
            ResourceCategory::Vegetation => &mut self.vegetation,
            ResourceCategory::Animals => &mut self.animals,
            ResourceCategory::Minerals => &mut self.minerals,
            ResourceCategory::RareStones => &mut self.rare_stones,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        ResourceCategory::ALL.iter().map(|&c| self.get(c).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Детерминированная перетасовка Фишера–Йетса.
///
/// Шаг `m` (от длины списка вниз до 1) берёт индекс из броска с контекстом
/// `"{context}_shuffle_{m}"` и меняет местами `items[m - 1]` и `items[i]`.
pub fn deterministic_shuffle<T>(items: &mut [T], hex: HexCoord, seed: &str, context: &str) {
    for m in (1..=items.len()).rev() {
        let roll = deterministic_random(hex.q, hex.r, seed, &format!("{context}_shuffle_{m}"));
        let i = ((roll * m as f64) as usize).min(m - 1);
        items.swap(m - 1, i);
    }
}

/// Выбор из одной категории: до `count` кандидатов без повторов
fn sample_category(
    hex: HexCoord,
    seed: &str,
    category: ResourceCategory,
    candidates: &[&ResourceEntry],
) -> Vec<ResourceEntry> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let key = category.key();
    let density = deterministic_random(hex.q, hex.r, seed, &format!("{key}_density"));
    if density >= category.density() {
        return Vec::new();
    }

    let count = category.roll_count(hex, seed).min(candidates.len());
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    deterministic_shuffle(&mut order, hex, seed, key);
    order
        .into_iter()
        .take(count)
        .map(|i| candidates[i].clone())
        .collect()
}

/// Ресурсы гекса с уже известным типом местности.
///
/// `custom` дописывается в конец базового списка типа местности; объединённый
/// список считается единственным источником на время этого вызова.
#[must_use]
pub fn sample_resources(
    hex: HexCoord,
    seed: &str,
    terrain: TerrainType,
    table: &ResourceTable,
    custom: Option<&TerrainResources>,
) -> HexResources {
    let base = table.get(terrain);
    let mut found = HexResources::default();

    for category in ResourceCategory::ALL {
        let candidates: Vec<&ResourceEntry> = base
            .map(|b| b.list(category))
            .unwrap_or_default()
            .iter()
            .chain(custom.map(|c| c.list(category)).unwrap_or_default())
            .collect();
        *found.slot_mut(category) = sample_category(hex, seed, category, &candidates);
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::hex_ring;
    use std::collections::HashMap;

    const SEED: &str = "A3726246D353E0C7ADEA4FF766C4D6E7";

    fn names(entries: &[ResourceEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn sampling_is_deterministic() {
        let table = ResourceTable::with_defaults();
        for hex in hex_ring(HexCoord::new(12, -30), 4) {
            let a = sample_resources(hex, SEED, TerrainType::Forest, &table, None);
            let b = sample_resources(hex, SEED, TerrainType::Forest, &table, None);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn picks_respect_count_ranges_and_have_no_duplicates() {
        let table = ResourceTable::with_defaults();
        for hex in hex_ring(HexCoord::default(), 15) {
            let found = sample_resources(hex, SEED, TerrainType::Mountain, &table, None);
            assert!(found.vegetation.len() <= 3); // в списке всего 3 растения
            assert!(found.animals.len() <= 3);
            assert!(found.minerals.len() <= 2);
            assert!(found.rare_stones.len() <= 2);
            for category in ResourceCategory::ALL {
                let mut picked = names(found.get(category));
                let before = picked.len();
                picked.sort_unstable();
                picked.dedup();
                assert_eq!(picked.len(), before);
            }
        }
    }

    #[test]
    fn densities_roughly_match_category_probabilities() {
        let table = ResourceTable::with_defaults();
        let hexes = hex_ring(HexCoord::default(), 30);
        let mut hits: HashMap<ResourceCategory, usize> = HashMap::new();
        for &hex in &hexes {
            let found = sample_resources(hex, SEED, TerrainType::Grass, &table, None);
            for category in ResourceCategory::ALL {
                if !found.get(category).is_empty() {
                    *hits.entry(category).or_default() += 1;
                }
            }
        }
        let n = hexes.len() as f64;
        for category in ResourceCategory::ALL {
            let rate = *hits.get(&category).unwrap_or(&0) as f64 / n;
            assert!(
                (rate - category.density()).abs() < 0.04,
                "{category:?}: {rate}"
            );
        }
    }

    #[test]
    fn empty_lists_yield_nothing() {
        let table = ResourceTable::default();
        for hex in hex_ring(HexCoord::default(), 5) {
            assert!(sample_resources(hex, SEED, TerrainType::Grass, &table, None).is_empty());
        }

        let mut sparse = ResourceTable::default();
        sparse.insert(
            TerrainType::Grass,
            TerrainResources {
                vegetation: vec![ResourceEntry::named("Clover")],
                ..TerrainResources::default()
            },
        );
        for hex in hex_ring(HexCoord::default(), 5) {
            let found = sample_resources(hex, SEED, TerrainType::Grass, &sparse, None);
            assert!(found.animals.is_empty());
            assert!(found.minerals.is_empty());
            assert!(found.rare_stones.is_empty());
            assert!(found.vegetation.len() <= 1);
        }
    }

    #[test]
    fn custom_resources_extend_the_candidate_list() {
        let table = ResourceTable::default();
        let custom = TerrainResources {
            vegetation: vec![ResourceEntry::named("Moonflower")],
            ..TerrainResources::default()
        };
        let seen = hex_ring(HexCoord::default(), 10).into_iter().any(|hex| {
            names(&sample_resources(hex, SEED, TerrainType::Sand, &table, Some(&custom)).vegetation)
                == ["Moonflower"]
        });
        assert!(seen);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut items: Vec<u32> = (0..10).collect();
        deterministic_shuffle(&mut items, HexCoord::new(3, 4), SEED, "test");
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_coverage_is_uniform() {
        let hexes = hex_ring(HexCoord::default(), 36);
        let mut first = [0usize; 4];
        for &hex in &hexes {
            let mut items = [0usize, 1, 2, 3];
            deterministic_shuffle(&mut items, hex, SEED, "vegetation");
            first[items[0]] += 1;
        }
        let n = hexes.len() as f64;
        for count in first {
            assert!((count as f64 / n - 0.25).abs() < 0.04, "{first:?}");
        }
    }

    #[test]
    fn metadata_is_copied_through() {
        let table: ResourceTable = serde_json::from_str(
            r#"{
                "forest": {
                    "vegetation": [{ "name": "Oak", "image": "oak.png", "label": { "ru": "Дуб" } }]
                }
            }"#,
        )
        .unwrap();
        let oak = &table.get(TerrainType::Forest).unwrap().vegetation[0];
        assert_eq!(oak.name, "Oak");
        assert_eq!(oak.metadata["image"], "oak.png");

        let picked = hex_ring(HexCoord::default(), 5)
            .into_iter()
            .map(|hex| sample_resources(hex, SEED, TerrainType::Forest, &table, None))
            .find(|found| !found.vegetation.is_empty())
            .unwrap();
        assert_eq!(picked.vegetation[0], *oak);
    }
}
