pub mod biome;
pub mod config;
pub mod elevation;
pub mod hash;
pub mod hex;
pub mod noise;
pub mod region;
pub mod resources;
pub mod seed;
pub mod terrain;

pub use biome::{GlobalBiome, classify_global_biome};
pub use config::{ConfigError, NoiseSettings, WorldSettings};
pub use elevation::elevation_meters;
pub use hash::deterministic_random;
pub use hex::{HexCoord, hex_distance, hex_ring, hex_to_pixel, pixel_to_hex, rotate_move_vector};
pub use region::{HexReport, generate_region};
pub use resources::{HexResources, ResourceTable, TerrainResources, sample_resources};
pub use seed::{new_random_seed, new_random_start_coordinate};
pub use terrain::{TerrainType, TerrainWeights, Thresholds, classify_terrain};
