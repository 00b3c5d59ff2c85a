use clap::{Parser, ValueEnum};
use hexworld::region::png::{ColorMode, RegionMap};
use hexworld::region::terrain_histogram;
use hexworld::seed::{find_land_start, land_start_for_world};
use hexworld::{HexCoord, ResourceTable, WorldSettings, generate_region, new_random_seed};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Генератор бесконечного гексагонального мира
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу мира (TOML или JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Сид мира (перекрывает значение из конфигурации)
    #[arg(long, conflicts_with = "new_seed")]
    seed: Option<String>,

    /// Сгенерировать новый случайный сид
    #[arg(long)]
    new_seed: bool,

    /// Центр региона в виде "Q,R"
    #[arg(long, value_parser = parse_hex, allow_hyphen_values = true, conflicts_with = "random_start")]
    center: Option<HexCoord>,

    /// Выбрать случайную стартовую клетку на суше
    /// (по умолчанию стартовая клетка выводится из сида)
    #[arg(long)]
    random_start: bool,

    /// Радиус региона в гексах
    #[arg(short, long, default_value_t = 8)]
    radius: u32,

    /// Таблица ресурсов (TOML или JSON); по умолчанию встроенная
    #[arg(long)]
    resources: Option<PathBuf>,

    /// Куда сохранить отчёт по гексам в JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Куда сохранить PNG-превью региона
    #[arg(long)]
    png: Option<PathBuf>,

    /// Раскраска превью
    #[arg(long, value_enum, default_value_t = Coloring::Terrain)]
    color: Coloring,

    /// Размер гекса в превью (пиксели)
    #[arg(long, default_value_t = 12.0)]
    hex_size: f64,

    /// Уровень логирования, если не задан RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Coloring {
    Terrain,
    Biome,
    Elevation,
}

impl From<Coloring> for ColorMode {
    fn from(value: Coloring) -> Self {
        match value {
            Coloring::Terrain => ColorMode::Terrain,
            Coloring::Biome => ColorMode::Biome,
            Coloring::Elevation => ColorMode::Elevation,
        }
    }
}

fn parse_hex(s: &str) -> Result<HexCoord, String> {
    let (q, r) = s
        .split_once(',')
        .ok_or_else(|| format!("expected Q,R, got {s:?}"))?;
    let q = q.trim().parse().map_err(|e| format!("bad q: {e}"))?;
    let r = r.trim().parse().map_err(|e| format!("bad r: {e}"))?;
    Ok(HexCoord::new(q, r))
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn load_settings(cli: &Cli) -> Result<WorldSettings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) if is_json(path) => WorldSettings::from_json_file(path)?,
        Some(path) => WorldSettings::from_toml_file(path)?,
        None => WorldSettings::new(new_random_seed()),
    };
    if let Some(seed) = &cli.seed {
        settings.seed.clone_from(seed);
    } else if cli.new_seed {
        settings.seed = new_random_seed();
    }
    if settings.seed.is_empty() {
        warn!("пустой сид, генерирую новый");
        settings.seed = new_random_seed();
    }
    Ok(settings)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Загрузка конфигурации...");
    let settings = load_settings(&cli)?;
    info!(seed = %settings.seed, "мир готов");

    let table = match &cli.resources {
        Some(path) if is_json(path) => ResourceTable::from_json_file(path)?,
        Some(path) => ResourceTable::from_toml_file(path)?,
        None => ResourceTable::with_defaults(),
    };

    let center = match cli.center {
        Some(center) => center,
        None if cli.random_start => find_land_start(&settings, &mut rand::thread_rng(), 1000),
        None => land_start_for_world(&settings, 1000),
    };

    info!(%center, radius = cli.radius, "Генерация региона...");
    let reports = generate_region(&settings, center, cli.radius, &table);

    for (terrain, count) in terrain_histogram(&reports) {
        if count > 0 {
            info!("{terrain:>10}: {count}");
        }
    }
    if let Some(origin) = reports.iter().find(|r| r.hex == center) {
        info!(
            terrain = %origin.terrain,
            biome = ?origin.biome,
            elevation_m = origin.elevation_m,
            resources = origin.resources.total(),
            "центральный гекс"
        );
    }

    if let Some(path) = &cli.json {
        info!("Сохранение отчёта в {:?}", path);
        std::fs::write(path, serde_json::to_string_pretty(&reports)?)?;
    }

    if let Some(path) = &cli.png {
        info!("Сохранение превью в {:?}", path);
        let map = RegionMap::new(&reports, center, cli.radius, cli.hex_size);
        map.save_as_png(&reports, cli.color.into(), path.to_str().ok_or("non UTF-8 path")?)?;
    }

    info!("Готово!");
    Ok(())
}
