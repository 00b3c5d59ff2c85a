//! Создание нового мира: случайный сид и стартовая клетка
//!
//! Единственное место, где используется настоящая случайность. Всё остальное
//! выводится из сида детерминированно.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::WorldSettings;
use crate::hash::hash_str;
use crate::hex::HexCoord;

/// Стартовые координаты выбираются из `[-START_RANGE, START_RANGE]`
pub const START_RANGE: i32 = 10_000;

/// Новый 128-битный сид в виде 32 hex-символов в верхнем регистре
#[must_use]
pub fn new_random_seed() -> String {
    seed_from_rng(&mut rand::thread_rng())
}

/// То же, что [`new_random_seed`], но из переданного генератора
pub fn seed_from_rng<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:032X}", rng.r#gen::<u128>())
}

#[must_use]
pub fn new_random_start_coordinate() -> HexCoord {
    start_coordinate_from_rng(&mut rand::thread_rng())
}

pub fn start_coordinate_from_rng<R: Rng + ?Sized>(rng: &mut R) -> HexCoord {
    HexCoord::new(
        rng.gen_range(-START_RANGE..=START_RANGE),
        rng.gen_range(-START_RANGE..=START_RANGE),
    )
}

/// Ищет случайную стартовую клетку на суше.
///
/// Проверяет не больше `attempts` кандидатов (хотя бы одного); если суша не
/// найдена (например, в мире из одной воды), возвращает последнего кандидата.
pub fn find_land_start<R: Rng + ?Sized>(
    settings: &WorldSettings,
    rng: &mut R,
    attempts: usize,
) -> HexCoord {
    let attempts = attempts.max(1);
    let mut tested = 0;
    loop {
        let candidate = start_coordinate_from_rng(rng);
        tested += 1;
        if !settings.terrain_at(candidate).is_water() || tested == attempts {
            return candidate;
        }
    }
}

/// Стартовая клетка на суше, зависящая только от сида мира.
///
/// Один и тот же мир всегда начинается в одном месте.
#[must_use]
pub fn land_start_for_world(settings: &WorldSettings, attempts: usize) -> HexCoord {
    let mut rng = ChaCha8Rng::seed_from_u64(hash_str(&settings.seed));
    find_land_start(settings, &mut rng, attempts)
}
