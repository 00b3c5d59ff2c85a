//! Решёточный value noise и фрактальный шум (fBm)
//!
//! Это не настоящий Perlin/simplex: достаточно правдоподобной, детерминированной
//! и дешёвой аппроксимации. Синус берётся из `libm`, а не из платформенной libc,
//! чтобы результат совпадал бит в бит на любой машине.

use serde::{Deserialize, Serialize};

use crate::hash::fract;

/// Параметры одного фрактального канала (высота, влажность, реки, острова)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OctaveSettings {
    /// Частота в единицах плоскости шума на гекс
    pub scale: f64,
    pub octaves: u32,
    /// Множитель амплитуды на каждую октаву
    #[serde(default = "default_persistence")]
    pub persistence: f64,
    /// Множитель частоты на каждую октаву
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f64,
}

fn default_persistence() -> f64 {
    0.5
}
fn default_lacunarity() -> f64 {
    2.0
}

impl OctaveSettings {
    #[must_use]
    pub const fn new(scale: f64, octaves: u32) -> Self {
        Self {
            scale,
            octaves,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    /// Значение канала в точке плоскости шума, сдвинутой на `offset`
    #[must_use]
    pub fn sample(&self, x: f64, y: f64, offset: f64, seed_val: f64) -> f64 {
        fbm(
            x * self.scale + offset,
            y * self.scale + offset,
            self.octaves,
            self.persistence,
            self.lacunarity,
            seed_val,
        )
    }
}

/// Псевдослучайное значение в узле решётки: `frac(sin(dot + seed) * 43758.5453)`
#[inline]
#[must_use]
pub fn random_2d(ix: f64, iy: f64, seed_val: f64) -> f64 {
    let dot = ix * 12.9898 + iy * 78.233;
    fract(libm::sin(dot + seed_val) * 43_758.545_3)
}

/// Кубическое сглаживание `t²(3 − 2t)`
#[inline]
#[must_use]
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Билинейная интерполяция четырёх углов ячейки, результат в `[0, 1)`
#[must_use]
pub fn value_noise(x: f64, y: f64, seed_val: f64) -> f64 {
    let ix = x.floor();
    let iy = y.floor();
    let u = smoothstep(x - ix);
    let v = smoothstep(y - iy);

    let a = random_2d(ix, iy, seed_val);
    let b = random_2d(ix + 1.0, iy, seed_val);
    let c = random_2d(ix, iy + 1.0, seed_val);
    let d = random_2d(ix + 1.0, iy + 1.0, seed_val);

    lerp(lerp(a, b, u), lerp(c, d, u), v)
}

/// Фрактальное броуновское движение: сумма октав, нормированная на сумму амплитуд.
///
/// При `octaves == 0` возвращает `0.0`.
#[must_use]
pub fn fbm(x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64, seed_val: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_amplitude = 0.0;

    for _ in 0..octaves {
        total += value_noise(x * frequency, y * frequency, seed_val) * amplitude;
        max_amplitude += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    if max_amplitude > 0.0 {
        total / max_amplitude
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn value_noise_matches_lattice_at_integer_points() {
        let seed = 17.25;
        for (x, y) in [(0.0, 0.0), (3.0, -2.0), (-11.0, 7.0)] {
            assert_eq!(value_noise(x, y, seed), random_2d(x, y, seed));
        }
    }

    #[test]
    fn value_noise_is_continuous() {
        let seed = 3.5;
        let a = value_noise(1.999_999, 4.2, seed);
        let b = value_noise(2.000_001, 4.2, seed);
        assert!((a - b).abs() < 1e-4);
    }

    #[test]
    fn fbm_stays_in_unit_range() {
        for i in 0..500 {
            let x = f64::from(i) * 0.37 - 90.0;
            let y = f64::from(i) * -0.53 + 40.0;
            let v = fbm(x, y, 6, 0.5, 2.0, 123.0);
            assert!((0.0..=1.0).contains(&v), "fbm({x}, {y}) = {v}");
        }
    }

    #[test]
    fn fbm_single_octave_is_value_noise() {
        assert_eq!(fbm(1.3, 2.7, 1, 0.5, 2.0, 9.0), value_noise(1.3, 2.7, 9.0));
    }

    #[test]
    fn fbm_without_octaves_is_zero() {
        assert_eq!(fbm(1.0, 1.0, 0, 0.5, 2.0, 0.0), 0.0);
    }

    #[test]
    fn seed_changes_the_field() {
        let a: Vec<f64> = (0..20).map(|i| value_noise(f64::from(i) * 0.7, 0.3, 1.0)).collect();
        let b: Vec<f64> = (0..20).map(|i| value_noise(f64::from(i) * 0.7, 0.3, 2.0)).collect();
        assert_ne!(a, b);
    }
}
