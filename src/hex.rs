//! Геометрия гексагональной сетки (pointy-top, осевые координаты)
//!
//! Третья кубическая координата `s = -q - r` нигде не хранится.

use serde::{Deserialize, Serialize};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Смещения к шести соседям в осевых координатах
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Клетка бесконечной карты
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    #[must_use]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> u64 {
        hex_distance(self, other)
    }

    /// Соседние гексы; у края диапазона `i32` соседей меньше шести
    pub fn neighbors(self) -> impl Iterator<Item = Self> {
        DIRECTIONS
            .into_iter()
            .filter_map(move |(dq, dr)| self.offset(i64::from(dq), i64::from(dr)))
    }

    /// Сдвиг на `(dq, dr)`; `None`, если результат не помещается в `i32`
    #[must_use]
    pub fn offset(self, dq: i64, dr: i64) -> Option<Self> {
        let q = i32::try_from(i64::from(self.q) + dq).ok()?;
        let r = i32::try_from(i64::from(self.r) + dr).ok()?;
        Some(Self::new(q, r))
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Центр гекса в пикселях
#[must_use]
pub fn hex_to_pixel(hex: HexCoord, size: f64) -> (f64, f64) {
    let q = f64::from(hex.q);
    let r = f64::from(hex.r);
    (size * (SQRT_3 * q + SQRT_3 / 2.0 * r), size * (1.5 * r))
}

/// Гекс, которому принадлежит точка `(x, y)`
#[must_use]
pub fn pixel_to_hex(x: f64, y: f64, size: f64) -> HexCoord {
    let q = (SQRT_3 / 3.0 * x - y / 3.0) / size;
    let r = (2.0 / 3.0 * y) / size;
    hex_round(q, r)
}

/// Округление дробных осевых координат по кубическому правилу.
///
/// Ось с наибольшей ошибкой округления пересчитывается из двух других,
/// так что `q + r + s = 0` сохраняется точно.
#[must_use]
pub fn hex_round(q: f64, r: f64) -> HexCoord {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }

    HexCoord::new(rq as i32, rr as i32)
}

/// Число шагов между двумя гексами.
///
/// Между крайними значениями `i32` расстояние не помещается в `u32`.
#[must_use]
pub fn hex_distance(a: HexCoord, b: HexCoord) -> u64 {
    let dq = i64::from(a.q) - i64::from(b.q);
    let dr = i64::from(a.r) - i64::from(b.r);
    (dq.unsigned_abs() + (dq + dr).unsigned_abs() + dr.unsigned_abs()) / 2
}

/// Все гексы на расстоянии не больше `radius` от центра.
///
/// Несмотря на название, это заполненный диск, а не кольцо:
/// `3·radius·(radius+1) + 1` клеток. Гексы, выходящие за диапазон `i32`,
/// пропускаются.
#[must_use]
pub fn hex_ring(center: HexCoord, radius: u32) -> Vec<HexCoord> {
    let n = i64::from(radius);
    let mut hexes = Vec::with_capacity(disk_size(radius));
    for q in -n..=n {
        let r_min = (-n).max(-q - n);
        let r_max = n.min(-q + n);
        for r in r_min..=r_max {
            if let Some(hex) = center.offset(q, r) {
                hexes.push(hex);
            }
        }
    }
    hexes
}

/// Число клеток в диске радиуса `radius`
fn disk_size(radius: u32) -> usize {
    let r = radius as usize;
    r.checked_add(1)
        .and_then(|r1| r.checked_mul(r1))
        .and_then(|n| n.checked_mul(3))
        .and_then(|n| n.checked_add(1))
        .unwrap_or(0)
}

/// Поворачивает вектор движения на угол, кратный 60°.
///
/// Угол приводится к `[0, 360)` и округляется до ближайшего шага;
/// один шаг против часовой стрелки: `(q, r) -> (q + r, -q)`.
#[must_use]
pub fn rotate_move_vector(dq: i32, dr: i32, angle_deg: f64) -> (i32, i32) {
    let normalized = angle_deg.rem_euclid(360.0);
    let steps = ((normalized / 60.0).round() as u32) % 6;
    (0..steps).fold((dq, dr), |(q, r), _| (q + r, -q))
}

/// Проекция осевых координат на плоскость шума.
///
/// Без неё черты шума получаются скошенными вдоль осей сетки.
#[must_use]
pub fn noise_plane(hex: HexCoord) -> (f64, f64) {
    hex_to_pixel(hex, 1.0)
}
