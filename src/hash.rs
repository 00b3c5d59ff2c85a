//! Хеширование и детерминированные псевдослучайные значения
//!
//! Все случайные величины мира выводятся отсюда: никакого внутреннего состояния,
//! одно и то же `(q, r, seed, context)` всегда даёт одно и то же число.

/// Делитель для перевода хеша в `[0, 1)` (простое число Мерсенна 2^31 − 1)
const UNIT_DIVISOR: u64 = 2_147_483_647;

/// Разделитель полей; байт `0xFF` не встречается в UTF-8, поэтому
/// `"ab" + "c"` и `"a" + "bc"` хешируются по-разному.
const FIELD_SEPARATOR: u8 = 0xFF;

/// Мультипликативный хеш с двумя 32-битными аккумуляторами (схема cyrb53).
///
/// Каждый байт подмешивается в оба аккумулятора через xor-умножение на
/// большие нечётные константы, финализация дополнительно перемешивает их
/// друг с другом. Результат — 53-битное целое.
#[derive(Debug, Clone, Copy)]
pub struct Cyrb53 {
    h1: u32,
    h2: u32,
}

impl Cyrb53 {
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            h1: 0xdead_beef ^ seed,
            h2: 0x41c6_ce57 ^ seed,
        }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let ch = u32::from(byte);
            self.h1 = (self.h1 ^ ch).wrapping_mul(2_654_435_761);
            self.h2 = (self.h2 ^ ch).wrapping_mul(1_597_334_677);
        }
    }

    /// Записывает целое в little-endian, чтобы результат не зависел от платформы
    pub fn write_i32(&mut self, value: i32) {
        self.write(&value.to_le_bytes());
    }

    pub fn write_separator(&mut self) {
        self.write(&[FIELD_SEPARATOR]);
    }

    #[must_use]
    pub fn finish(&self) -> u64 {
        let (h1, h2) = (self.h1, self.h2);
        let h1 = (h1 ^ (h1 >> 16)).wrapping_mul(2_246_822_507)
            ^ (h2 ^ (h2 >> 13)).wrapping_mul(3_266_489_909);
        let h2 = (h2 ^ (h2 >> 16)).wrapping_mul(2_246_822_507)
            ^ (h1 ^ (h1 >> 13)).wrapping_mul(3_266_489_909);
        (u64::from(h2 & 0x001f_ffff) << 32) | u64::from(h1)
    }
}

impl Default for Cyrb53 {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Хеширует строку как непрозрачную последовательность байт
#[must_use]
pub fn hash_str(input: &str) -> u64 {
    let mut hasher = Cyrb53::default();
    hasher.write(input.as_bytes());
    hasher.finish()
}

/// Переводит хеш в число из `[0, 1)`
#[must_use]
pub fn unit_float(hash: u64) -> f64 {
    (hash % UNIT_DIVISOR) as f64 / UNIT_DIVISOR as f64
}

/// Детерминированное случайное число в `[0, 1)` для гекса, сида и контекста.
///
/// Разные `context` декоррелируют броски в одной клетке
/// (например, "есть ли животное" и "какое именно животное").
#[must_use]
pub fn deterministic_random(q: i32, r: i32, seed: &str, context: &str) -> f64 {
    let mut hasher = Cyrb53::default();
    hasher.write(seed.as_bytes());
    hasher.write_separator();
    hasher.write_i32(q);
    hasher.write_i32(r);
    hasher.write_separator();
    hasher.write(context.as_bytes());
    unit_float(hasher.finish())
}

/// Дробная часть, всегда в `[0, 1)` (в том числе для отрицательных чисел)
#[inline]
#[must_use]
pub fn fract(x: f64) -> f64 {
    x - x.floor()
}
