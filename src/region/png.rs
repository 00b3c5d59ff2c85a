// src/region/png.rs
//! Растровое превью региона
//!
//! Отладочный экспорт: каждый пиксель переводится в гекс через `pixel_to_hex`,
//! цвет берётся из отчёта этого гекса. Пиксели вне региона прозрачные.

use std::collections::HashMap;

use image::{ImageBuffer, Rgba};
use tracing::debug;

use crate::hex::{HexCoord, hex_to_pixel, pixel_to_hex};
use crate::region::HexReport;

/// Чем раскрашивать гексы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Terrain,
    Biome,
    /// Оттенки серого по высоте, вода синяя
    Elevation,
}

pub struct RegionMap {
    pub width: u32,
    pub height: u32,
    /// Индекс отчёта для каждого пикселя (`None` — вне региона)
    pub data: Vec<Option<usize>>,
}

impl RegionMap {
    /// Растеризует регион с размером гекса `hex_size` пикселей
    #[must_use]
    pub fn new(reports: &[HexReport], center: HexCoord, radius: u32, hex_size: f64) -> Self {
        let (width, height) = image_size(radius, hex_size);

        let index: HashMap<HexCoord, usize> = reports
            .iter()
            .enumerate()
            .map(|(i, r)| (r.hex, i))
            .collect();

        let (cx, cy) = hex_to_pixel(center, hex_size);
        let half_w = f64::from(width) / 2.0;
        let half_h = f64::from(height) / 2.0;

        let row = width as usize;
        let mut data = vec![None; row.saturating_mul(height as usize)];
        for y in 0..height {
            for x in 0..width {
                let px = f64::from(x) - half_w + cx;
                let py = f64::from(y) - half_h + cy;
                let hex = pixel_to_hex(px, py, hex_size);
                data[y as usize * row + x as usize] = index.get(&hex).copied();
            }
        }

        Self {
            width,
            height,
            data,
        }
    }

    pub fn to_rgba_image(&self, reports: &[HexReport], mode: ColorMode) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|cell| match cell {
                Some(i) => {
                    let [r, g, b] = report_color(&reports[*i], mode);
                    [r, g, b, 255]
                }
                None => [0, 0, 0, 0],
            })
            .collect()
    }

    pub fn save_as_png(
        &self,
        reports: &[HexReport],
        mode: ColorMode,
        path: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, self.to_rgba_image(reports, mode))
                .ok_or("Failed to create image buffer")?;
        img.save(path)?;
        debug!(path, width = self.width, height = self.height, "preview saved");
        Ok(())
    }
}

/// Размер превью в пикселях.
///
/// Диск радиуса n занимает примерно (2n + 1) гексов в ширину. Считается в
/// `f64`, приведение к `u32` насыщается.
#[must_use]
pub fn image_size(radius: u32, hex_size: f64) -> (u32, u32) {
    let span = (2 * u64::from(radius) + 1) as f64;
    let width = (span * hex_size * 3f64.sqrt()).ceil() as u32;
    let height = (span * hex_size * 1.5 + hex_size).ceil() as u32;
    (width.saturating_add(1), height.saturating_add(1))
}

fn report_color(report: &HexReport, mode: ColorMode) -> [u8; 3] {
    match mode {
        ColorMode::Terrain => report.terrain.to_rgb(),
        ColorMode::Biome => report.biome.to_rgb(),
        ColorMode::Elevation => {
            if report.elevation_m < 0 {
                [0, 64, 128]
            } else {
                let v = (f64::from(report.elevation_m) / 8848.0 * 255.0).clamp(0.0, 255.0) as u8;
                [v, v, v]
            }
        }
    }
}
