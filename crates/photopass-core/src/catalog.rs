//! Static catalogs of passport sizes, print sheets and background presets.
//!
//! Pixel dimensions are at 300 DPI. Sizes specified in inches convert with
//! `round(in * 300)`; sizes specified in millimetres with
//! `round(mm / 25.4 * 300)`. The `custom` passport entry has zero pixel
//! dimensions and means "no fixed size, keep the source dimensions".
//!
//! The catalogs are built once on first access and are read-only afterwards.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::color::Color;

/// Print resolution used for every catalog entry.
pub const DPI: f64 = 300.0;

const MM_PER_INCH: f64 = 25.4;

/// Id of the passport size with no fixed pixel dimensions.
pub const CUSTOM_SIZE_ID: &str = "custom";

/// Passport size selected for a fresh session.
pub const DEFAULT_PASSPORT_SIZE_ID: &str = "india-standard";

/// Print sheet selected when print-sheet export is first enabled.
pub const DEFAULT_PRINT_SHEET_ID: &str = "4x6";

/// Convert a physical length to pixels at [`DPI`].
pub fn mm_to_px(mm: f64) -> u32 {
    (mm / MM_PER_INCH * DPI).round().max(0.0) as u32
}

pub fn inches_to_px(inches: f64) -> u32 {
    (inches * DPI).round().max(0.0) as u32
}

/// A physical size with its 300 DPI pixel equivalent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub width_mm: u32,
    pub height_mm: u32,
    pub width_px: u32,
    pub height_px: u32,
}

/// A target passport photo size.
pub type PassportSize = CatalogEntry;

/// A paper size that cells are tiled onto.
pub type PrintSheet = CatalogEntry;

impl CatalogEntry {
    fn mm(id: &'static str, label: &'static str, width_mm: u32, height_mm: u32) -> Self {
        Self {
            id,
            label,
            width_mm,
            height_mm,
            width_px: mm_to_px(width_mm as f64),
            height_px: mm_to_px(height_mm as f64),
        }
    }

    fn inches(id: &'static str, label: &'static str, width_in: f64, height_in: f64) -> Self {
        Self {
            id,
            label,
            width_mm: (width_in * MM_PER_INCH).round() as u32,
            height_mm: (height_in * MM_PER_INCH).round() as u32,
            width_px: inches_to_px(width_in),
            height_px: inches_to_px(height_in),
        }
    }

    /// True for the `custom` entry, which carries no pixel size.
    pub fn is_custom(&self) -> bool {
        self.width_px == 0 || self.height_px == 0
    }

    /// Width over height, or `None` for the custom entry.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_custom() {
            None
        } else {
            Some(self.width_px as f64 / self.height_px as f64)
        }
    }

    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        if self.is_custom() {
            None
        } else {
            Some((self.width_px, self.height_px))
        }
    }
}

/// A named background color offered after background removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundPreset {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(rename = "value")]
    pub color: Color,
}

static PASSPORT_SIZES: Lazy<Vec<PassportSize>> = Lazy::new(|| {
    vec![
        CatalogEntry::inches("us-standard", "2x2\" (USA Passport)", 2.0, 2.0),
        CatalogEntry::inches("india-standard", "2x2\" (India Passport/Visa)", 2.0, 2.0),
        CatalogEntry::mm("china-standard", "33x48mm (China Passport)", 33, 48),
        CatalogEntry::mm("eu-standard", "35x45mm (EU Passport)", 35, 45),
        CatalogEntry::mm("uk-standard", "35x45mm (UK Passport)", 35, 45),
        CatalogEntry::mm("germany-standard", "35x45mm (Germany)", 35, 45),
        CatalogEntry::mm("france-standard", "35x45mm (France)", 35, 45),
        CatalogEntry::mm("spain-standard", "26x32mm (Spain DNI)", 26, 32),
        CatalogEntry::mm("italy-standard", "35x45mm (Italy)", 35, 45),
        CatalogEntry::mm("japan-standard", "35x45mm (Japan Passport)", 35, 45),
        CatalogEntry::mm("korea-standard", "35x45mm (South Korea)", 35, 45),
        CatalogEntry::mm("brazil-standard", "5x7cm (Brazil)", 50, 70),
        CatalogEntry::mm("australia-standard", "35x45mm (Australia)", 35, 45),
        CatalogEntry::mm("canada-standard", "50x70mm (Canada)", 50, 70),
        CatalogEntry::mm("russia-standard", "35x45mm (Russia)", 35, 45),
        CatalogEntry::mm("mexico-standard", "25x35mm (Mexico)", 25, 35),
        CatalogEntry {
            id: CUSTOM_SIZE_ID,
            label: "Custom Size",
            width_mm: 0,
            height_mm: 0,
            width_px: 0,
            height_px: 0,
        },
    ]
});

static PRINT_SHEETS: Lazy<Vec<PrintSheet>> = Lazy::new(|| {
    vec![
        CatalogEntry::inches("3x4", "3x4\"", 3.0, 4.0),
        CatalogEntry::inches("4x4", "4x4\"", 4.0, 4.0),
        CatalogEntry::inches("4x6", "4x6\"", 4.0, 6.0),
        CatalogEntry::inches("5x6", "5x6\"", 5.0, 6.0),
        CatalogEntry::inches("5x7", "5x7\"", 5.0, 7.0),
        CatalogEntry::mm("a4", "A4", 210, 297),
    ]
});

static BACKGROUND_COLORS: Lazy<Vec<BackgroundPreset>> = Lazy::new(|| {
    let preset = |id, label, r, g, b| BackgroundPreset {
        id,
        label,
        color: Color::rgb(r, g, b),
    };
    vec![
        preset("white", "White", 0xFF, 0xFF, 0xFF),
        preset("light-gray", "Light Gray", 0xF5, 0xF5, 0xF5),
        preset("light-blue", "Light Blue", 0xE3, 0xF2, 0xFD),
        preset("blue", "Blue", 0x21, 0x96, 0xF3),
        preset("red", "Red", 0xF4, 0x43, 0x36),
        preset("gray", "Gray", 0x9E, 0x9E, 0x9E),
        preset("beige", "Beige", 0xF5, 0xF5, 0xDC),
        preset("light-red", "Light Red", 0xFF, 0xEB, 0xEE),
    ]
});

pub fn passport_sizes() -> &'static [PassportSize] {
    &PASSPORT_SIZES
}

pub fn print_sheets() -> &'static [PrintSheet] {
    &PRINT_SHEETS
}

pub fn background_colors() -> &'static [BackgroundPreset] {
    &BACKGROUND_COLORS
}

pub fn passport_size(id: &str) -> Option<&'static PassportSize> {
    PASSPORT_SIZES.iter().find(|s| s.id == id)
}

pub fn print_sheet(id: &str) -> Option<&'static PrintSheet> {
    PRINT_SHEETS.iter().find(|s| s.id == id)
}

pub fn background_color(id: &str) -> Option<&'static BackgroundPreset> {
    BACKGROUND_COLORS.iter().find(|c| c.id == id)
}

/// The passport size a new session starts with.
pub fn default_passport_size() -> &'static PassportSize {
    passport_size(DEFAULT_PASSPORT_SIZE_ID).unwrap_or(&PASSPORT_SIZES[0])
}

pub fn default_print_sheet() -> &'static PrintSheet {
    print_sheet(DEFAULT_PRINT_SHEET_ID).unwrap_or(&PRINT_SHEETS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_px() {
        assert_eq!(mm_to_px(35.0), 413);
        assert_eq!(mm_to_px(45.0), 531);
        assert_eq!(mm_to_px(210.0), 2480);
        assert_eq!(mm_to_px(297.0), 3508);
    }

    #[test]
    fn test_inch_sizes_are_exact() {
        let us = passport_size("us-standard").unwrap();
        assert_eq!((us.width_px, us.height_px), (600, 600));
        assert_eq!((us.width_mm, us.height_mm), (51, 51));

        let sheet = print_sheet("4x6").unwrap();
        assert_eq!((sheet.width_px, sheet.height_px), (1200, 1800));
        assert_eq!((sheet.width_mm, sheet.height_mm), (102, 152));
    }

    #[test]
    fn test_metric_sizes_match_formula() {
        let china = passport_size("china-standard").unwrap();
        assert_eq!((china.width_px, china.height_px), (390, 567));
        let brazil = passport_size("brazil-standard").unwrap();
        assert_eq!((brazil.width_px, brazil.height_px), (591, 827));
        let spain = passport_size("spain-standard").unwrap();
        assert_eq!((spain.width_px, spain.height_px), (307, 378));
    }

    #[test]
    fn test_all_sheets() {
        let dims: Vec<_> = print_sheets()
            .iter()
            .map(|s| (s.id, s.width_px, s.height_px))
            .collect();
        assert_eq!(
            dims,
            vec![
                ("3x4", 900, 1200),
                ("4x4", 1200, 1200),
                ("4x6", 1200, 1800),
                ("5x6", 1500, 1800),
                ("5x7", 1500, 2100),
                ("a4", 2480, 3508),
            ]
        );
    }

    #[test]
    fn test_only_custom_has_zero_pixels() {
        for size in passport_sizes() {
            if size.id == CUSTOM_SIZE_ID {
                assert!(size.is_custom());
                assert_eq!(size.aspect_ratio(), None);
            } else {
                assert!(size.width_px > 0 && size.height_px > 0, "{}", size.id);
            }
        }
        assert_eq!(passport_sizes().len(), 17);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_passport_size().id, "india-standard");
        assert_eq!(default_print_sheet().id, "4x6");
    }

    #[test]
    fn test_unknown_ids() {
        assert!(passport_size("mars-standard").is_none());
        assert!(print_sheet("a0").is_none());
        assert!(background_color("neon").is_none());
    }
}
