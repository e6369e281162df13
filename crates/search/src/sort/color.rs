//! Ordering by color
//!
//! [`ColorComparator`] precomputes each record's HSV color once and orders:
//!
//! 1. records with a usable color before records without one
//! 2. colorful records before shades (saturation below
//!    [`ColorSortConfig::shade_saturation`])
//! 3. by hue, where hues in the same tolerance-wide band compare equal
//! 4. by saturation + value, larger (more vivid) first
//!
//! Hue bands are fixed buckets of `hue_tolerance` degrees computed at
//! precompute time. Comparing "within tolerance" pairwise is not transitive,
//! and a sort needs a total order.
//!
//! Conversion into HSV belongs to the host's color subsystem and is reached
//! through [`ToHsv`].

use super::{Comparator, Computed, Ranked};
use serde::{Deserialize, Serialize};
use sift_core::{Result, SiftError};
use std::cmp::Ordering;
use std::marker::PhantomData;

// ============================================================================
// Color values
// ============================================================================

/// Color in HSV space: hue in degrees `[0, 360)`, saturation and value in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    /// Hue in degrees
    pub h: f32,
    /// Saturation
    pub s: f32,
    /// Value (brightness)
    pub v: f32,
}

impl Hsv {
    /// Create an HSV color
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Hsv { h, s, v }
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Rgb {
    /// Create an RGB color
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

/// Conversion into HSV
pub trait ToHsv {
    /// This color in HSV space
    fn to_hsv(&self) -> Hsv;
}

impl ToHsv for Hsv {
    fn to_hsv(&self) -> Hsv {
        *self
    }
}

impl ToHsv for Rgb {
    fn to_hsv(&self) -> Hsv {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };

        Hsv::new(h, s, max)
    }
}

// ============================================================================
// ColorSortConfig
// ============================================================================

/// Color ordering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSortConfig {
    /// Width in degrees of the hue bands treated as equal (default: 2.0)
    ///
    /// Bands are fixed: band `n` covers `[n * tol, (n + 1) * tol)`. Two hues
    /// closer than the tolerance can still fall in neighbouring bands, so
    /// 1.9 and 2.1 order by hue while 0.1 and 1.9 compare equal.
    pub hue_tolerance: f32,

    /// Saturation below which a color counts as a shade (default: 0.1)
    pub shade_saturation: f32,
}

impl Default for ColorSortConfig {
    fn default() -> Self {
        ColorSortConfig {
            hue_tolerance: 2.0,
            shade_saturation: 0.1,
        }
    }
}

impl ColorSortConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set hue tolerance (builder pattern)
    pub fn with_hue_tolerance(mut self, degrees: f32) -> Self {
        self.hue_tolerance = degrees;
        self
    }

    /// Set shade saturation threshold (builder pattern)
    pub fn with_shade_saturation(mut self, saturation: f32) -> Self {
        self.shade_saturation = saturation;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.hue_tolerance.is_finite() || self.hue_tolerance < 0.0 {
            return Err(SiftError::InvalidConfig(format!(
                "hue_tolerance must be a non-negative number, got {}",
                self.hue_tolerance
            )));
        }
        if !(0.0..=1.0).contains(&self.shade_saturation) {
            return Err(SiftError::InvalidConfig(format!(
                "shade_saturation must be within [0, 1], got {}",
                self.shade_saturation
            )));
        }
        Ok(())
    }
}

// ============================================================================
// ColorComparator
// ============================================================================

/// Precomputed color data for one record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorKey {
    /// The record's color, if it resolves to one
    pub hsv: Option<Hsv>,
    /// Hue band index
    pub hue_band: i64,
    /// Saturation below the shade threshold
    pub shade: bool,
}

/// Orders records by their color
pub struct ColorComparator<F, C> {
    extract: F,
    config: ColorSortConfig,
    _color: PhantomData<fn() -> C>,
}

/// Order records by the color `extract` resolves for them
pub fn compare_color<T, F, C>(extract: F) -> ColorComparator<F, C>
where
    F: Fn(&T) -> Option<C> + Send + Sync,
    C: ToHsv,
{
    ColorComparator {
        extract,
        config: ColorSortConfig::default(),
        _color: PhantomData,
    }
}

impl<F, C> ColorComparator<F, C> {
    /// Replace the ordering parameters
    pub fn with_config(mut self, config: ColorSortConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Current ordering parameters
    pub fn config(&self) -> &ColorSortConfig {
        &self.config
    }

    fn key_of<T>(&self, value: &T) -> ColorKey
    where
        F: Fn(&T) -> Option<C>,
        C: ToHsv,
    {
        let hsv = (self.extract)(value).map(|c| c.to_hsv());
        let (hue_band, shade) = match hsv {
            Some(hsv) => (
                hue_band(hsv.h, self.config.hue_tolerance),
                hsv.s < self.config.shade_saturation,
            ),
            None => (0, false),
        };
        ColorKey {
            hsv,
            hue_band,
            shade,
        }
    }
}

fn hue_band(hue: f32, tolerance: f32) -> i64 {
    if tolerance > 0.0 {
        (hue / tolerance).floor() as i64
    } else {
        // Zero tolerance keeps full precision; f32 bits order like the
        // value for non-negative hues
        hue.max(0.0).to_bits() as i64
    }
}

impl<T, F, C> Comparator<T> for ColorComparator<F, C>
where
    F: Fn(&T) -> Option<C> + Send + Sync,
    C: ToHsv,
{
    fn compare(&self, a: Ranked<'_, T>, b: Ranked<'_, T>) -> Ordering {
        let ka = a
            .computed
            .get::<ColorKey>()
            .copied()
            .unwrap_or_else(|| self.key_of(a.value));
        let kb = b
            .computed
            .get::<ColorKey>()
            .copied()
            .unwrap_or_else(|| self.key_of(b.value));

        let (ha, hb) = match (ka.hsv, kb.hsv) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (Some(ha), Some(hb)) => (ha, hb),
        };

        ka.shade
            .cmp(&kb.shade)
            .then_with(|| {
                if ka.shade && kb.shade {
                    Ordering::Equal
                } else {
                    ka.hue_band.cmp(&kb.hue_band)
                }
            })
            .then_with(|| (hb.s + hb.v).total_cmp(&(ha.s + ha.v)))
    }

    fn precompute(&self, value: &T) -> Option<Computed> {
        Some(Computed::new().with(self.key_of(value)))
    }

    fn name(&self) -> &str {
        "color"
    }
}

// ============================================================================
// Tests
// ============================================================================
