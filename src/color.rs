//! Color gradients sampled per stack sub-layer.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Opaque white, the neutral fallback color.
pub const WHITE: Vec4 = Vec4::ONE;

/// Opaque black.
pub const BLACK: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

/// How colors between gradient keys are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientMode {
    /// Linear interpolation between the surrounding keys.
    #[default]
    Blend,
    /// Hold the color of the first key at or after the sample position.
    Fixed,
}

/// A single color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientKey {
    /// Position of the key in `[0, 1]`.
    pub time: f32,
    /// RGBA color, linear floats.
    pub color: Vec4,
}

impl GradientKey {
    pub fn new(time: f32, color: Vec4) -> Self {
        Self {
            time: time.clamp(0.0, 1.0),
            color,
        }
    }
}

/// A continuous color function over `[0, 1]`.
///
/// Keys are kept sorted by time. Sampling outside `[0, 1]` is clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GradientRepr", into = "GradientRepr")]
pub struct Gradient {
    keys: Vec<GradientKey>,
    mode: GradientMode,
}

#[derive(Serialize, Deserialize)]
struct GradientRepr {
    #[serde(default)]
    keys: Vec<GradientKey>,
    #[serde(default)]
    mode: GradientMode,
}

impl From<GradientRepr> for Gradient {
    fn from(repr: GradientRepr) -> Self {
        Self::from_keys(repr.keys, repr.mode)
    }
}

impl From<Gradient> for GradientRepr {
    fn from(gradient: Gradient) -> Self {
        Self {
            keys: gradient.keys,
            mode: gradient.mode,
        }
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::two_color(WHITE, BLACK)
    }
}

impl Gradient {
    /// Build a gradient from arbitrary keys. Keys are sorted by time.
    pub fn from_keys(mut keys: Vec<GradientKey>, mode: GradientMode) -> Self {
        for key in &mut keys {
            key.time = key.time.clamp(0.0, 1.0);
        }
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys, mode }
    }

    /// Gradient going from `start` at 0 to `end` at 1.
    pub fn two_color(start: Vec4, end: Vec4) -> Self {
        Self {
            keys: vec![GradientKey::new(0.0, start), GradientKey::new(1.0, end)],
            mode: GradientMode::Blend,
        }
    }

    /// Gradient returning `color` everywhere.
    pub fn solid(color: Vec4) -> Self {
        Self {
            keys: vec![GradientKey::new(0.0, color)],
            mode: GradientMode::Blend,
        }
    }

    pub fn keys(&self) -> &[GradientKey] {
        &self.keys
    }

    /// Sample the gradient at `t`.
    pub fn sample(&self, t: f32) -> Vec4 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return WHITE,
        };
        if t <= first.time {
            return first.color;
        }
        if t >= last.time {
            return last.color;
        }

        // First key strictly after t; guaranteed to exist and to have a predecessor.
        let upper = self.keys.partition_point(|key| key.time <= t);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];

        match self.mode {
            GradientMode::Fixed => {
                if t <= a.time {
                    a.color
                } else {
                    b.color
                }
            }
            GradientMode::Blend => {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.color;
                }
                a.color.lerp(b.color, (t - a.time) / span)
            }
        }
    }

    /// Compare two gradients with a per-component tolerance.
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.mode == other.mode
            && self.keys.len() == other.keys.len()
            && self.keys.iter().zip(&other.keys).all(|(a, b)| {
                (a.time - b.time).abs() <= tolerance && a.color.abs_diff_eq(b.color, tolerance)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_white_to_black() {
        let g = Gradient::default();
        assert_eq!(g.sample(0.0), WHITE);
        assert_eq!(g.sample(1.0), BLACK);
        let mid = g.sample(0.5);
        assert!((mid.x - 0.5).abs() < 1e-6);
        assert_eq!(mid.w, 1.0);
    }

    #[test]
    fn sampling_is_clamped() {
        let g = Gradient::default();
        assert_eq!(g.sample(-3.0), WHITE);
        assert_eq!(g.sample(7.0), BLACK);
        assert_eq!(g.sample(f32::NAN), WHITE);
    }

    #[test]
    fn keys_are_sorted() {
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
        let g = Gradient::from_keys(
            vec![GradientKey::new(1.0, blue), GradientKey::new(0.0, red)],
            GradientMode::Blend,
        );
        assert_eq!(g.keys()[0].color, red);
        assert_eq!(g.sample(0.0), red);
        assert_eq!(g.sample(1.0), blue);
    }

    #[test]
    fn fixed_mode_holds_next_key() {
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let green = Vec4::new(0.0, 1.0, 0.0, 1.0);
        let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
        let g = Gradient::from_keys(
            vec![
                GradientKey::new(0.0, red),
                GradientKey::new(0.5, green),
                GradientKey::new(1.0, blue),
            ],
            GradientMode::Fixed,
        );
        assert_eq!(g.sample(0.25), green);
        assert_eq!(g.sample(0.5), green);
        assert_eq!(g.sample(0.75), blue);
    }

    #[test]
    fn empty_gradient_samples_white() {
        let g = Gradient::from_keys(Vec::new(), GradientMode::Blend);
        assert_eq!(g.sample(0.3), WHITE);
    }

    #[test]
    fn approx_eq_tolerates_small_drift() {
        let a = Gradient::default();
        let b = Gradient::two_color(Vec4::new(1.0, 1.0, 1.0 - 1e-7, 1.0), BLACK);
        assert!(a.approx_eq(&b, 1e-5));
        assert!(!a.approx_eq(&Gradient::solid(WHITE), 1e-5));
    }
}
