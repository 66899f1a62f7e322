//! Shaping curves and glyph bending.
//!
//! - [`Curve`] - Any 1-D function sampled over `[0, 1]`
//! - [`KeyframeCurve`] - Serializable Hermite keyframe curve
//! - [`CurveBender`] - Bends glyph quads along a curve

mod bender;

pub use bender::{BendSettings, CurveBender, TANGENT_STEP};

use serde::{Deserialize, Serialize};

/// A 1-D shaping function sampled over `[0, 1]`.
pub trait Curve {
    fn evaluate(&self, t: f32) -> f32;
}

impl<F: Fn(f32) -> f32> Curve for F {
    fn evaluate(&self, t: f32) -> f32 {
        self(t)
    }
}

/// A keyframe of a [`KeyframeCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    pub fn with_tangents(mut self, in_tangent: f32, out_tangent: f32) -> Self {
        self.in_tangent = in_tangent;
        self.out_tangent = out_tangent;
        self
    }
}

/// Piecewise cubic Hermite curve through a list of keyframes.
///
/// Evaluation is clamped to the first/last key outside the key range.
/// An empty curve evaluates to zero everywhere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct KeyframeCurve {
    keys: Vec<Keyframe>,
}

impl From<Vec<Keyframe>> for KeyframeCurve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::new(keys)
    }
}

impl From<KeyframeCurve> for Vec<Keyframe> {
    fn from(curve: KeyframeCurve) -> Self {
        curve.keys
    }
}

impl KeyframeCurve {
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Constant zero curve.
    pub fn flat() -> Self {
        Self::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 0.0)])
    }

    /// Straight line from 0 at `t = 0` to 1 at `t = 1`.
    pub fn linear() -> Self {
        Self::new(vec![
            Keyframe::new(0.0, 0.0).with_tangents(1.0, 1.0),
            Keyframe::new(1.0, 1.0).with_tangents(1.0, 1.0),
        ])
    }

    /// Symmetric arch peaking at 1 in the middle.
    pub fn arc() -> Self {
        Self::new(vec![
            Keyframe::new(0.0, 0.0).with_tangents(2.0, 2.0),
            Keyframe::new(0.5, 1.0),
            Keyframe::new(1.0, 0.0).with_tangents(-2.0, -2.0),
        ])
    }

    /// One full sine-like period.
    pub fn wave() -> Self {
        Self::new(vec![
            Keyframe::new(0.0, 0.0).with_tangents(4.0, 4.0),
            Keyframe::new(0.25, 1.0),
            Keyframe::new(0.5, 0.0).with_tangents(-4.0, -4.0),
            Keyframe::new(0.75, -1.0),
            Keyframe::new(1.0, 0.0).with_tangents(4.0, 4.0),
        ])
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.keys.len() == other.keys.len()
            && self.keys.iter().zip(&other.keys).all(|(a, b)| {
                (a.time - b.time).abs() <= tolerance
                    && (a.value - b.value).abs() <= tolerance
                    && (a.in_tangent - b.in_tangent).abs() <= tolerance
                    && (a.out_tangent - b.out_tangent).abs() <= tolerance
            })
    }
}

impl Curve for KeyframeCurve {
    fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        let upper = self.keys.partition_point(|key| key.time <= t);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];

        let dt = b.time - a.time;
        if dt <= f32::EPSILON {
            return b.value;
        }
        let s = (t - a.time) / dt;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        h00 * a.value + h10 * dt * a.out_tangent + h01 * b.value + h11 * dt * b.in_tangent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_curve_is_zero() {
        let c = KeyframeCurve::flat();
        for i in 0..=10 {
            assert_eq!(c.evaluate(i as f32 / 10.0), 0.0);
        }
    }

    #[test]
    fn linear_curve_is_identity() {
        let c = KeyframeCurve::linear();
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((c.evaluate(t) - t).abs() < 1e-5);
        }
    }

    #[test]
    fn nan_evaluates_to_first_key() {
        assert_eq!(KeyframeCurve::linear().evaluate(f32::NAN), 0.0);
        assert_eq!(KeyframeCurve::arc().evaluate(f32::NAN), 0.0);
        assert_eq!(KeyframeCurve::default().evaluate(f32::NAN), 0.0);
    }

    #[test]
    fn arc_is_symmetric() {
        let c = KeyframeCurve::arc();
        assert!((c.evaluate(0.5) - 1.0).abs() < 1e-6);
        for i in 0..=5 {
            let d = i as f32 / 10.0;
            assert!((c.evaluate(0.5 - d) - c.evaluate(0.5 + d)).abs() < 1e-5);
        }
    }

    #[test]
    fn evaluation_clamps_outside_keys() {
        let c = KeyframeCurve::linear();
        assert_eq!(c.evaluate(-1.0), 0.0);
        assert_eq!(c.evaluate(2.0), 1.0);
    }

    #[test]
    fn empty_curve_is_zero() {
        assert_eq!(KeyframeCurve::default().evaluate(0.4), 0.0);
    }

    #[test]
    fn closures_are_curves() {
        let c = |t: f32| t * 2.0;
        assert_eq!(Curve::evaluate(&c, 0.25), 0.5);
    }
}
