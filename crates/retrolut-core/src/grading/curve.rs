//! Keyframed tone curves and their 1D texture bake.
//!
//! Each curve is a list of Hermite keyframes over a bounded domain. The LUT
//! builder never evaluates curves directly; it samples a baked 1D texture
//! of [`CURVE_PRECISION`] entries per curve.
//!
//! # Algorithm
//! For the segment between keys `k0` and `k1` with `dt = k1.time − k0.time`
//! and `s = (t − k0.time) / dt`:
//! ```text
//! v(s) = h00(s)·k0.value + h10(s)·dt·k0.out_tangent + h01(s)·k1.value + h11(s)·dt·k1.in_tangent
//! ```
//! Outside the first/last key the curve is clamped to that key's value.
//!
//! Looping curves (hue-indexed secondaries) are evaluated with the key set
//! wrapped by one period on each side, so the segment across the domain
//! boundary interpolates between the last and first keys.

use serde::{Deserialize, Serialize};

/// Number of samples in a baked curve texture.
pub const CURVE_PRECISION: usize = 128;

/// A single curve control point with Hermite tangents.
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
    pub const fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// A response curve that can bake itself into a sampleable 1D texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTextureCurve")]
pub struct TextureCurve {
    keys: Vec<Keyframe>,
    /// Value of a curve with no keys.
    zero_value: f32,
    /// Whether the curve wraps around its domain.
    looping: bool,
    /// Domain `[min, max]` sampled by the bake.
    range: [f32; 2],
}

impl TextureCurve {
    /// Create a curve. Keys are sorted by time.
    pub fn new(mut keys: Vec<Keyframe>, zero_value: f32, looping: bool, range: [f32; 2]) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            keys,
            zero_value,
            looping,
            range,
        }
    }

    /// The `(0, 0) → (1, 1)` line used by the master and per-channel curves.
    pub fn identity() -> Self {
        Self::new(
            vec![
                Keyframe::new(0.0, 0.0, 1.0, 1.0),
                Keyframe::new(1.0, 1.0, 1.0, 1.0),
            ],
            0.0,
            false,
            [0.0, 1.0],
        )
    }

    /// A curve with no keys, flat at `zero_value`.
    pub fn flat(zero_value: f32, looping: bool) -> Self {
        Self::new(Vec::new(), zero_value, looping, [0.0, 1.0])
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn zero_value(&self) -> f32 {
        self.zero_value
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn range(&self) -> [f32; 2] {
        self.range
    }

    /// Evaluate the curve at `t`.
    pub fn evaluate(&self, t: f32) -> f32 {
        match self.keys.len() {
            0 => self.zero_value,
            1 => self.keys[0].value,
            _ if self.looping => evaluate_keys(&self.wrapped_keys(), t),
            _ => evaluate_keys(&self.keys, t),
        }
    }

    /// Sample the curve uniformly across its range.
    pub fn bake(&self) -> BakedCurve {
        let [min, max] = self.range;
        let step = (max - min) / (CURVE_PRECISION - 1) as f32;

        let samples = match self.keys.len() {
            0 => vec![self.zero_value; CURVE_PRECISION],
            _ => {
                let wrapped;
                let keys: &[Keyframe] = if self.looping && self.keys.len() > 1 {
                    wrapped = self.wrapped_keys();
                    &wrapped
                } else {
                    &self.keys
                };
                (0..CURVE_PRECISION)
                    .map(|i| evaluate_keys(keys, min + i as f32 * step))
                    .collect()
            }
        };

        BakedCurve { samples }
    }

    /// Keys with the last key repeated one period before the domain and the
    /// first key one period after it.
    fn wrapped_keys(&self) -> Vec<Keyframe> {
        let period = self.range[1] - self.range[0];
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];

        let mut keys = Vec::with_capacity(self.keys.len() + 2);
        keys.push(Keyframe {
            time: last.time - period,
            ..last
        });
        keys.extend_from_slice(&self.keys);
        keys.push(Keyframe {
            time: first.time + period,
            ..first
        });
        keys
    }
}

/// Deserialized form; routed through [`TextureCurve::new`] so keys end up sorted.
#[derive(Deserialize)]
struct RawTextureCurve {
    #[serde(default)]
    keys: Vec<Keyframe>,
    #[serde(default)]
    zero_value: f32,
    #[serde(default)]
    looping: bool,
    #[serde(default = "unit_range")]
    range: [f32; 2],
}

fn unit_range() -> [f32; 2] {
    [0.0, 1.0]
}

impl From<RawTextureCurve> for TextureCurve {
    fn from(raw: RawTextureCurve) -> Self {
        Self::new(raw.keys, raw.zero_value, raw.looping, raw.range)
    }
}

/// A curve sampled into [`CURVE_PRECISION`] single-channel texels.
#[derive(Debug, Clone, PartialEq)]
pub struct BakedCurve {
    samples: Vec<f32>,
}

impl BakedCurve {
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Evaluate sorted keys (at least one) at `t`.
fn evaluate_keys(keys: &[Keyframe], t: f32) -> f32 {
    let last = keys.len() - 1;
    if t <= keys[0].time {
        return keys[0].value;
    }
    if t >= keys[last].time {
        return keys[last].value;
    }

    // Binary search for the segment containing t
    let mut lo = 0;
    let mut hi = last;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if keys[mid].time <= t {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let k0 = keys[lo];
    let k1 = keys[hi];
    let dt = k1.time - k0.time;
    if dt.abs() < 1e-10 {
        return k1.value;
    }

    hermite(k0.value, k0.out_tangent * dt, k1.value, k1.in_tangent * dt, (t - k0.time) / dt)
}

/// Cubic Hermite interpolation between `p0` and `p1` with scaled tangents.
fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, s: f32) -> f32 {
    let s2 = s * s;
    let s3 = s2 * s;
    (2.0 * s3 - 3.0 * s2 + 1.0) * p0
        + (s3 - 2.0 * s2 + s) * m0
        + (-2.0 * s3 + 3.0 * s2) * p1
        + (s3 - s2) * m1
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_hermite_endpoints() {
        assert!((hermite(0.25, 0.0, 0.75, 0.0, 0.0) - 0.25).abs() < EPSILON);
        assert!((hermite(0.25, 0.0, 0.75, 0.0, 1.0) - 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_identity_curve_is_linear() {
        let curve = TextureCurve::identity();
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((curve.evaluate(t) - t).abs() < EPSILON, "t={t}");
        }
    }

    #[test]
    fn test_empty_curve_bakes_to_zero_value() {
        let baked = TextureCurve::flat(0.5, true).bake();
        assert_eq!(baked.len(), CURVE_PRECISION);
        assert!(baked.samples().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_identity_bake_spans_unit_range() {
        let baked = TextureCurve::identity().bake();
        let samples = baked.samples();
        assert!((samples[0] - 0.0).abs() < EPSILON);
        assert!((samples[CURVE_PRECISION - 1] - 1.0).abs() < EPSILON);
        assert!(samples.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_clamps_outside_keys() {
        let curve = TextureCurve::new(
            vec![Keyframe::new(0.2, 0.3, 0.0, 0.0), Keyframe::new(0.8, 0.6, 0.0, 0.0)],
            0.0,
            false,
            [0.0, 1.0],
        );
        assert_eq!(curve.evaluate(0.0), 0.3);
        assert_eq!(curve.evaluate(1.0), 0.6);
    }

    #[test]
    fn test_keys_are_sorted_on_construction() {
        let curve = TextureCurve::new(
            vec![Keyframe::new(1.0, 1.0, 0.0, 0.0), Keyframe::new(0.0, 0.0, 0.0, 0.0)],
            0.0,
            false,
            [0.0, 1.0],
        );
        assert_eq!(curve.keys()[0].time, 0.0);
    }

    #[test]
    fn test_looping_curve_wraps_across_domain_edge() {
        // Flat tangents, keys at 0.25 (0.2) and 0.75 (0.8). The wrap segment
        // runs from 0.75 to 1.25, so t = 0 and t = 1 land on the same point.
        let keys = vec![Keyframe::new(0.25, 0.2, 0.0, 0.0), Keyframe::new(0.75, 0.8, 0.0, 0.0)];
        let looping = TextureCurve::new(keys.clone(), 0.5, true, [0.0, 1.0]);
        let clamped = TextureCurve::new(keys, 0.5, false, [0.0, 1.0]);

        assert!((looping.evaluate(0.0) - looping.evaluate(1.0)).abs() < EPSILON);
        assert!((looping.evaluate(0.0) - 0.5).abs() < EPSILON);
        assert_eq!(clamped.evaluate(0.0), 0.2);
        assert_eq!(clamped.evaluate(1.0), 0.8);
    }

    #[test]
    fn test_deserialized_keys_are_sorted() {
        let curve: TextureCurve = serde_json::from_str(
            r#"{"keys": [{"time": 1.0, "value": 1.0}, {"time": 0.0, "value": 0.0}]}"#,
        )
        .unwrap();
        assert_eq!(curve.keys()[0].time, 0.0);
        assert_eq!(curve.range(), [0.0, 1.0]);
        assert!(!curve.is_looping());
    }

    #[test]
    fn test_single_key_is_constant() {
        let curve = TextureCurve::new(vec![Keyframe::new(0.5, 0.7, 0.0, 0.0)], 0.5, true, [0.0, 1.0]);
        assert_eq!(curve.evaluate(0.1), 0.7);
        assert!(curve.bake().samples().iter().all(|&v| v == 0.7));
    }
}
