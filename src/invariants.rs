//! Tensor invariants for symmetric 3x3 stress and strain fields
//!
//! Von Mises equivalent values and principal components via the
//! closed-form trigonometric solution of the characteristic cubic.
//! Field data arrives as per-node component arrays in single precision,
//! matching solver result files.

use crate::error::{CalxError, CalxResult};

/// Von Mises equivalent of a symmetric tensor given as six components.
pub fn von_mises(xx: f64, yy: f64, zz: f64, xy: f64, yz: f64, zx: f64) -> f64 {
    (0.5 * ((xx - yy).powi(2) + (yy - zz).powi(2) + (zz - xx).powi(2))
        + 3.0 * (xy * xy + yz * yz + zx * zx))
        .sqrt()
}

/// Checks that every component array matches the length of the first.
fn check_lengths(components: [(&str, &[f32]); 6]) -> CalxResult<usize> {
    let expected = components[0].1.len();
    for (name, values) in &components[1..] {
        if values.len() != expected {
            return Err(CalxError::FieldLength {
                component: name.to_string(),
                expected,
                got: values.len(),
            });
        }
    }
    Ok(expected)
}

/// Elementwise von Mises over component arrays of equal length.
pub fn von_mises_field(
    xx: &[f32],
    yy: &[f32],
    zz: &[f32],
    xy: &[f32],
    yz: &[f32],
    zx: &[f32],
) -> CalxResult<Vec<f32>> {
    let n = check_lengths([
        ("xx", xx),
        ("yy", yy),
        ("zz", zz),
        ("xy", xy),
        ("yz", yz),
        ("zx", zx),
    ])?;
    Ok((0..n)
        .map(|i| {
            von_mises(
                xx[i] as f64,
                yy[i] as f64,
                zz[i] as f64,
                xy[i] as f64,
                yz[i] as f64,
                zx[i] as f64,
            ) as f32
        })
        .collect())
}

/// Real roots of `a*x^3 + b*x^2 + c*x + d = 0` for a symmetric-tensor
/// characteristic polynomial, via the depressed-cubic substitution.
///
/// The discriminant-related term `p` is non-positive for any symmetric
/// tensor; when rounding pushes it positive all roots collapse to zero.
/// `p == 0` is the hydrostatic state with a triple root at `-b/(3a)`.
/// The acos argument is clamped to [-1, 1] against floating overshoot.
pub fn solve_depressed_cubic(a: f64, b: f64, c: f64, d: f64) -> (f64, f64, f64) {
    let p = (3.0 * a * c - b * b) / (3.0 * a * a);
    if p > 0.0 {
        return (0.0, 0.0, 0.0);
    }
    if p == 0.0 {
        let root = -b / (3.0 * a);
        return (root, root, root);
    }

    let q = (2.0 * b.powi(3) - 9.0 * a * b * c + 27.0 * a * a * d) / (27.0 * a.powi(3));
    let arg = ((3.0 * q) / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
    let alpha = arg.acos() / 3.0;

    let radius = 2.0 * (-p / 3.0).sqrt();
    let shift = b / (3.0 * a);
    let two_pi_thirds = 2.0 * std::f64::consts::FRAC_PI_3;
    (
        radius * alpha.cos() - shift,
        radius * (alpha - two_pi_thirds).cos() - shift,
        radius * (alpha - 2.0 * two_pi_thirds).cos() - shift,
    )
}

/// Principal components of a symmetric tensor field.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalField {
    /// Principal value of largest magnitude, keeping its sign; ties go to
    /// the maximum.
    pub signed: Vec<f32>,
    pub max: Vec<f32>,
    pub mid: Vec<f32>,
    pub min: Vec<f32>,
}

/// Principal values per entry of six component arrays.
///
/// NaN results (fully degenerate tensors) are flushed to zero so the
/// output is always plottable.
pub fn principal_field(
    xx: &[f32],
    yy: &[f32],
    zz: &[f32],
    xy: &[f32],
    yz: &[f32],
    zx: &[f32],
) -> CalxResult<PrincipalField> {
    let n = check_lengths([
        ("xx", xx),
        ("yy", yy),
        ("zz", zz),
        ("xy", xy),
        ("yz", yz),
        ("zx", zx),
    ])?;

    let mut out = PrincipalField {
        signed: vec![0.0; n],
        max: vec![0.0; n],
        mid: vec![0.0; n],
        min: vec![0.0; n],
    };

    for i in 0..n {
        let (s11, s22, s33) = (xx[i] as f64, yy[i] as f64, zz[i] as f64);
        let (s12, s23, s31) = (xy[i] as f64, yz[i] as f64, zx[i] as f64);

        let i1 = s11 + s22 + s33;
        let i2 = s11 * s22 + s22 * s33 + s33 * s11 - s12 * s12 - s23 * s23 - s31 * s31;
        let i3 = s11 * s22 * s33 - s11 * s23 * s23 - s22 * s31 * s31 - s33 * s12 * s12
            + 2.0 * s12 * s23 * s31;

        let (r1, r2, r3) = solve_depressed_cubic(1.0, -i1, i2, -i3);
        let mut roots = [r1, r2, r3];
        roots.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let [max, mid, min] = roots;

        let signed = if max.abs() >= min.abs() { max } else { min };

        let flush = |v: f64| if v.is_nan() { 0.0 } else { v as f32 };
        out.signed[i] = flush(signed);
        out.max[i] = flush(max);
        out.mid[i] = flush(mid);
        out.min[i] = flush(min);
    }

    Ok(out)
}
