/// Fill interior gaps by straight-line interpolation over position.
///
/// Spacing between timestamps is ignored: a gap of `k` missing entries between
/// two known values is split into `k + 1` equal steps. Known values are copied
/// through untouched and missing entries before the first or after the last
/// known value stay `None`.
pub fn interpolate_linear(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = values.to_vec();
    let mut prev: Option<(usize, f64)> = None;

    for (i, v) in values.iter().enumerate() {
        let Some(v) = *v else { continue };
        if let Some((p, pv)) = prev {
            let span = (i - p) as f64;
            for (k, slot) in out.iter_mut().enumerate().take(i).skip(p + 1) {
                let t = (k - p) as f64 / span;
                *slot = Some(pv + (v - pv) * t);
            }
        }
        prev = Some((i, v));
    }

    out
}
