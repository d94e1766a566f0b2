//! "Nice number" tick and level selection.
//!
//! Picks evenly spaced values whose step is 1, 2, 2.5 or 5 times a power of
//! ten, the same family of steps used by common plotting tools for axis
//! ticks and automatic contour levels.

/// Mantissas of acceptable step sizes, ascending.
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Upper bound on tick bins for any axis.
pub const MAX_BINS: usize = 9;

/// Tolerance (in units of the step) when testing range membership.
const EDGE_EPSILON: f64 = 1e-10;

/// Choose a nice step for splitting `[vmin, vmax]` into at most `nbins` bins.
///
/// Returns `None` for empty, inverted or non-finite ranges.
pub fn nice_step(vmin: f64, vmax: f64, nbins: usize) -> Option<f64> {
    if !(vmin.is_finite() && vmax.is_finite()) || vmax <= vmin || nbins == 0 {
        return None;
    }

    let n = nbins as f64;
    let span = vmax - vmin;
    // Spans near f64::MAX overflow; dividing first keeps them finite
    let raw = if span.is_finite() { span / n } else { vmax / n - vmin / n };
    let exponent = raw.log10().floor();
    if !exponent.is_finite() {
        return None;
    }
    let exponent = exponent as i32;

    let mut chosen = None;
    for mantissa in NICE_STEPS {
        let step = scale_by_power_of_ten(mantissa, exponent);
        if step < raw * (1.0 - EDGE_EPSILON) {
            continue;
        }
        // The first tick sits at or below vmin; make sure nbins steps reach vmax.
        let first = (vmin / step + EDGE_EPSILON).floor() * step;
        if first + n * step >= vmax - step * EDGE_EPSILON {
            chosen = Some(step);
            break;
        }
    }

    let step = chosen.unwrap_or_else(|| scale_by_power_of_ten(2.0, exponent.saturating_add(1)));
    // Denormal ranges underflow to a zero step
    (step.is_finite() && step > 0.0).then_some(step)
}

/// `mantissa * 10^exponent`, dividing for negative exponents so that steps
/// such as 0.05 come out as the nearest double.
fn scale_by_power_of_ten(mantissa: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        mantissa * 10f64.powi(exponent)
    } else {
        mantissa / 10f64.powi(-exponent)
    }
}

/// Nice tick values spanning `[vmin, vmax]`, extending to the first tick at
/// or below `vmin` and the first at or above `vmax`.
pub fn nice_ticks(vmin: f64, vmax: f64, nbins: usize) -> Vec<f64> {
    let Some(step) = nice_step(vmin, vmax, nbins) else {
        return vec![];
    };

    let first = (vmin / step + EDGE_EPSILON).floor();
    let last = (vmax / step - EDGE_EPSILON).ceil();
    if !(first.is_finite() && last.is_finite()) || last - first > (nbins + 2) as f64 {
        return vec![];
    }

    (first as i64..=last as i64)
        .map(|k| snap(k as f64 * step, step))
        .collect()
}

/// Nice ticks restricted to the closed range `[vmin, vmax]`.
pub fn ticks_within(vmin: f64, vmax: f64, nbins: usize) -> Vec<f64> {
    let Some(step) = nice_step(vmin, vmax, nbins) else {
        return vec![];
    };
    let tol = step * EDGE_EPSILON * 10.0;
    nice_ticks(vmin, vmax, nbins)
        .into_iter()
        .filter(|t| *t >= vmin - tol && *t <= vmax + tol)
        .collect()
}

/// Bin count for an axis of `length_px` pixels carrying labels of
/// `label_px` pixels, with `spacing` label sizes between ticks.
pub fn bins_for_length(length_px: f32, label_px: f32, spacing: f32) -> usize {
    if label_px <= 0.0 || spacing <= 0.0 {
        return 1;
    }
    let fit = (length_px / (label_px * spacing)).floor();
    (fit.max(1.0) as usize).min(MAX_BINS)
}

/// Number of decimal places needed to print multiples of `step` exactly.
pub fn decimals_for_step(step: f64) -> usize {
    for decimals in 0..=8 {
        let scaled = step * 10f64.powi(decimals as i32);
        if (scaled - scaled.round()).abs() < 1e-6 {
            return decimals;
        }
    }
    8
}

/// Format a tick value with the precision implied by its step.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = decimals_for_step(step);
    let text = format!("{:.*}", decimals, value);
    // "-0.0" reads badly on an axis
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

/// Remove accumulated floating-point noise from `k * step`.
fn snap(value: f64, step: f64) -> f64 {
    let decimals = decimals_for_step(step) as i32 + 2;
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    // Steps finer than the rounding grid, or values too large to scale, stay as is
    if step * factor < 1.0 || !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
