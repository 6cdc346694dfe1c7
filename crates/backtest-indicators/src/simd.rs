//! SIMD-accelerated slice helpers.
//!
//! These use the `wide` crate for portable SIMD operations and back the
//! rolling-window kernels.

use wide::f64x4;

/// SIMD-optimized sum of a slice.
pub fn sum_simd(data: &[f64]) -> f64 {
    let chunks = data.len() / 4;
    let mut simd_sum = f64x4::splat(0.0);

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]);
        simd_sum += values;
    }

    let mut result = simd_sum.reduce_add();

    // Handle remaining elements
    for &value in &data[(chunks * 4)..] {
        result += value;
    }

    result
}

/// Mean of a window, accumulated as offsets from its first element.
///
/// A window of identical values averages to exactly that value.
pub fn mean_simd(window: &[f64]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }

    let base = window[0];
    let base_vec = f64x4::splat(base);
    let chunks = window.len() / 4;
    let mut simd_sum = f64x4::splat(0.0);

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([
            window[idx],
            window[idx + 1],
            window[idx + 2],
            window[idx + 3],
        ]);
        simd_sum += values - base_vec;
    }

    let mut offset_sum = simd_sum.reduce_add();
    for &value in &window[(chunks * 4)..] {
        offset_sum += value - base;
    }

    base + offset_sum / window.len() as f64
}

/// SIMD sum of squared deviations from `mean`.
pub fn sum_sq_dev_simd(window: &[f64], mean: f64) -> f64 {
    let chunks = window.len() / 4;
    let mean_vec = f64x4::splat(mean);
    let mut sum_sq = 0.0;

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([
            window[idx],
            window[idx + 1],
            window[idx + 2],
            window[idx + 3],
        ]);
        let diff = values - mean_vec;
        sum_sq += (diff * diff).reduce_add();
    }

    for &value in &window[(chunks * 4)..] {
        let diff = value - mean;
        sum_sq += diff * diff;
    }

    sum_sq
}

/// Split close-to-close changes into gains and losses (both non-negative).
///
/// Both outputs have `data.len() - 1` elements.
pub fn gains_losses_simd(data: &[f64]) -> (Vec<f64>, Vec<f64>) {
    if data.len() < 2 {
        return (vec![], vec![]);
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);

    let chunks = (data.len() - 1) / 4;
    let zero = f64x4::splat(0.0);

    for i in 0..chunks {
        let idx = i * 4;
        let prev = f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]);
        let curr = f64x4::new([
            data[idx + 1],
            data[idx + 2],
            data[idx + 3],
            data[idx + 4],
        ]);

        let diff = curr - prev;
        gains.extend(diff.max(zero).to_array());
        losses.extend((-diff).max(zero).to_array());
    }

    for i in (chunks * 4)..(data.len() - 1) {
        let change = data[i + 1] - data[i];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    (gains, losses)
}
