//! Batched f32 primitives behind the split-complex bank.
//!
//! Every hot-path op has a scalar version and, with the `simd-wide` feature,
//! an 8-lane version with a scalar tail; the two agree bit-exactly per
//! element. Split-complex arguments arrive as separate real/imaginary
//! slices. The setup-path helpers (`fill`, `ramp`, `sin`, `cos`) are scalar
//! only; none of them run per sample.

#[cfg(feature = "simd-wide")]
use wide::f32x8;

// Use fused mul-add only when the SIMD path can also fuse, to keep outputs aligned.
#[cfg(any(target_feature = "fma", target_feature = "neon"))]
#[inline(always)]
pub(crate) fn mul_add_fast(a: f32, b: f32, c: f32) -> f32 {
    a.mul_add(b, c)
}

#[cfg(not(any(target_feature = "fma", target_feature = "neon")))]
#[inline(always)]
pub(crate) fn mul_add_fast(a: f32, b: f32, c: f32) -> f32 {
    a * b + c
}

/// Set every element of `dst` to `value`.
pub fn fill(dst: &mut [f32], value: f32) {
    dst.fill(value);
}

/// dst[i] = start + i*step.
pub fn ramp(start: f32, step: f32, dst: &mut [f32]) {
    for (i, d) in dst.iter_mut().enumerate() {
        *d = start + step * i as f32;
    }
}

/// Elementwise sine, setup path only.
pub fn sin(src: &[f32], dst: &mut [f32]) {
    assert_eq!(src.len(), dst.len());
    for (d, &x) in dst.iter_mut().zip(src) {
        *d = x.sin();
    }
}

/// Elementwise cosine, setup path only.
pub fn cos(src: &[f32], dst: &mut [f32]) {
    assert_eq!(src.len(), dst.len());
    for (d, &x) in dst.iter_mut().zip(src) {
        *d = x.cos();
    }
}

/// dst = src * k.
pub fn scale(src: &[f32], k: f32, dst: &mut [f32]) {
    assert_eq!(src.len(), dst.len());
    #[cfg(feature = "simd-wide")]
    {
        scale_simd_wide8(src, k, dst);
    }
    #[cfg(not(feature = "simd-wide"))]
    {
        scale_scalar(src, k, dst);
    }
}

#[allow(dead_code)]
fn scale_scalar(src: &[f32], k: f32, dst: &mut [f32]) {
    for (d, &x) in dst.iter_mut().zip(src) {
        *d = x * k;
    }
}

#[cfg(feature = "simd-wide")]
fn scale_simd_wide8(src: &[f32], k: f32, dst: &mut [f32]) {
    let n = src.len();
    let n8 = n & !7;
    let k_vec = f32x8::splat(k);
    for i in (0..n8).step_by(8) {
        let x_arr: [f32; 8] = src[i..i + 8].try_into().unwrap();
        let y = f32x8::from(x_arr) * k_vec;
        dst[i..i + 8].copy_from_slice(&y.to_array());
    }
    for i in n8..n {
        dst[i] = src[i] * k;
    }
}

/// dst = a * b, elementwise.
pub fn multiply(a: &[f32], b: &[f32], dst: &mut [f32]) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), dst.len());
    #[cfg(feature = "simd-wide")]
    {
        multiply_simd_wide8(a, b, dst);
    }
    #[cfg(not(feature = "simd-wide"))]
    {
        multiply_scalar(a, b, dst);
    }
}

#[allow(dead_code)]
fn multiply_scalar(a: &[f32], b: &[f32], dst: &mut [f32]) {
    for i in 0..dst.len() {
        dst[i] = a[i] * b[i];
    }
}

#[cfg(feature = "simd-wide")]
fn multiply_simd_wide8(a: &[f32], b: &[f32], dst: &mut [f32]) {
    let n = dst.len();
    let n8 = n & !7;
    for i in (0..n8).step_by(8) {
        let a_arr: [f32; 8] = a[i..i + 8].try_into().unwrap();
        let b_arr: [f32; 8] = b[i..i + 8].try_into().unwrap();
        let y = f32x8::from(a_arr) * f32x8::from(b_arr);
        dst[i..i + 8].copy_from_slice(&y.to_array());
    }
    for i in n8..n {
        dst[i] = a[i] * b[i];
    }
}

/// dst = a*b + c, elementwise.
pub fn multiply_add(a: &[f32], b: &[f32], c: &[f32], dst: &mut [f32]) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), c.len());
    assert_eq!(a.len(), dst.len());
    #[cfg(feature = "simd-wide")]
    {
        multiply_add_simd_wide8(a, b, c, dst);
    }
    #[cfg(not(feature = "simd-wide"))]
    {
        multiply_add_scalar(a, b, c, dst);
    }
}

#[allow(dead_code)]
fn multiply_add_scalar(a: &[f32], b: &[f32], c: &[f32], dst: &mut [f32]) {
    for i in 0..dst.len() {
        dst[i] = mul_add_fast(a[i], b[i], c[i]);
    }
}

#[cfg(feature = "simd-wide")]
fn multiply_add_simd_wide8(a: &[f32], b: &[f32], c: &[f32], dst: &mut [f32]) {
    let n = dst.len();
    let n8 = n & !7;
    for i in (0..n8).step_by(8) {
        let a_arr: [f32; 8] = a[i..i + 8].try_into().unwrap();
        let b_arr: [f32; 8] = b[i..i + 8].try_into().unwrap();
        let c_arr: [f32; 8] = c[i..i + 8].try_into().unwrap();
        let y = f32x8::from(a_arr).mul_add(f32x8::from(b_arr), f32x8::from(c_arr));
        dst[i..i + 8].copy_from_slice(&y.to_array());
    }
    for i in n8..n {
        dst[i] = mul_add_fast(a[i], b[i], c[i]);
    }
}

/// acc = acc*decay + x*y, elementwise in place. One-pole smoothing step.
pub fn mul_mul_add(acc: &mut [f32], decay: &[f32], x: &[f32], y: &[f32]) {
    assert_eq!(acc.len(), decay.len());
    assert_eq!(acc.len(), x.len());
    assert_eq!(acc.len(), y.len());
    #[cfg(feature = "simd-wide")]
    {
        mul_mul_add_simd_wide8(acc, decay, x, y);
    }
    #[cfg(not(feature = "simd-wide"))]
    {
        mul_mul_add_scalar(acc, decay, x, y);
    }
}

#[allow(dead_code)]
fn mul_mul_add_scalar(acc: &mut [f32], decay: &[f32], x: &[f32], y: &[f32]) {
    for i in 0..acc.len() {
        acc[i] = mul_add_fast(acc[i], decay[i], x[i] * y[i]);
    }
}

#[cfg(feature = "simd-wide")]
fn mul_mul_add_simd_wide8(acc: &mut [f32], decay: &[f32], x: &[f32], y: &[f32]) {
    let n = acc.len();
    let n8 = n & !7;
    for i in (0..n8).step_by(8) {
        let acc_arr: [f32; 8] = acc[i..i + 8].try_into().unwrap();
        let decay_arr: [f32; 8] = decay[i..i + 8].try_into().unwrap();
        let x_arr: [f32; 8] = x[i..i + 8].try_into().unwrap();
        let y_arr: [f32; 8] = y[i..i + 8].try_into().unwrap();
        let xy = f32x8::from(x_arr) * f32x8::from(y_arr);
        let out = f32x8::from(acc_arr).mul_add(f32x8::from(decay_arr), xy);
        acc[i..i + 8].copy_from_slice(&out.to_array());
    }
    for i in n8..n {
        acc[i] = mul_add_fast(acc[i], decay[i], x[i] * y[i]);
    }
}

/// Split-complex A <- A*B. Plain mul/add in both paths so the scalar phasor
/// step produces the same bits.
pub fn complex_multiply_in_place(a_re: &mut [f32], a_im: &mut [f32], b_re: &[f32], b_im: &[f32]) {
    assert_eq!(a_re.len(), a_im.len());
    assert_eq!(a_re.len(), b_re.len());
    assert_eq!(a_re.len(), b_im.len());
    #[cfg(feature = "simd-wide")]
    {
        complex_multiply_simd_wide8(a_re, a_im, b_re, b_im);
    }
    #[cfg(not(feature = "simd-wide"))]
    {
        complex_multiply_scalar(a_re, a_im, b_re, b_im);
    }
}

#[allow(dead_code)]
fn complex_multiply_scalar(a_re: &mut [f32], a_im: &mut [f32], b_re: &[f32], b_im: &[f32]) {
    for i in 0..a_re.len() {
        let re = a_re[i] * b_re[i] - a_im[i] * b_im[i];
        let im = a_re[i] * b_im[i] + a_im[i] * b_re[i];
        a_re[i] = re;
        a_im[i] = im;
    }
}

#[cfg(feature = "simd-wide")]
fn complex_multiply_simd_wide8(a_re: &mut [f32], a_im: &mut [f32], b_re: &[f32], b_im: &[f32]) {
    let n = a_re.len();
    let n8 = n & !7;
    for i in (0..n8).step_by(8) {
        let ar_arr: [f32; 8] = a_re[i..i + 8].try_into().unwrap();
        let ai_arr: [f32; 8] = a_im[i..i + 8].try_into().unwrap();
        let br_arr: [f32; 8] = b_re[i..i + 8].try_into().unwrap();
        let bi_arr: [f32; 8] = b_im[i..i + 8].try_into().unwrap();
        let ar = f32x8::from(ar_arr);
        let ai = f32x8::from(ai_arr);
        let br = f32x8::from(br_arr);
        let bi = f32x8::from(bi_arr);
        let re = ar * br - ai * bi;
        let im = ar * bi + ai * br;
        a_re[i..i + 8].copy_from_slice(&re.to_array());
        a_im[i..i + 8].copy_from_slice(&im.to_array());
    }
    for i in n8..n {
        let re = a_re[i] * b_re[i] - a_im[i] * b_im[i];
        let im = a_re[i] * b_im[i] + a_im[i] * b_re[i];
        a_re[i] = re;
        a_im[i] = im;
    }
}

/// Split-complex A <- A*k with a real scale vector.
pub fn complex_scale_in_place(re: &mut [f32], im: &mut [f32], k: &[f32]) {
    assert_eq!(re.len(), im.len());
    assert_eq!(re.len(), k.len());
    #[cfg(feature = "simd-wide")]
    {
        complex_scale_simd_wide8(re, im, k);
    }
    #[cfg(not(feature = "simd-wide"))]
    {
        complex_scale_scalar(re, im, k);
    }
}

#[allow(dead_code)]
fn complex_scale_scalar(re: &mut [f32], im: &mut [f32], k: &[f32]) {
    for i in 0..re.len() {
        re[i] *= k[i];
        im[i] *= k[i];
    }
}

#[cfg(feature = "simd-wide")]
fn complex_scale_simd_wide8(re: &mut [f32], im: &mut [f32], k: &[f32]) {
    let n = re.len();
    let n8 = n & !7;
    for i in (0..n8).step_by(8) {
        let re_arr: [f32; 8] = re[i..i + 8].try_into().unwrap();
        let im_arr: [f32; 8] = im[i..i + 8].try_into().unwrap();
        let k_arr: [f32; 8] = k[i..i + 8].try_into().unwrap();
        let k_vec = f32x8::from(k_arr);
        let re_out = f32x8::from(re_arr) * k_vec;
        let im_out = f32x8::from(im_arr) * k_vec;
        re[i..i + 8].copy_from_slice(&re_out.to_array());
        im[i..i + 8].copy_from_slice(&im_out.to_array());
    }
    for i in n8..n {
        re[i] *= k[i];
        im[i] *= k[i];
    }
}

/// dst = re^2 + im^2, elementwise.
pub fn magnitude_squared(re: &[f32], im: &[f32], dst: &mut [f32]) {
    assert_eq!(re.len(), im.len());
    assert_eq!(re.len(), dst.len());
    #[cfg(feature = "simd-wide")]
    {
        magnitude_squared_simd_wide8(re, im, dst);
    }
    #[cfg(not(feature = "simd-wide"))]
    {
        magnitude_squared_scalar(re, im, dst);
    }
}

#[allow(dead_code)]
fn magnitude_squared_scalar(re: &[f32], im: &[f32], dst: &mut [f32]) {
    for i in 0..dst.len() {
        dst[i] = re[i] * re[i] + im[i] * im[i];
    }
}

#[cfg(feature = "simd-wide")]
fn magnitude_squared_simd_wide8(re: &[f32], im: &[f32], dst: &mut [f32]) {
    let n = dst.len();
    let n8 = n & !7;
    for i in (0..n8).step_by(8) {
        let re_arr: [f32; 8] = re[i..i + 8].try_into().unwrap();
        let im_arr: [f32; 8] = im[i..i + 8].try_into().unwrap();
        let rv = f32x8::from(re_arr);
        let iv = f32x8::from(im_arr);
        let y = rv * rv + iv * iv;
        dst[i..i + 8].copy_from_slice(&y.to_array());
    }
    for i in n8..n {
        dst[i] = re[i] * re[i] + im[i] * im[i];
    }
}

/// dst = 1/sqrt(dst), elementwise in place. Full precision, not the
/// approximate hardware estimate.
pub fn rsqrt_in_place(dst: &mut [f32]) {
    #[cfg(feature = "simd-wide")]
    {
        rsqrt_simd_wide8(dst);
    }
    #[cfg(not(feature = "simd-wide"))]
    {
        rsqrt_scalar(dst);
    }
}

#[allow(dead_code)]
fn rsqrt_scalar(dst: &mut [f32]) {
    for d in dst.iter_mut() {
        *d = 1.0 / d.sqrt();
    }
}

#[cfg(feature = "simd-wide")]
fn rsqrt_simd_wide8(dst: &mut [f32]) {
    let n = dst.len();
    let n8 = n & !7;
    let one = f32x8::splat(1.0);
    for i in (0..n8).step_by(8) {
        let x_arr: [f32; 8] = dst[i..i + 8].try_into().unwrap();
        let y = one / f32x8::from(x_arr).sqrt();
        dst[i..i + 8].copy_from_slice(&y.to_array());
    }
    for d in dst[n8..n].iter_mut() {
        *d = 1.0 / d.sqrt();
    }
}

/// dst = sqrt(dst), elementwise in place.
pub fn sqrt_in_place(dst: &mut [f32]) {
    #[cfg(feature = "simd-wide")]
    {
        sqrt_simd_wide8(dst);
    }
    #[cfg(not(feature = "simd-wide"))]
    {
        sqrt_scalar(dst);
    }
}

#[allow(dead_code)]
fn sqrt_scalar(dst: &mut [f32]) {
    for d in dst.iter_mut() {
        *d = d.sqrt();
    }
}

#[cfg(feature = "simd-wide")]
fn sqrt_simd_wide8(dst: &mut [f32]) {
    let n = dst.len();
    let n8 = n & !7;
    for i in (0..n8).step_by(8) {
        let x_arr: [f32; 8] = dst[i..i + 8].try_into().unwrap();
        let y = f32x8::from(x_arr).sqrt();
        dst[i..i + 8].copy_from_slice(&y.to_array());
    }
    for d in dst[n8..n].iter_mut() {
        *d = d.sqrt();
    }
}
