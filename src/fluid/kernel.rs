//! SPH smoothing kernel functions.
//!
//! Three kernels, used for three different estimates:
//!
//! - **Poly6** for density (smooth, cheap to evaluate from a squared
//!   distance),
//! - **Spiky gradient** for the pressure force (non-vanishing gradient as
//!   particles approach, which poly6 lacks),
//! - **Viscosity laplacian** for the viscosity force.
//!
//! All functions take a precomputed normalization coefficient (see
//! [`KernelCoefficients`](super::params::KernelCoefficients)) so the inner
//! loops never recompute `h^6`/`h^9` terms. Outside their support radius
//! every kernel evaluates to zero.

/// Poly6 kernel: `coeff * (h^2 - r^2)^3` for `r^2 < h^2`.
#[inline]
pub fn poly6(coeff: f32, h_sq: f32, r_sq: f32) -> f32 {
    if r_sq >= h_sq {
        return 0.0;
    }
    let diff = h_sq - r_sq;
    coeff * diff * diff * diff
}

/// Magnitude of the spiky kernel gradient: `coeff * (h - r)^2` for `r < h`.
///
/// The coefficient is negative, so the returned value is negative: applied
/// along the normalized direction from particle i to particle j it pushes
/// the particles apart under positive pressure.
#[inline]
pub fn spiky_gradient(coeff: f32, h: f32, r: f32) -> f32 {
    if r >= h {
        return 0.0;
    }
    let diff = h - r;
    coeff * diff * diff
}

/// Viscosity kernel laplacian: `coeff * (h - r)` for `r < h`.
#[inline]
pub fn viscosity_laplacian(coeff: f32, h: f32, r: f32) -> f32 {
    if r >= h {
        return 0.0;
    }
    coeff * (h - r)
}

/// Long-range cohesion weight: `coeff * (2h - r)^3` for `r < 2h`.
///
/// Reuses the spiky gradient coefficient over a doubled support radius;
/// together with the negative sigma prefactor in the force pass this yields
/// an attractive term between nearby particles.
#[inline]
pub fn cohesion(spiky_coeff: f32, h: f32, r: f32) -> f32 {
    let support = 2.0 * h;
    if r >= support {
        return 0.0;
    }
    let diff = support - r;
    spiky_coeff * diff * diff * diff
}
