//! Kernel functions for kernel-weighted estimators.
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// A symmetric kernel function `k` with unit total mass.
///
/// `int_k` is the integral of `k` from negative infinity to `u`, `k2` the
/// variance of the kernel and `cut_off` a distance past which `k(u)` is small
/// enough to treat as zero.
pub trait KernelFunction: Send + Sync {
    fn k(&self, u: f64) -> f64;
    fn int_k(&self, u: f64) -> f64;
    fn k2(&self) -> f64;
    fn cut_off(&self) -> f64;
    fn name(&self) -> &str {
        "kernel"
    }
}

/// Gaussian kernel: the standard normal density.
#[derive(Debug, Clone)]
pub struct Gauss {
    norm: Normal,
}

impl Gauss {
    pub fn new() -> Self {
        Gauss {
            // parameters are fixed and valid
            norm: Normal::new(0.0, 1.0).unwrap(),
        }
    }
}

impl Default for Gauss {
    fn default() -> Self {
        Gauss::new()
    }
}

impl KernelFunction for Gauss {
    fn k(&self, u: f64) -> f64 {
        self.norm.pdf(u)
    }

    fn int_k(&self, u: f64) -> f64 {
        self.norm.cdf(u)
    }

    fn k2(&self) -> f64 {
        1.0
    }

    fn cut_off(&self) -> f64 {
        // k(13) is ~8e-38; adding it to any realistic sum is a no-op
        13.0
    }

    fn name(&self) -> &str {
        "gauss"
    }
}

/// Epanechnikov kernel: `0.75 (1 - u^2)` on `[-1, 1]`, zero elsewhere.
#[derive(Debug, Clone, Default)]
pub struct Epanechnikov;

impl KernelFunction for Epanechnikov {
    fn k(&self, u: f64) -> f64 {
        if u.abs() > 1.0 {
            0.0
        } else {
            0.75 * (1.0 - u * u)
        }
    }

    fn int_k(&self, u: f64) -> f64 {
        if u < -1.0 {
            0.0
        } else if u > 1.0 {
            1.0
        } else {
            0.75 * u - 0.25 * u.powi(3) + 0.5
        }
    }

    fn k2(&self) -> f64 {
        0.2
    }

    fn cut_off(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &str {
        "epanechnikov"
    }
}
