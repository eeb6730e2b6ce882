use crate::consts::{C, INV_C2};
use crate::error::{PicError, PicResult};
use crate::Float;

/// Lorentz boost along +z. Built once from the configuration and only read
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostedFrame {
    pub gamma_boost: Float,
    pub beta_boost: Float,
}

impl Default for BoostedFrame {
    fn default() -> Self {
        BoostedFrame {
            gamma_boost: 1.0,
            beta_boost: 0.0,
        }
    }
}

impl BoostedFrame {
    pub fn new(gamma_boost: Float) -> PicResult<BoostedFrame> {
        if !(gamma_boost >= 1.0) {
            return Err(PicError::InvalidBoost(gamma_boost as f64));
        }
        Ok(BoostedFrame {
            gamma_boost,
            beta_boost: (1.0 - gamma_boost.powi(-2)).sqrt(),
        })
    }

    /// Velocity of the boosted frame in the lab [m/s]
    #[inline(always)]
    pub fn v_boost(&self) -> Float {
        self.beta_boost * C
    }

    /// gamma_boost * beta_boost * c
    #[inline(always)]
    pub fn uz_boost(&self) -> Float {
        self.gamma_boost * self.beta_boost * C
    }

    pub fn is_boosted(&self) -> bool {
        self.gamma_boost > 1.0
    }

    /// Transform a lab frame momentum u = gamma*v into the boosted frame.
    pub fn momentum_to_boosted(&self, u: [Float; 3]) -> [Float; 3] {
        let gamma = (1.0 + (u[0] * u[0] + u[1] * u[1] + u[2] * u[2]) * INV_C2).sqrt();
        [
            u[0],
            u[1],
            self.gamma_boost * (u[2] - self.beta_boost * gamma * C),
        ]
    }

    /// Longitudinal position of a lab frame point (at t_lab = 0) in the
    /// boosted frame.
    #[inline(always)]
    pub fn z_to_boosted(&self, z_lab: Float) -> Float {
        z_lab / self.gamma_boost
    }
}
