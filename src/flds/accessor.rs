//! Read access to field components at integer grid indices.
//!
//! The plain accessor returns the stored value. The macroscopic accessor
//! divides it by a material parameter (conductivity, permittivity or
//! permeability) evaluated at the physical location of the sample, which
//! depends on the staggering of the component.

use crate::consts::{EP0, MU0};
use crate::flds::field::{Field, IndexType};
use crate::Float;
use std::fmt;
use std::sync::Arc;

/// Shared read-only sampling of a grid array. Implementors have no side
/// effects so the gather can call them from every worker at once.
pub trait FieldAccessor: Sync {
    fn at(&self, i: i64, j: i64, k: i64, ncomp: usize) -> Float;
}

/// Physical coordinates of the (i, j, k) point of a component with the
/// given staggering.
#[inline(always)]
pub fn cell_coordinates(
    i: i64,
    j: i64,
    k: i64,
    ixtype: IndexType,
    domain_lo: [Float; 3],
    dx: [Float; 3],
) -> [Float; 3] {
    let stag = ixtype.stag();
    let idx = [i, j, k];
    let mut xyz = [0.0; 3];
    for d in 0..3 {
        xyz[d] = domain_lo[d]
            + idx[d] as Float * dx[d]
            + (1 - stag[d]) as Float * 0.5 * dx[d];
    }
    xyz
}

/// Raw values of a field.
#[derive(Clone, Copy)]
pub struct DirectAccessor<'a> {
    field: &'a Field,
}

impl<'a> DirectAccessor<'a> {
    pub fn new(field: &'a Field) -> DirectAccessor<'a> {
        DirectAccessor { field }
    }
}

impl<'a> FieldAccessor for DirectAccessor<'a> {
    #[inline(always)]
    fn at(&self, i: i64, j: i64, k: i64, ncomp: usize) -> Float {
        self.field.get(i, j, k, ncomp)
    }
}

/// Either a uniform value or a user function of (x, y, z).
#[derive(Clone)]
pub enum Macroparameter {
    Constant(Float),
    Function(Arc<dyn Fn(Float, Float, Float) -> Float + Send + Sync>),
}

impl Macroparameter {
    #[inline(always)]
    pub fn at(&self, x: Float, y: Float, z: Float) -> Float {
        match self {
            Macroparameter::Constant(v) => *v,
            Macroparameter::Function(f) => f(x, y, z),
        }
    }
}

impl fmt::Debug for Macroparameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Macroparameter::Constant(v) => write!(f, "Constant({})", v),
            Macroparameter::Function(_) => write!(f, "Function(..)"),
        }
    }
}

/// Field value divided by a material parameter at the sample location.
pub struct MacroscopicAccessor<'a> {
    field: &'a Field,
    parameter: &'a Macroparameter,
    domain_lo: [Float; 3],
    dx: [Float; 3],
}

impl<'a> MacroscopicAccessor<'a> {
    pub fn new(
        field: &'a Field,
        parameter: &'a Macroparameter,
        domain_lo: [Float; 3],
        dx: [Float; 3],
    ) -> MacroscopicAccessor<'a> {
        MacroscopicAccessor {
            field,
            parameter,
            domain_lo,
            dx,
        }
    }
}

impl<'a> FieldAccessor for MacroscopicAccessor<'a> {
    #[inline(always)]
    fn at(&self, i: i64, j: i64, k: i64, ncomp: usize) -> Float {
        let [x, y, z] = cell_coordinates(i, j, k, self.field.ixtype(), self.domain_lo, self.dx);
        self.field.get(i, j, k, ncomp) / self.parameter.at(x, y, z)
    }
}

/// Properties of the medium used by a macroscopic Maxwell solver.
#[derive(Debug, Clone)]
pub struct MacroscopicProperties {
    pub sigma: Macroparameter,
    pub epsilon: Macroparameter,
    pub mu: Macroparameter,
}

impl Default for MacroscopicProperties {
    fn default() -> Self {
        MacroscopicProperties {
            sigma: Macroparameter::Constant(0.0),
            epsilon: Macroparameter::Constant(EP0),
            mu: Macroparameter::Constant(MU0),
        }
    }
}

impl MacroscopicProperties {
    /// H = B / mu, sampled on the grid of `b`.
    pub fn h_accessor<'a>(
        &'a self,
        b: &'a Field,
        domain_lo: [Float; 3],
        dx: [Float; 3],
    ) -> MacroscopicAccessor<'a> {
        MacroscopicAccessor::new(b, &self.mu, domain_lo, dx)
    }
}

/// Coefficients of the E update `E = alpha E + beta (curl H - J)`.
pub trait MacroscopicScheme {
    fn alpha(sigma: Float, epsilon: Float, dt: Float) -> Float;
    fn beta(sigma: Float, epsilon: Float, dt: Float) -> Float;
}

pub struct LaxWendroff;

impl MacroscopicScheme for LaxWendroff {
    #[inline(always)]
    fn alpha(sigma: Float, epsilon: Float, dt: Float) -> Float {
        let fac1 = 0.5 * sigma * dt / epsilon;
        (1.0 - fac1) / (1.0 + fac1)
    }

    #[inline(always)]
    fn beta(sigma: Float, epsilon: Float, dt: Float) -> Float {
        let fac1 = 0.5 * sigma * dt / epsilon;
        dt / (epsilon * (1.0 + fac1))
    }
}

pub struct BackwardEuler;

impl MacroscopicScheme for BackwardEuler {
    #[inline(always)]
    fn alpha(sigma: Float, epsilon: Float, dt: Float) -> Float {
        let fac1 = sigma * dt / epsilon;
        1.0 / (1.0 + fac1)
    }

    #[inline(always)]
    fn beta(sigma: Float, epsilon: Float, dt: Float) -> Float {
        let fac1 = sigma * dt / epsilon;
        dt / (epsilon * (1.0 + fac1))
    }
}
