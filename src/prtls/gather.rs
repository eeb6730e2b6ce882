use crate::flds::accessor::{DirectAccessor, FieldAccessor};
use crate::flds::field::{Field, IndexType};
use crate::flds::Geometry;
use crate::prtls::shape::Stencil;
use crate::Float;
use std::fmt;
use std::sync::Arc;

/// Field applied on top of the grid fields, e.g. a focusing magnet.
#[derive(Clone)]
pub enum ExternalField {
    None,
    Constant([Float; 3]),
    /// f(x, y, z, t)
    Function(Arc<dyn Fn(Float, Float, Float, Float) -> [Float; 3] + Send + Sync>),
}

impl Default for ExternalField {
    fn default() -> Self {
        ExternalField::None
    }
}

impl fmt::Debug for ExternalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalField::None => write!(f, "None"),
            ExternalField::Constant(v) => write!(f, "Constant({:?})", v),
            ExternalField::Function(_) => write!(f, "Function(..)"),
        }
    }
}

impl ExternalField {
    pub fn from_config(value: Option<[Float; 3]>) -> ExternalField {
        match value {
            Some(v) => ExternalField::Constant(v),
            None => ExternalField::None,
        }
    }

    #[inline(always)]
    pub fn add_to(&self, pos: [Float; 3], t: Float, fld: &mut [Float; 3]) {
        match self {
            ExternalField::None => {}
            ExternalField::Constant(v) => {
                fld[0] += v[0];
                fld[1] += v[1];
                fld[2] += v[2];
            }
            ExternalField::Function(f) => {
                let v = f(pos[0], pos[1], pos[2], t);
                fld[0] += v[0];
                fld[1] += v[1];
                fld[2] += v[2];
            }
        }
    }
}

/// Interpolate the six field components to `pos`, respecting the staggering
/// of each component.
#[inline(always)]
pub fn gather_fields(
    pos: [Float; 3],
    e: [&Field; 3],
    b: [&Field; 3],
    geom: &Geometry,
    nox: usize,
) -> ([Float; 3], [Float; 3]) {
    let st = Stencil::new(pos, geom, nox);
    let mut ep = [0.0; 3];
    let mut bp = [0.0; 3];
    for d in 0..3 {
        ep[d] = st.interpolate(&DirectAccessor::new(e[d]), e[d].ixtype());
        bp[d] = st.interpolate(&DirectAccessor::new(b[d]), b[d].ixtype());
    }
    (ep, bp)
}

/// Interpolate one component through any accessor.
pub fn gather_with<A: FieldAccessor>(
    pos: [Float; 3],
    acc: &A,
    ixtype: IndexType,
    geom: &Geometry,
    nox: usize,
) -> Float {
    Stencil::new(pos, geom, nox).interpolate(acc, ixtype)
}
