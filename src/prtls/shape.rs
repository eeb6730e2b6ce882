use crate::flds::accessor::FieldAccessor;
use crate::flds::field::{Field, IndexType};
use crate::flds::Geometry;
use crate::Float;

/// B-spline shape factors of order 1, 2 and 3.
///
/// `xmid` is the particle position in units of the cell size, relative to
/// the index 0 point of the component. Fills `sx` with `order + 1`
/// weights and returns the index of the first point they apply to.
/// For order 2 this is the same 3-point stencil as
///
/// ```text
///   +-----+-----+-----+
///   | w0  | w1  | w2  |    w0 = 0.5 (0.5 - d)^2
///   +-----+-----+-----+    w1 = 0.75 - d^2
///          ^ prtl          w2 = 0.5 (0.5 + d)^2
/// ```
#[inline(always)]
pub fn compute_shape_factor(order: usize, sx: &mut [Float; 4], xmid: Float) -> i64 {
    match order {
        1 => {
            let j = xmid.floor();
            let xint = xmid - j;
            sx[0] = 1.0 - xint;
            sx[1] = xint;
            sx[2] = 0.0;
            sx[3] = 0.0;
            j as i64
        }
        2 => {
            let j = (xmid + 0.5).floor();
            let xint = xmid - j;
            sx[0] = 0.5 * (0.5 - xint) * (0.5 - xint);
            sx[1] = 0.75 - xint * xint;
            sx[2] = 0.5 * (0.5 + xint) * (0.5 + xint);
            sx[3] = 0.0;
            j as i64 - 1
        }
        3 => {
            let j = xmid.floor();
            let xint = xmid - j;
            let oxint = 1.0 - xint;
            sx[0] = 1.0 / 6.0 * oxint * oxint * oxint;
            sx[1] = 2.0 / 3.0 - xint * xint * (1.0 - 0.5 * xint);
            sx[2] = 2.0 / 3.0 - oxint * oxint * (1.0 - 0.5 * oxint);
            sx[3] = 1.0 / 6.0 * xint * xint * xint;
            j as i64 - 1
        }
        // validated in Sim::new
        _ => unreachable!("interpolation order {}", order),
    }
}

/// Shape factors of one particle for nodal and cell centered points, per
/// direction. Shared by the gather and the deposit.
pub struct Stencil {
    s_node: [[Float; 4]; 3],
    s_cell: [[Float; 4]; 3],
    j_node: [i64; 3],
    j_cell: [i64; 3],
    nox: usize,
}

impl Stencil {
    #[inline(always)]
    pub fn new(pos: [Float; 3], geom: &Geometry, nox: usize) -> Stencil {
        let mut st = Stencil {
            s_node: [[0.0; 4]; 3],
            s_cell: [[0.0; 4]; 3],
            j_node: [0; 3],
            j_cell: [0; 3],
            nox,
        };
        for d in 0..3 {
            let x = (pos[d] - geom.prob_lo[d]) / geom.dx[d];
            st.j_node[d] = compute_shape_factor(nox, &mut st.s_node[d], x);
            st.j_cell[d] = compute_shape_factor(nox, &mut st.s_cell[d], x - 0.5);
        }
        st
    }

    #[inline(always)]
    fn select(&self, ixtype: IndexType) -> ([&[Float; 4]; 3], [i64; 3]) {
        let mut s = [&self.s_cell[0], &self.s_cell[1], &self.s_cell[2]];
        let mut j0 = self.j_cell;
        for d in 0..3 {
            if ixtype.nodal[d] {
                s[d] = &self.s_node[d];
                j0[d] = self.j_node[d];
            }
        }
        (s, j0)
    }

    #[inline(always)]
    pub fn interpolate<A: FieldAccessor>(&self, acc: &A, ixtype: IndexType) -> Float {
        let ([sx, sy, sz], j0) = self.select(ixtype);
        let mut val = 0.0;
        for iz in 0..=self.nox {
            for iy in 0..=self.nox {
                let wyz = sy[iy] * sz[iz];
                for ix in 0..=self.nox {
                    val += sx[ix]
                        * wyz
                        * acc.at(
                            j0[0] + ix as i64,
                            j0[1] + iy as i64,
                            j0[2] + iz as i64,
                            0,
                        );
                }
            }
        }
        val
    }

    /// Spread `val` onto `fld` with the weights of its staggering.
    #[inline(always)]
    pub fn scatter(&self, fld: &mut Field, val: Float) {
        let ([sx, sy, sz], j0) = self.select(fld.ixtype());
        for iz in 0..=self.nox {
            for iy in 0..=self.nox {
                let wyz = sy[iy] * sz[iz] * val;
                for ix in 0..=self.nox {
                    *fld.get_mut(j0[0] + ix as i64, j0[1] + iy as i64, j0[2] + iz as i64, 0) +=
                        sx[ix] * wyz;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn weights_partition_unity() {
        let mut sx = [0.0; 4];
        for order in 1..=3 {
            for &x in &[0.0, 0.1, 0.49, 0.5, 0.51, 3.75, 7.999] {
                compute_shape_factor(order, &mut sx, x);
                assert_relative_eq!(sx.iter().sum::<Float>(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn linear_on_a_node_hits_only_that_node() {
        let mut sx = [0.0; 4];
        let j = compute_shape_factor(1, &mut sx, 3.0);
        assert_eq!(j, 3);
        assert_eq!(sx[0], 1.0);
        assert_eq!(sx[1], 0.0);
    }

    #[test]
    fn quadratic_centers_on_nearest_point() {
        let mut sx = [0.0; 4];
        let j = compute_shape_factor(2, &mut sx, 4.0);
        assert_eq!(j, 3);
        assert_relative_eq!(sx[1], 0.75);
        assert_relative_eq!(sx[0], sx[2]);
    }

    #[test]
    fn cubic_is_symmetric_at_midpoint() {
        let mut sx = [0.0; 4];
        let j = compute_shape_factor(3, &mut sx, 2.5);
        assert_eq!(j, 1);
        assert_relative_eq!(sx[0], sx[3], epsilon = 1e-14);
        assert_relative_eq!(sx[1], sx[2], epsilon = 1e-14);
    }
}
