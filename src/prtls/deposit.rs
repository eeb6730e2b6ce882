use crate::flds::field::{Field, IndexBox};
use crate::flds::{Flds, Geometry};
use crate::prtls::pusher::lorentz_factor;
use crate::prtls::shape::Stencil;
use crate::prtls::tile::Tile;
use crate::Float;
use itertools::izip;

/// Tile-local current arrays. Each worker deposits into its own buffers;
/// they are summed into the level arrays afterwards.
pub struct DepositBuffers {
    pub j_x: Field,
    pub j_y: Field,
    pub j_z: Field,
}

impl DepositBuffers {
    /// Buffers over `tbox` grown by `ng` guard cells, with the staggering of
    /// the level arrays.
    pub fn new(tbox: IndexBox, flds: &Flds, ng: usize) -> DepositBuffers {
        DepositBuffers {
            j_x: Field::new("j_x_tile", tbox, flds.j_x.ixtype(), ng, 1),
            j_y: Field::new("j_y_tile", tbox, flds.j_y.ixtype(), ng, 1),
            j_z: Field::new("j_z_tile", tbox, flds.j_z.ixtype(), ng, 1),
        }
    }

    pub fn add_into(&self, flds: &mut Flds) {
        flds.j_x.add_from(&self.j_x);
        flds.j_y.add_from(&self.j_y);
        flds.j_z.add_from(&self.j_z);
    }
}

/// Direct current deposition. Positions are at the end of the step, the
/// current is deposited at the half step `x - 0.5 dt v`.
pub fn deposit_current(
    tile: &Tile,
    bufs: &mut DepositBuffers,
    geom: &Geometry,
    nox: usize,
    q: Float,
    dt: Float,
) {
    let invvol = 1.0 / geom.cell_volume();
    for (i, (x, y, z, ux, uy, uz, w)) in izip!(
        &tile.x, &tile.y, &tile.z, &tile.ux, &tile.uy, &tile.uz, &tile.w
    )
    .enumerate()
    {
        let gaminv = lorentz_factor([*ux, *uy, *uz]).powi(-1);
        let vx = ux * gaminv;
        let vy = uy * gaminv;
        let vz = uz * gaminv;
        let qp = match &tile.ion_lev {
            Some(lev) => q * lev[i] as Float,
            None => q,
        };
        let wq = qp * w * invvol;
        let pos = [x - 0.5 * dt * vx, y - 0.5 * dt * vy, z - 0.5 * dt * vz];
        let st = Stencil::new(pos, geom, nox);
        st.scatter(&mut bufs.j_x, wq * vx);
        st.scatter(&mut bufs.j_y, wq * vy);
        st.scatter(&mut bufs.j_z, wq * vz);
    }
}

/// Charge density at the current particle positions.
pub fn deposit_charge(tile: &Tile, rho: &mut Field, geom: &Geometry, nox: usize, q: Float) {
    let invvol = 1.0 / geom.cell_volume();
    for (i, (x, y, z, w)) in izip!(&tile.x, &tile.y, &tile.z, &tile.w).enumerate() {
        let qp = match &tile.ion_lev {
            Some(lev) => q * lev[i] as Float,
            None => q,
        };
        Stencil::new([*x, *y, *z], geom, nox).scatter(rho, qp * w * invvol);
    }
}
