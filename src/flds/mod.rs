use crate::{Float, GridType, Sim};
use log::debug;

pub mod accessor;
pub mod field;
use crate::flds::field::{Field, IndexBox, IndexType};

/// Physical extent and resolution of one refinement level.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub n_cell: [usize; 3],
    pub prob_lo: [Float; 3],
    pub prob_hi: [Float; 3],
    pub dx: [Float; 3],
}

impl Geometry {
    pub fn new(n_cell: [usize; 3], prob_lo: [Float; 3], prob_hi: [Float; 3]) -> Geometry {
        let mut dx = [0.0; 3];
        for d in 0..3 {
            dx[d] = (prob_hi[d] - prob_lo[d]) / n_cell[d] as Float;
        }
        Geometry {
            n_cell,
            prob_lo,
            prob_hi,
            dx,
        }
    }

    /// Same physical domain with `ratio` times more cells.
    pub fn refine(&self, ratio: usize) -> Geometry {
        Geometry::new(
            [
                self.n_cell[0] * ratio,
                self.n_cell[1] * ratio,
                self.n_cell[2] * ratio,
            ],
            self.prob_lo,
            self.prob_hi,
        )
    }

    pub fn domain(&self) -> IndexBox {
        IndexBox::from_cells(self.n_cell)
    }

    /// Index of the cell containing `pos`. May be outside of the domain.
    #[inline(always)]
    pub fn cell_index(&self, pos: [Float; 3]) -> [i64; 3] {
        [
            ((pos[0] - self.prob_lo[0]) / self.dx[0]).floor() as i64,
            ((pos[1] - self.prob_lo[1]) / self.dx[1]).floor() as i64,
            ((pos[2] - self.prob_lo[2]) / self.dx[2]).floor() as i64,
        ]
    }

    pub fn cell_volume(&self) -> Float {
        self.dx[0] * self.dx[1] * self.dx[2]
    }
}

pub struct Flds {
    // The struct that holds all the fields of one level.
    pub geom: Geometry,
    pub e_x: Field,
    pub e_y: Field,
    pub e_z: Field,
    pub b_x: Field,
    pub b_y: Field,
    pub b_z: Field,
    pub j_x: Field,
    pub j_y: Field,
    pub j_z: Field,
    pub rho: Field,
}

impl Flds {
    pub fn new(sim: &Sim, lev: usize) -> Flds {
        let geom = sim.geom[lev].clone();
        let cells = geom.domain();
        let ng = sim.n_guard();
        let (e_type, b_type): ([IndexType; 3], [IndexType; 3]) = match sim.grid_type {
            GridType::Staggered => (
                [IndexType::yee_e(0), IndexType::yee_e(1), IndexType::yee_e(2)],
                [IndexType::yee_b(0), IndexType::yee_b(1), IndexType::yee_b(2)],
            ),
            GridType::Nodal => ([IndexType::nodal(); 3], [IndexType::nodal(); 3]),
        };
        let mut f = Flds {
            geom,
            e_x: Field::new("e_x", cells, e_type[0], ng, 1),
            e_y: Field::new("e_y", cells, e_type[1], ng, 1),
            e_z: Field::new("e_z", cells, e_type[2], ng, 1),
            b_x: Field::new("b_x", cells, b_type[0], ng, 1),
            b_y: Field::new("b_y", cells, b_type[1], ng, 1),
            b_z: Field::new("b_z", cells, b_type[2], ng, 1),
            // J shares the staggering of E
            j_x: Field::new("j_x", cells, e_type[0], ng, 1),
            j_y: Field::new("j_y", cells, e_type[1], ng, 1),
            j_z: Field::new("j_z", cells, e_type[2], ng, 1),
            rho: Field::new("rho", cells, IndexType::nodal(), ng, 1),
        };
        f.set_uniform(sim.e0, sim.b0);
        debug!(
            "level {} fields allocated: {:?} cells, {} guard cells",
            lev, f.geom.n_cell, ng
        );
        f
    }

    /// Fill E and B, ghost cells included, with uniform values.
    pub fn set_uniform(&mut self, e0: [Float; 3], b0: [Float; 3]) {
        self.e_x.fill(e0[0]);
        self.e_y.fill(e0[1]);
        self.e_z.fill(e0[2]);
        self.b_x.fill(b0[0]);
        self.b_y.fill(b0[1]);
        self.b_z.fill(b0[2]);
    }

    pub fn zero_currents(&mut self) {
        for fld in &mut [&mut self.j_x, &mut self.j_y, &mut self.j_z, &mut self.rho] {
            fld.fill(0.0);
        }
    }

    pub fn e(&self) -> [&Field; 3] {
        [&self.e_x, &self.e_y, &self.e_z]
    }

    pub fn b(&self) -> [&Field; 3] {
        [&self.b_x, &self.b_y, &self.b_z]
    }
}

/// Maxwell solver seam. The particle kernel only hands over the deposited
/// currents and reads back E and B.
pub trait FieldSolver {
    fn evolve(&mut self, sim: &Sim, flds: &mut [Flds], dt: Float);
}

/// Leaves E and B untouched: test particles in applied fields.
pub struct FrozenFields;

impl FieldSolver for FrozenFields {
    fn evolve(&mut self, _sim: &Sim, _flds: &mut [Flds], _dt: Float) {}
}
