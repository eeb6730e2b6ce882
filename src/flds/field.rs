use crate::Float;

/// Inclusive box of (signed) cell or node indices. Ghost cells live at
/// negative indices or past the domain end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBox {
    pub lo: [i64; 3],
    pub hi: [i64; 3],
}

impl IndexBox {
    pub fn new(lo: [i64; 3], hi: [i64; 3]) -> IndexBox {
        IndexBox { lo, hi }
    }

    /// Box of cells `0..n` in every direction.
    pub fn from_cells(n_cell: [usize; 3]) -> IndexBox {
        IndexBox {
            lo: [0; 3],
            hi: [
                n_cell[0] as i64 - 1,
                n_cell[1] as i64 - 1,
                n_cell[2] as i64 - 1,
            ],
        }
    }

    pub fn grow(&self, ng: i64) -> IndexBox {
        IndexBox {
            lo: [self.lo[0] - ng, self.lo[1] - ng, self.lo[2] - ng],
            hi: [self.hi[0] + ng, self.hi[1] + ng, self.hi[2] + ng],
        }
    }

    /// Convert a cell-centered box into the box of the given index type:
    /// nodal directions get one more point.
    pub fn convert(&self, ixtype: IndexType) -> IndexBox {
        let mut b = *self;
        for d in 0..3 {
            if ixtype.nodal[d] {
                b.hi[d] += 1;
            }
        }
        b
    }

    #[inline(always)]
    pub fn len(&self, d: usize) -> usize {
        (self.hi[d] - self.lo[d] + 1).max(0) as usize
    }

    pub fn num_pts(&self) -> usize {
        self.len(0) * self.len(1) * self.len(2)
    }

    pub fn is_empty(&self) -> bool {
        self.num_pts() == 0
    }

    #[inline(always)]
    pub fn contains(&self, i: i64, j: i64, k: i64) -> bool {
        i >= self.lo[0]
            && i <= self.hi[0]
            && j >= self.lo[1]
            && j <= self.hi[1]
            && k >= self.lo[2]
            && k <= self.hi[2]
    }

    pub fn intersect(&self, other: &IndexBox) -> IndexBox {
        IndexBox {
            lo: [
                self.lo[0].max(other.lo[0]),
                self.lo[1].max(other.lo[1]),
                self.lo[2].max(other.lo[2]),
            ],
            hi: [
                self.hi[0].min(other.hi[0]),
                self.hi[1].min(other.hi[1]),
                self.hi[2].min(other.hi[2]),
            ],
        }
    }
}

/// Staggering of a field component: `nodal[d]` is true when the component
/// lives on the cell faces/edges/nodes along `d`, false when cell centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexType {
    pub nodal: [bool; 3],
}

impl IndexType {
    pub fn nodal() -> IndexType {
        IndexType { nodal: [true; 3] }
    }

    pub fn cell() -> IndexType {
        IndexType { nodal: [false; 3] }
    }

    /// Yee staggering of E (and J) along `dir`: cell centered along `dir`,
    /// nodal elsewhere.
    pub fn yee_e(dir: usize) -> IndexType {
        let mut nodal = [true; 3];
        nodal[dir] = false;
        IndexType { nodal }
    }

    /// Yee staggering of B along `dir`: nodal along `dir`, cell centered
    /// elsewhere.
    pub fn yee_b(dir: usize) -> IndexType {
        let mut nodal = [false; 3];
        nodal[dir] = true;
        IndexType { nodal }
    }

    /// 1 for nodal, 0 for cell centered.
    #[inline(always)]
    pub fn stag(&self) -> [i32; 3] {
        [
            self.nodal[0] as i32,
            self.nodal[1] as i32,
            self.nodal[2] as i32,
        ]
    }
}

/// A multi-component grid array over `fbox` (ghost cells included).
/// Data are stored with x fastest, then y, z and component.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub data: Vec<Float>,
    fbox: IndexBox,
    ixtype: IndexType,
    ncomp: usize,
    ngrow: i64,
}

impl Field {
    /// Array over the cell box `cells` converted to `ixtype` and grown by
    /// `ngrow` ghost cells.
    pub fn new(name: &str, cells: IndexBox, ixtype: IndexType, ngrow: usize, ncomp: usize) -> Field {
        let fbox = cells.convert(ixtype).grow(ngrow as i64);
        Field {
            name: name.to_string(),
            data: vec![0.0; fbox.num_pts() * ncomp],
            fbox,
            ixtype,
            ncomp,
            ngrow: ngrow as i64,
        }
    }

    #[inline(always)]
    pub fn fbox(&self) -> &IndexBox {
        &self.fbox
    }

    #[inline(always)]
    pub fn ixtype(&self) -> IndexType {
        self.ixtype
    }

    pub fn ncomp(&self) -> usize {
        self.ncomp
    }

    pub fn ngrow(&self) -> i64 {
        self.ngrow
    }

    #[inline(always)]
    pub fn index(&self, i: i64, j: i64, k: i64, n: usize) -> usize {
        if !cfg!(feature = "unchecked") {
            assert!(
                self.fbox.contains(i, j, k) && n < self.ncomp,
                "({}, {}, {}, {}) outside of {} box {:?}",
                i,
                j,
                k,
                n,
                self.name,
                self.fbox
            );
        }
        let nx = self.fbox.len(0);
        let ny = self.fbox.len(1);
        let nz = self.fbox.len(2);
        let ii = (i - self.fbox.lo[0]) as usize;
        let jj = (j - self.fbox.lo[1]) as usize;
        let kk = (k - self.fbox.lo[2]) as usize;
        ((n * nz + kk) * ny + jj) * nx + ii
    }

    #[inline(always)]
    pub fn get(&self, i: i64, j: i64, k: i64, n: usize) -> Float {
        self.data[self.index(i, j, k, n)]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, i: i64, j: i64, k: i64, n: usize) -> &mut Float {
        let idx = self.index(i, j, k, n);
        &mut self.data[idx]
    }

    pub fn fill(&mut self, val: Float) {
        for v in self.data.iter_mut() {
            *v = val;
        }
    }

    /// Accumulate the overlapping region of `other` into `self`. Both
    /// arrays must share the index type and number of components.
    pub fn add_from(&mut self, other: &Field) {
        assert_eq!(self.ixtype, other.ixtype);
        assert_eq!(self.ncomp, other.ncomp);
        let overlap = self.fbox.intersect(&other.fbox);
        if overlap.is_empty() {
            return;
        }
        for n in 0..self.ncomp {
            for k in overlap.lo[2]..=overlap.hi[2] {
                for j in overlap.lo[1]..=overlap.hi[1] {
                    for i in overlap.lo[0]..=overlap.hi[0] {
                        *self.get_mut(i, j, k, n) += other.get(i, j, k, n);
                    }
                }
            }
        }
    }

    /// Values in the valid (non ghost) region, x fastest. Used for output.
    pub fn valid_values(&self, n: usize) -> Vec<Float> {
        let vbox = self.fbox.grow(-self.ngrow);
        let mut out = Vec::with_capacity(vbox.num_pts());
        for k in vbox.lo[2]..=vbox.hi[2] {
            for j in vbox.lo[1]..=vbox.hi[1] {
                let start = self.index(vbox.lo[0], j, k, n);
                out.extend_from_slice(&self.data[start..start + vbox.len(0)]);
            }
        }
        out
    }
}
