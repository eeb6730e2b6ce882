use crate::flds::field::IndexBox;
use crate::Float;
use itertools::izip;

/// Structure-of-arrays storage for the particles of one tile. Particles are
/// addressed by their slot index; adding appends, removing compacts.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Cells owned by this tile
    pub tbox: IndexBox,
    pub x: Vec<Float>,
    pub y: Vec<Float>,
    pub z: Vec<Float>,
    pub ux: Vec<Float>,
    pub uy: Vec<Float>,
    pub uz: Vec<Float>,
    pub w: Vec<Float>,
    /// Ionization level, only allocated when field ionization is on
    pub ion_lev: Option<Vec<i32>>,
}

/// A single particle, used when moving particles between tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrtlRecord {
    pub pos: [Float; 3],
    pub u: [Float; 3],
    pub w: Float,
    pub ion_lev: Option<i32>,
}

/// Copy of positions and momenta taken before a push.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub x: Vec<Float>,
    pub y: Vec<Float>,
    pub z: Vec<Float>,
    pub ux: Vec<Float>,
    pub uy: Vec<Float>,
    pub uz: Vec<Float>,
}

impl Tile {
    pub fn new(tbox: IndexBox, with_ion_lev: bool) -> Tile {
        Tile {
            tbox,
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            ux: Vec::new(),
            uy: Vec::new(),
            uz: Vec::new(),
            w: Vec::new(),
            ion_lev: if with_ion_lev { Some(Vec::new()) } else { None },
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[inline(always)]
    pub fn position(&self, i: usize) -> [Float; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }

    #[inline(always)]
    pub fn set_position(&mut self, i: usize, pos: [Float; 3]) {
        self.x[i] = pos[0];
        self.y[i] = pos[1];
        self.z[i] = pos[2];
    }

    #[inline(always)]
    pub fn momentum(&self, i: usize) -> [Float; 3] {
        [self.ux[i], self.uy[i], self.uz[i]]
    }

    #[inline(always)]
    pub fn set_momentum(&mut self, i: usize, u: [Float; 3]) {
        self.ux[i] = u[0];
        self.uy[i] = u[1];
        self.uz[i] = u[2];
    }

    pub fn record(&self, i: usize) -> PrtlRecord {
        PrtlRecord {
            pos: self.position(i),
            u: self.momentum(i),
            w: self.w[i],
            ion_lev: self.ion_lev.as_ref().map(|lev| lev[i]),
        }
    }

    pub fn push(&mut self, p: PrtlRecord) {
        self.x.push(p.pos[0]);
        self.y.push(p.pos[1]);
        self.z.push(p.pos[2]);
        self.ux.push(p.u[0]);
        self.uy.push(p.u[1]);
        self.uz.push(p.u[2]);
        self.w.push(p.w);
        if let Some(lev) = self.ion_lev.as_mut() {
            lev.push(p.ion_lev.unwrap_or(0));
        }
    }

    /// Drop the particles whose flag is set, keeping the order of the rest.
    pub fn remove_flagged(&mut self, flags: &[bool]) {
        assert_eq!(flags.len(), self.len());
        fn compact<T: Copy>(v: &mut Vec<T>, flags: &[bool]) {
            let mut keep = 0;
            for i in 0..v.len() {
                if !flags[i] {
                    v[keep] = v[i];
                    keep += 1;
                }
            }
            v.truncate(keep);
        }
        compact(&mut self.x, flags);
        compact(&mut self.y, flags);
        compact(&mut self.z, flags);
        compact(&mut self.ux, flags);
        compact(&mut self.uy, flags);
        compact(&mut self.uz, flags);
        compact(&mut self.w, flags);
        if let Some(lev) = self.ion_lev.as_mut() {
            compact(lev, flags);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
            ux: self.ux.clone(),
            uy: self.uy.clone(),
            uz: self.uz.clone(),
        }
    }

    /// Sum of u/gamma over the tile, and the particle count.
    pub fn velocity_sum(&self) -> ([Float; 3], usize) {
        let mut sum = [0.0; 3];
        for (ux, uy, uz) in izip!(&self.ux, &self.uy, &self.uz) {
            let gi = crate::prtls::pusher::lorentz_factor([*ux, *uy, *uz]).powi(-1);
            sum[0] += ux * gi;
            sum[1] += uy * gi;
            sum[2] += uz * gi;
        }
        (sum, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prtl(z: Float) -> PrtlRecord {
        PrtlRecord {
            pos: [0.0, 0.0, z],
            u: [0.0, 0.0, z * 10.0],
            w: 1.0,
            ion_lev: Some(2),
        }
    }

    #[test]
    fn compaction_keeps_order() {
        let mut t = Tile::new(IndexBox::from_cells([1, 1, 1]), true);
        for z in 0..5 {
            t.push(prtl(z as Float));
        }
        t.remove_flagged(&[false, true, false, true, false]);
        assert_eq!(t.z, vec![0.0, 2.0, 4.0]);
        assert_eq!(t.uz, vec![0.0, 20.0, 40.0]);
        assert_eq!(t.ion_lev.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn snapshot_is_an_independent_copy() {
        let mut t = Tile::new(IndexBox::from_cells([1, 1, 1]), false);
        t.push(prtl(1.0));
        let snap = t.snapshot();
        t.set_position(0, [5.0, 5.0, 5.0]);
        assert_eq!(snap.z[0], 1.0);
        assert_eq!(t.position(0), [5.0, 5.0, 5.0]);
    }
}
