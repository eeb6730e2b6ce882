use crate::error::{PicError, PicResult};
use crate::flds::field::{Field, IndexBox};
use crate::flds::{Flds, Geometry};
use crate::prtls::deposit::{deposit_charge, deposit_current, DepositBuffers};
use crate::prtls::gather::{gather_fields, ExternalField};
use crate::prtls::pusher::{update_position, Pusher};
use crate::prtls::rigid::InjectionStep;
use crate::prtls::species::PhysicalSpecies;
use crate::prtls::tile::{PrtlRecord, Tile};
use crate::{Float, Sim, SpeciesConfig, PRTL_CHUNK_SIZE};
use log::{debug, info, warn};
use rayon::prelude::*;

/// One particle species: its physical constants, its pusher and its
/// particles, stored as tiles per refinement level.
#[derive(Debug)]
pub struct Species {
    pub name: String,
    pub physical_species: PhysicalSpecies,
    pub charge: Float,
    pub mass: Float,
    pub pusher: Pusher,
    pub ext_e: ExternalField,
    pub ext_b: ExternalField,
    pub do_not_push: bool,
    pub do_not_deposit: bool,
    /// Initial ionization level; the per particle tag is only stored when set
    pub ionization_level: Option<i32>,
    /// tiles[lev][tile]
    pub tiles: Vec<Vec<Tile>>,
}

/// What the per particle loop needs from the species. Borrowed separately
/// from the tiles so the tiles can be handed out mutably.
#[derive(Clone, Copy)]
struct Kernel<'a> {
    q: Float,
    m: Float,
    pusher: Pusher,
    nox: usize,
    ext_e: &'a ExternalField,
    ext_b: &'a ExternalField,
}

impl<'a> Kernel<'a> {
    /// Gather, push and (optionally) move every particle of the tile.
    fn push_tile(
        &self,
        tile: &mut Tile,
        flds: &Flds,
        t: Float,
        dt: Float,
        injection: Option<&InjectionStep>,
        update_positions: bool,
    ) {
        let e = flds.e();
        let b = flds.b();
        let geom = &flds.geom;
        let q = self.q;
        let qs: Vec<Float> = match &tile.ion_lev {
            Some(lev) => lev.iter().map(|&l| q * l as Float).collect(),
            None => vec![q; tile.len()],
        };
        let (m, pusher, nox) = (self.m, self.pusher, self.nox);
        let (ext_e, ext_b) = (self.ext_e, self.ext_b);
        (
            &mut tile.x,
            &mut tile.y,
            &mut tile.z,
            &mut tile.ux,
            &mut tile.uy,
            &mut tile.uz,
            &qs,
        )
            .into_par_iter()
            .chunks(PRTL_CHUNK_SIZE)
            .for_each(|o| {
                o.into_iter().for_each(|(x, y, z, ux, uy, uz, qp)| {
                    let mut pos = [*x, *y, *z];
                    let (mut ep, mut bp) = gather_fields(pos, e, b, geom, nox);
                    ext_e.add_to(pos, t, &mut ep);
                    ext_b.add_to(pos, t, &mut bp);
                    if let Some(step) = injection {
                        step.scale_fields(*z, dt, &mut ep, &mut bp);
                    }
                    let mut u = [*ux, *uy, *uz];
                    pusher.update_momentum(&mut u, ep, bp, *qp, m, dt);
                    *ux = u[0];
                    *uy = u[1];
                    *uz = u[2];
                    if update_positions {
                        update_position(&mut pos, u, dt);
                        *x = pos[0];
                        *y = pos[1];
                        *z = pos[2];
                    }
                });
            });
    }
}

/// Boxes of the tiles covering the domain of a level, x index fastest.
pub fn tile_boxes(geom: &Geometry, tile_size: [usize; 3]) -> Vec<IndexBox> {
    let n_tiles = tiles_per_dim(geom, tile_size);
    let mut boxes = Vec::with_capacity(n_tiles[0] * n_tiles[1] * n_tiles[2]);
    for tk in 0..n_tiles[2] {
        for tj in 0..n_tiles[1] {
            for ti in 0..n_tiles[0] {
                let t = [ti, tj, tk];
                let mut lo = [0; 3];
                let mut hi = [0; 3];
                for d in 0..3 {
                    lo[d] = (t[d] * tile_size[d]) as i64;
                    hi[d] = (((t[d] + 1) * tile_size[d]).min(geom.n_cell[d]) - 1) as i64;
                }
                boxes.push(IndexBox::new(lo, hi));
            }
        }
    }
    boxes
}

fn tiles_per_dim(geom: &Geometry, tile_size: [usize; 3]) -> [usize; 3] {
    let mut n = [0; 3];
    for d in 0..3 {
        n[d] = (geom.n_cell[d] + tile_size[d] - 1) / tile_size[d];
    }
    n
}

/// Tile holding `cell`, `None` outside of the domain.
#[inline(always)]
pub fn tile_index(geom: &Geometry, tile_size: [usize; 3], cell: [i64; 3]) -> Option<usize> {
    if !geom.domain().contains(cell[0], cell[1], cell[2]) {
        return None;
    }
    let n = tiles_per_dim(geom, tile_size);
    let ti = cell[0] as usize / tile_size[0];
    let tj = cell[1] as usize / tile_size[1];
    let tk = cell[2] as usize / tile_size[2];
    Some(ti + n[0] * (tj + n[1] * tk))
}

#[cfg(feature = "periodic")]
fn wrap_periodic(p: &mut PrtlRecord, geom: &Geometry) {
    for d in 0..2 {
        let len = geom.prob_hi[d] - geom.prob_lo[d];
        p.pos[d] = geom.prob_lo[d] + (p.pos[d] - geom.prob_lo[d]).rem_euclid(len);
    }
}

#[cfg(not(feature = "periodic"))]
#[inline(always)]
fn wrap_periodic(_p: &mut PrtlRecord, _geom: &Geometry) {}

impl Species {
    pub fn new(sim: &Sim, cfg: &SpeciesConfig) -> PicResult<Species> {
        let physical_species = match &cfg.physical_species {
            Some(name) => name.parse::<PhysicalSpecies>()?,
            None => PhysicalSpecies::Unspecified,
        };
        // explicit values override the tabulated ones
        let charge = cfg
            .charge
            .or_else(|| physical_species.charge())
            .ok_or_else(|| PicError::UnspecifiedSpecies(cfg.name.clone()))?;
        let mass = cfg
            .mass
            .or_else(|| physical_species.mass())
            .ok_or_else(|| PicError::UnspecifiedSpecies(cfg.name.clone()))?;

        let species_err = |message: &str| PicError::Species {
            name: cfg.name.clone(),
            message: message.to_string(),
        };
        if mass < 0.0 {
            return Err(species_err("mass must not be negative"));
        }
        if mass == 0.0 && !cfg.do_not_push {
            return Err(species_err("massless species must set do_not_push"));
        }
        if cfg.do_classical_radiation_reaction && (charge == 0.0 || mass == 0.0) {
            return Err(species_err(
                "classical radiation reaction needs a charged massive species",
            ));
        }

        let with_ion_lev = cfg.ionization_level.is_some();
        let tiles = sim
            .geom
            .iter()
            .map(|geom| {
                tile_boxes(geom, sim.tile_size)
                    .into_iter()
                    .map(|tbox| Tile::new(tbox, with_ion_lev))
                    .collect()
            })
            .collect();

        debug!(
            "species {}: q = {:e} C, m = {:e} kg",
            cfg.name, charge, mass
        );
        Ok(Species {
            name: cfg.name.clone(),
            physical_species,
            charge,
            mass,
            pusher: Pusher::select(sim.pusher_algo, cfg.do_classical_radiation_reaction),
            ext_e: ExternalField::from_config(cfg.external_e),
            ext_b: ExternalField::from_config(cfg.external_b),
            do_not_push: cfg.do_not_push,
            do_not_deposit: cfg.do_not_deposit,
            ionization_level: cfg.ionization_level,
            tiles,
        })
    }

    pub fn num_particles(&self) -> usize {
        self.tiles.iter().flatten().map(|t| t.len()).sum()
    }

    pub fn num_particles_lev(&self, lev: usize) -> usize {
        self.tiles[lev].iter().map(|t| t.len()).sum()
    }

    /// Put new particles into the tiles of `lev`. Particles outside of the
    /// domain are dropped. Returns the number kept.
    pub fn add_particles(&mut self, sim: &Sim, lev: usize, prtls: Vec<PrtlRecord>) -> usize {
        let geom = &sim.geom[lev];
        let ion_lev = self.ionization_level;
        let n = prtls.len();
        let mut kept = 0;
        for mut p in prtls {
            if p.ion_lev.is_none() {
                p.ion_lev = ion_lev;
            }
            if let Some(it) = tile_index(geom, sim.tile_size, geom.cell_index(p.pos)) {
                self.tiles[lev][it].push(p);
                kept += 1;
            }
        }
        if kept < n {
            warn!(
                "{}: {} of {} particles outside of level {} were dropped",
                self.name,
                n - kept,
                n,
                lev
            );
        }
        kept
    }

    /// Move particles that left their tile into the tile that now holds
    /// them. Particles outside of the domain are removed, except across the
    /// x and y boundaries with the `periodic` feature. Returns the number of
    /// particles removed.
    pub fn redistribute(&mut self, sim: &Sim, lev: usize) -> usize {
        let geom = &sim.geom[lev];
        let movers: Vec<Vec<PrtlRecord>> = self.tiles[lev]
            .par_iter_mut()
            .map(|tile| {
                let tbox = tile.tbox;
                let flags: Vec<bool> = (0..tile.len())
                    .map(|i| {
                        let c = geom.cell_index(tile.position(i));
                        !tbox.contains(c[0], c[1], c[2])
                    })
                    .collect();
                let out = flags
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| **f)
                    .map(|(i, _)| tile.record(i))
                    .collect();
                tile.remove_flagged(&flags);
                out
            })
            .collect();

        let mut lost = 0;
        for mut p in movers.into_iter().flatten() {
            wrap_periodic(&mut p, geom);
            match tile_index(geom, sim.tile_size, geom.cell_index(p.pos)) {
                Some(it) => self.tiles[lev][it].push(p),
                None => lost += 1,
            }
        }
        if lost > 0 {
            debug!("{}: {} particles left level {}", self.name, lost, lev);
        }
        lost
    }

    /// Gather, push, move and deposit every particle of level `lev`.
    ///
    /// While `injection` is set, each tile is snapshotted before the push
    /// and the particles behind the injection plane are restored after it.
    #[allow(clippy::too_many_arguments)]
    pub fn evolve(
        &mut self,
        sim: &Sim,
        lev: usize,
        flds: &mut Flds,
        t: Float,
        dt: Float,
        skip_deposition: bool,
        injection: Option<&InjectionStep>,
    ) {
        let deposit = !skip_deposition && !self.do_not_deposit;
        let push = !self.do_not_push;
        let kernel = Kernel {
            q: self.charge,
            m: self.mass,
            pusher: self.pusher,
            nox: sim.nox,
            ext_e: &self.ext_e,
            ext_b: &self.ext_b,
        };
        let ng = sim.n_guard();
        let nox = sim.nox;
        let q = self.charge;
        let bufs: Vec<Option<DepositBuffers>> = {
            let flds: &Flds = flds;
            self.tiles[lev]
                .par_iter_mut()
                .map(|tile| {
                    if push {
                        let snapshot = injection.map(|_| tile.snapshot());
                        kernel.push_tile(tile, flds, t, dt, injection, true);
                        if let (Some(step), Some(snap)) = (injection, snapshot.as_ref()) {
                            step.restore(tile, snap, dt);
                        }
                    }
                    if deposit && !tile.is_empty() {
                        let mut b = DepositBuffers::new(tile.tbox, flds, ng);
                        deposit_current(tile, &mut b, &flds.geom, nox, q, dt);
                        Some(b)
                    } else {
                        None
                    }
                })
                .collect()
        };
        // tile order, so the sums do not depend on scheduling
        for b in bufs.iter().flatten() {
            b.add_into(flds);
        }
    }

    /// Momentum only push, used to bring u and x back in sync in time.
    /// With `injection`, momenta of particles behind the plane are kept.
    pub fn push_p(
        &mut self,
        sim: &Sim,
        lev: usize,
        flds: &Flds,
        t: Float,
        dt: Float,
        injection: Option<&InjectionStep>,
    ) {
        if self.do_not_push {
            return;
        }
        let kernel = Kernel {
            q: self.charge,
            m: self.mass,
            pusher: self.pusher,
            nox: sim.nox,
            ext_e: &self.ext_e,
            ext_b: &self.ext_b,
        };
        self.tiles[lev].par_iter_mut().for_each(|tile| {
            let snapshot = injection.map(|_| tile.snapshot());
            kernel.push_tile(tile, flds, t, dt, None, false);
            if let (Some(step), Some(snap)) = (injection, snapshot.as_ref()) {
                step.restore_momenta(tile, snap);
            }
        });
    }

    /// Charge density of the species on `lev`, added to `flds.rho`.
    pub fn deposit_charge(&self, sim: &Sim, lev: usize, flds: &mut Flds) {
        if self.do_not_deposit {
            return;
        }
        let ng = sim.n_guard();
        let nox = sim.nox;
        let q = self.charge;
        let bufs: Vec<Field> = {
            let flds: &Flds = flds;
            self.tiles[lev]
                .par_iter()
                .filter(|tile| !tile.is_empty())
                .map(|tile| {
                    let mut rho = Field::new("rho_tile", tile.tbox, flds.rho.ixtype(), ng, 1);
                    deposit_charge(tile, &mut rho, &flds.geom, nox, q);
                    rho
                })
                .collect()
        };
        for rho in &bufs {
            flds.rho.add_from(rho);
        }
    }

    /// Unweighted mean of u/gamma over all particles of all levels.
    /// Zero for an empty container.
    pub fn mean_particle_velocity(&self) -> [Float; 3] {
        let (sum, n) = self
            .tiles
            .par_iter()
            .flat_map(|lev| lev.par_iter())
            .map(|tile| tile.velocity_sum())
            .reduce(
                || ([0.0; 3], 0),
                |(a, na), (b, nb)| ([a[0] + b[0], a[1] + b[1], a[2] + b[2]], na + nb),
            );
        if n == 0 {
            return [0.0; 3];
        }
        let inv = 1.0 / n as Float;
        [sum[0] * inv, sum[1] * inv, sum[2] * inv]
    }

    /// Every particle of a level in tile order.
    pub fn records(&self, lev: usize) -> Vec<PrtlRecord> {
        self.tiles[lev]
            .iter()
            .flat_map(|tile| (0..tile.len()).map(move |i| tile.record(i)))
            .collect()
    }

    pub fn log_summary(&self) {
        info!(
            "{} ({}): {} particles, pusher {:?}",
            self.name,
            self.physical_species,
            self.num_particles(),
            self.pusher
        );
    }
}
