//! Rigid injection of a beam in a boosted frame simulation.
//!
//! A beam defined in the lab frame is not in its lab frame state yet when
//! the simulation starts in the boosted frame. Particles behind the
//! injection plane, which moves at -beta_boost * c in the boosted frame,
//! are held: momentum, x and y keep their values from before the push, and
//! z either stays put or, with rigid advance, moves with the mean beam
//! velocity. Once the plane has left the domain every particle is live and
//! the species behaves like any other.

use crate::boost::BoostedFrame;
use crate::consts::INV_C2;
use crate::error::PicResult;
use crate::flds::Flds;
use crate::prtls::container::Species;
use crate::prtls::pusher::lorentz_factor;
use crate::prtls::tile::{PrtlRecord, Snapshot, Tile};
use crate::{Float, Sim, SpeciesConfig};
use itertools::izip;
use log::{debug, info};
use rayon::prelude::*;

/// Position of the injection plane of one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InjectionPlane {
    pub z: Float,
    pub z_previous: Float,
    /// Set once the plane has left the domain, never cleared.
    pub done: bool,
}

impl InjectionPlane {
    /// Plane at `zinject_plane_lab` in the lab at t_lab = 0, seen in the
    /// boosted frame.
    pub fn new(zinject_plane_lab: Float, boost: &BoostedFrame) -> InjectionPlane {
        let z = boost.z_to_boosted(zinject_plane_lab);
        InjectionPlane {
            z,
            z_previous: z,
            done: false,
        }
    }

    /// Move the plane by one step and update the done flag.
    ///
    /// The flag looks at the plane against the domain bounds and the drift
    /// of the domain, not at the particles.
    pub fn advance(
        &mut self,
        dt: Float,
        boost: &BoostedFrame,
        moving_window_v: Float,
        prob_lo_z: Float,
        prob_hi_z: Float,
    ) {
        self.z_previous = self.z;
        self.z -= dt * boost.v_boost();
        if !self.done {
            let drift = moving_window_v + boost.v_boost();
            self.done = (self.z < prob_lo_z && drift >= 0.0) || (self.z > prob_hi_z && drift <= 0.0);
        }
    }
}

/// Everything the particle loop needs while a level is still injecting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InjectionStep {
    pub z_plane: Float,
    pub z_plane_previous: Float,
    pub vzbeam_ave_boosted: Float,
    pub v_boost: Float,
    pub rigid_advance: bool,
}

impl InjectionStep {
    /// Scale the fields seen by a particle at `zp` (position before the
    /// push) by the fraction of the step it spends past the plane.
    #[inline(always)]
    pub fn scale_fields(&self, zp: Float, dt: Float, e: &mut [Float; 3], b: &mut [Float; 3]) {
        let v = self.vzbeam_ave_boosted + self.v_boost;
        if v == 0.0 || dt == 0.0 {
            return;
        }
        let dtscale = 1.0 - (self.z_plane_previous - zp) / v / dt;
        if 0.0 < dtscale && dtscale < 1.0 {
            for d in 0..3 {
                e[d] *= dtscale;
                b[d] *= dtscale;
            }
        }
    }

    /// Undo the push for the particles still behind the plane. Their z is
    /// put back, or advanced with the mean beam velocity for a rigid advance.
    pub fn restore(&self, tile: &mut Tile, snap: &Snapshot, dt: Float) {
        let z_plane = self.z_plane;
        let dz = if self.rigid_advance {
            dt * self.vzbeam_ave_boosted
        } else {
            0.0
        };
        for (x, y, z, ux, uy, uz, x_save, y_save, z_save, ux_save, uy_save, uz_save) in izip!(
            &mut tile.x,
            &mut tile.y,
            &mut tile.z,
            &mut tile.ux,
            &mut tile.uy,
            &mut tile.uz,
            &snap.x,
            &snap.y,
            &snap.z,
            &snap.ux,
            &snap.uy,
            &snap.uz
        ) {
            if *z <= z_plane {
                *ux = *ux_save;
                *uy = *uy_save;
                *uz = *uz_save;
                *x = *x_save;
                *y = *y_save;
                *z = *z_save + dz;
            }
        }
    }

    /// Momentum only version of `restore`.
    pub fn restore_momenta(&self, tile: &mut Tile, snap: &Snapshot) {
        let z_plane = self.z_plane;
        for (z, ux, uy, uz, ux_save, uy_save, uz_save) in izip!(
            &tile.z,
            &mut tile.ux,
            &mut tile.uy,
            &mut tile.uz,
            &snap.ux,
            &snap.uy,
            &snap.uz
        ) {
            if *z <= z_plane {
                *ux = *ux_save;
                *uy = *uy_save;
                *uz = *uz_save;
            }
        }
    }
}

/// A species whose particles are held back until the injection plane
/// passes them.
#[derive(Debug)]
pub struct RigidInjectedSpecies {
    pub species: Species,
    /// Lab frame position of the plane at t_lab = 0
    pub zinject_plane: Float,
    pub rigid_advance: bool,
    /// Mean longitudinal velocity of the beam at initialization
    pub vzbeam_ave_boosted: Float,
    planes: Vec<InjectionPlane>,
}

impl RigidInjectedSpecies {
    pub fn new(
        sim: &Sim,
        cfg: &SpeciesConfig,
        zinject_plane: Float,
    ) -> PicResult<RigidInjectedSpecies> {
        let species = Species::new(sim, cfg)?;
        let plane = InjectionPlane::new(zinject_plane, &sim.boost);
        Ok(RigidInjectedSpecies {
            species,
            zinject_plane,
            rigid_advance: cfg.rigid_advance,
            vzbeam_ave_boosted: 0.0,
            planes: vec![plane; sim.geom.len()],
        })
    }

    /// Add the initial particles (already in the boosted frame) on level 0,
    /// take the beam mean velocity and remap for a rigid advance.
    pub fn init_data(&mut self, sim: &Sim, prtls: Vec<PrtlRecord>) {
        let n = self.species.add_particles(sim, 0, prtls);
        self.vzbeam_ave_boosted = self.species.mean_particle_velocity()[2];
        if self.rigid_advance {
            self.remap_particles(&sim.boost);
        }
        self.species.redistribute(sim, 0);
        info!(
            "{}: {} particles behind the injection plane at z = {:e}, <vz> = {:e}",
            self.species.name, n, self.planes[0].z, self.vzbeam_ave_boosted
        );
    }

    /// Shift z from "advanced with its own vz" to "advanced with the beam
    /// mean vz" since t_lab = 0.
    pub fn remap_particles(&mut self, boost: &BoostedFrame) {
        let uz_boost = boost.uz_boost();
        let gamma_boost = boost.gamma_boost;
        let vz_ave = self.vzbeam_ave_boosted;
        self.species
            .tiles
            .par_iter_mut()
            .flat_map(|lev| lev.par_iter_mut())
            .for_each(|tile| {
                for (z, ux, uy, uz) in izip!(&mut tile.z, &tile.ux, &tile.uy, &tile.uz) {
                    let vzpr = uz / lorentz_factor([*ux, *uy, *uz]);
                    let z_lab = *z / (gamma_boost + uz_boost * vzpr * INV_C2);
                    let tpr = -uz_boost * z_lab * INV_C2;
                    *z += tpr * vzpr - tpr * vz_ave;
                }
            });
    }

    fn step(&self, sim: &Sim, lev: usize) -> Option<InjectionStep> {
        let plane = &self.planes[lev];
        if plane.done {
            return None;
        }
        Some(InjectionStep {
            z_plane: plane.z,
            z_plane_previous: plane.z_previous,
            vzbeam_ave_boosted: self.vzbeam_ave_boosted,
            v_boost: sim.boost.v_boost(),
            rigid_advance: self.rigid_advance,
        })
    }

    /// Advance the plane of `lev`, then run the generic cycle with the
    /// particles behind the plane held back.
    pub fn evolve(
        &mut self,
        sim: &Sim,
        lev: usize,
        flds: &mut Flds,
        t: Float,
        dt: Float,
        skip_deposition: bool,
    ) {
        let geom = &sim.geom[lev];
        let was_done = self.planes[lev].done;
        self.planes[lev].advance(
            dt,
            &sim.boost,
            sim.moving_window_v,
            geom.prob_lo[2],
            geom.prob_hi[2],
        );
        if self.planes[lev].done && !was_done {
            debug!(
                "{}: injection done on level {} (plane at z = {:e})",
                self.species.name, lev, self.planes[lev].z
            );
        }
        let step = self.step(sim, lev);
        self.species
            .evolve(sim, lev, flds, t, dt, skip_deposition, step.as_ref());
    }

    /// Momentum only push. Particles behind the plane keep their momenta;
    /// they are not expected to cross the plane during this call.
    pub fn push_p(&mut self, sim: &Sim, lev: usize, flds: &Flds, t: Float, dt: Float) {
        let step = self.step(sim, lev);
        self.species.push_p(sim, lev, flds, t, dt, step.as_ref());
    }

    pub fn done_injecting(&self, lev: usize) -> bool {
        self.planes[lev].done
    }

    pub fn plane(&self, lev: usize) -> &InjectionPlane {
        &self.planes[lev]
    }
}
