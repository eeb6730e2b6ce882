pub mod container;
pub mod deposit;
pub mod gather;
pub mod init;
pub mod pusher;
pub mod rigid;
pub mod shape;
pub mod species;
pub mod tile;

use crate::error::PicResult;
use crate::flds::Flds;
use crate::{Float, Sim, SpeciesConfig};
use container::Species;
use rand::Rng;
use rigid::RigidInjectedSpecies;

/// A species as driven by the time loop: either plain, or held behind an
/// injection plane until it becomes live.
#[derive(Debug)]
pub enum ParticleContainer {
    Physical(Species),
    RigidInjected(RigidInjectedSpecies),
}

impl ParticleContainer {
    /// Build the species and its initial particles.
    pub fn new<R: Rng + ?Sized>(
        sim: &Sim,
        cfg: &SpeciesConfig,
        rng: &mut R,
    ) -> PicResult<ParticleContainer> {
        let container = match cfg.zinject_plane {
            Some(zinject_plane) => {
                let mut rigid = RigidInjectedSpecies::new(sim, cfg, zinject_plane)?;
                let prtls = match &cfg.injection {
                    Some(inj) => init::sample_particles(inj, sim, rigid.species.charge, rng),
                    None => Vec::new(),
                };
                rigid.init_data(sim, prtls);
                ParticleContainer::RigidInjected(rigid)
            }
            None => {
                let mut species = Species::new(sim, cfg)?;
                if let Some(inj) = &cfg.injection {
                    let prtls = init::sample_particles(inj, sim, species.charge, rng);
                    species.add_particles(sim, 0, prtls);
                }
                ParticleContainer::Physical(species)
            }
        };
        container.species().log_summary();
        Ok(container)
    }

    pub fn species(&self) -> &Species {
        match self {
            ParticleContainer::Physical(s) => s,
            ParticleContainer::RigidInjected(r) => &r.species,
        }
    }

    pub fn species_mut(&mut self) -> &mut Species {
        match self {
            ParticleContainer::Physical(s) => s,
            ParticleContainer::RigidInjected(r) => &mut r.species,
        }
    }

    pub fn evolve(
        &mut self,
        sim: &Sim,
        lev: usize,
        flds: &mut Flds,
        t: Float,
        dt: Float,
        skip_deposition: bool,
    ) {
        match self {
            ParticleContainer::Physical(s) => {
                s.evolve(sim, lev, flds, t, dt, skip_deposition, None)
            }
            ParticleContainer::RigidInjected(r) => {
                r.evolve(sim, lev, flds, t, dt, skip_deposition)
            }
        }
    }

    pub fn push_p(&mut self, sim: &Sim, lev: usize, flds: &Flds, t: Float, dt: Float) {
        match self {
            ParticleContainer::Physical(s) => s.push_p(sim, lev, flds, t, dt, None),
            ParticleContainer::RigidInjected(r) => r.push_p(sim, lev, flds, t, dt),
        }
    }

    pub fn redistribute(&mut self, sim: &Sim, lev: usize) -> usize {
        self.species_mut().redistribute(sim, lev)
    }

    /// Plain species are always live.
    pub fn done_injecting(&self, lev: usize) -> bool {
        match self {
            ParticleContainer::Physical(_) => true,
            ParticleContainer::RigidInjected(r) => r.done_injecting(lev),
        }
    }
}
