use anyhow::{Context, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::str::FromStr;

pub mod boost;
pub mod consts;
pub mod error;
pub mod flds;
pub mod prtls;
pub mod save;

use boost::BoostedFrame;
use consts::C;
use error::{PicError, PicResult};
use flds::{FieldSolver, Flds, FrozenFields, Geometry};
use prtls::pusher::PusherAlgo;
use prtls::ParticleContainer;

// We use a type alias for f64/Float to easily support
// double and single precision.
#[cfg(feature = "dprec")]
pub type Float = f64;

#[cfg(not(feature = "dprec"))]
pub type Float = f32;

/// Number of particles handed to a rayon worker at a time.
pub const PRTL_CHUNK_SIZE: usize = 256;

/// Refinement ratio between two consecutive levels.
pub const REF_RATIO: usize = 2;

#[derive(Deserialize)]
pub struct Config {
    pub params: Params,
    pub setup: Setup,
    pub output: Output,
    #[serde(default)]
    pub boost: Boost,
    #[serde(default)]
    pub fields: FieldsConfig,
    #[serde(default)]
    pub species: Vec<SpeciesConfig>,
}

#[derive(Deserialize)]
pub struct Setup {
    pub t_final: u32,
    /// Seed of the particle sampler, drawn from the OS when missing
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Deserialize)]
pub struct Output {
    pub write_output: bool,
    pub output_interval: u32,
    pub stride: usize,
    #[serde(default = "default_outdir")]
    pub outdir: String,
}

fn default_outdir() -> String {
    "output".to_string()
}

#[derive(Deserialize)]
pub struct Params {
    pub n_cell: [usize; 3],
    pub prob_lo: [Float; 3],
    pub prob_hi: [Float; 3],
    pub tile_size: [usize; 3],
    #[serde(default)]
    pub max_level: usize,
    pub dt: Float,
    /// Particle shape order, 1 to 3
    pub nox: usize,
    pub pusher: String,
    #[serde(default = "default_grid_type")]
    pub grid_type: String,
    #[serde(default)]
    pub moving_window_v: Float,
}

fn default_grid_type() -> String {
    "staggered".to_string()
}

#[derive(Deserialize)]
pub struct Boost {
    pub gamma_boost: Float,
}

impl Default for Boost {
    fn default() -> Self {
        Boost { gamma_boost: 1.0 }
    }
}

/// Uniform fields the grid starts with.
#[derive(Deserialize, Default)]
pub struct FieldsConfig {
    #[serde(default)]
    pub e0: [Float; 3],
    #[serde(default)]
    pub b0: [Float; 3],
}

#[derive(Deserialize)]
pub struct SpeciesConfig {
    pub name: String,
    #[serde(default)]
    pub physical_species: Option<String>,
    #[serde(default)]
    pub charge: Option<Float>,
    #[serde(default)]
    pub mass: Option<Float>,
    #[serde(default)]
    pub do_classical_radiation_reaction: bool,
    #[serde(default)]
    pub do_not_push: bool,
    #[serde(default)]
    pub do_not_deposit: bool,
    #[serde(default)]
    pub ionization_level: Option<i32>,
    #[serde(default)]
    pub external_e: Option<[Float; 3]>,
    #[serde(default)]
    pub external_b: Option<[Float; 3]>,
    /// Lab frame injection plane; makes the species rigidly injected
    #[serde(default)]
    pub zinject_plane: Option<Float>,
    #[serde(default)]
    pub rigid_advance: bool,
    #[serde(default)]
    pub injection: Option<Injection>,
}

/// Initial particle distribution. Momenta are gamma*beta.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum Injection {
    GaussianBeam {
        npart: usize,
        x_m: [Float; 3],
        x_rms: [Float; 3],
        u_mean: [Float; 3],
        u_th: [Float; 3],
        q_tot: Float,
    },
    UniformPerCell {
        ppc: [usize; 3],
        xmin: [Float; 3],
        xmax: [Float; 3],
        n0: Float,
        u_mean: [Float; 3],
        u_th: [Float; 3],
    },
}

impl Config {
    pub fn new() -> Result<Config> {
        let contents =
            fs::read_to_string("config.toml").context("Could not open the config.toml file")?;
        toml::from_str(&contents).with_context(|| "Could not parse Config file")
    }
}

/// Staggering of E and B on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridType {
    /// Yee cell
    Staggered,
    Nodal,
}

impl FromStr for GridType {
    type Err = PicError;

    fn from_str(s: &str) -> Result<GridType, PicError> {
        match s.to_lowercase().as_str() {
            "staggered" | "yee" => Ok(GridType::Staggered),
            "nodal" => Ok(GridType::Nodal),
            _ => Err(PicError::UnknownGridType(s.to_string())),
        }
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridType::Staggered => write!(f, "staggered"),
            GridType::Nodal => write!(f, "nodal"),
        }
    }
}

/// Run wide constants, fixed once the configuration has been read.
#[derive(Debug, Clone)]
pub struct Sim {
    pub t_final: u32,
    pub dt: Float,
    /// geom[lev]
    pub geom: Vec<Geometry>,
    pub tile_size: [usize; 3],
    pub max_level: usize,
    pub nox: usize,
    pub pusher_algo: PusherAlgo,
    pub grid_type: GridType,
    pub boost: BoostedFrame,
    pub moving_window_v: Float,
    pub e0: [Float; 3],
    pub b0: [Float; 3],
}

impl Sim {
    pub fn new(cfg: &Config) -> PicResult<Sim> {
        let p = &cfg.params;
        if !(1..=3).contains(&p.nox) {
            return Err(PicError::InterpolationOrder(p.nox));
        }
        for d in 0..3 {
            if p.n_cell[d] == 0 {
                return Err(PicError::Geometry(format!("n_cell[{}] must be positive", d)));
            }
            if p.tile_size[d] == 0 {
                return Err(PicError::Geometry(format!("tile_size[{}] must be positive", d)));
            }
            if !(p.prob_hi[d] > p.prob_lo[d]) {
                return Err(PicError::Geometry(format!(
                    "prob_hi[{}] = {} is not above prob_lo[{}] = {}",
                    d, p.prob_hi[d], d, p.prob_lo[d]
                )));
            }
        }
        if !(p.dt >= 0.0) {
            return Err(PicError::Geometry(format!("dt must not be negative, got {}", p.dt)));
        }
        if cfg.output.write_output && cfg.output.output_interval == 0 {
            return Err(PicError::OutputInterval);
        }
        let pusher_algo = p.pusher.parse::<PusherAlgo>()?;
        let grid_type = p.grid_type.parse::<GridType>()?;
        let boost = BoostedFrame::new(cfg.boost.gamma_boost)?;

        let mut geom = vec![Geometry::new(p.n_cell, p.prob_lo, p.prob_hi)];
        for lev in 1..=p.max_level {
            let fine = geom[lev - 1].refine(REF_RATIO);
            geom.push(fine);
        }
        // particles must not outrun the guard cells in one step
        for (lev, g) in geom.iter().enumerate() {
            let dx_min = g.dx.iter().cloned().fold(Float::INFINITY, Float::min);
            if C * p.dt >= dx_min {
                return Err(PicError::Courant {
                    dt: p.dt as f64,
                    dx: dx_min as f64,
                    lev,
                });
            }
        }

        Ok(Sim {
            t_final: cfg.setup.t_final,
            dt: p.dt,
            geom,
            tile_size: p.tile_size,
            max_level: p.max_level,
            nox: p.nox,
            pusher_algo,
            grid_type,
            boost,
            moving_window_v: p.moving_window_v,
            e0: cfg.fields.e0,
            b0: cfg.fields.b0,
        })
    }

    /// Guard cells of every grid array: the particle stencil plus one cell
    /// of motion per step.
    pub fn n_guard(&self) -> usize {
        self.nox + 2
    }
}

/// Advance every species of `lev` by one step. J is rebuilt from the push,
/// rho from the positions after it.
pub fn step_level(
    sim: &Sim,
    lev: usize,
    flds: &mut Flds,
    prtls: &mut [ParticleContainer],
    time: Float,
) {
    flds.zero_currents();
    for p in prtls.iter_mut() {
        p.evolve(sim, lev, flds, time, sim.dt, false);
        p.redistribute(sim, lev);
        let species = p.species();
        species.deposit_charge(sim, lev, flds);
        debug!(
            "{}: {} particles on level {}",
            species.name,
            species.num_particles_lev(lev),
            lev
        );
    }
}

pub fn run(cfg: Config) -> Result<()> {
    let sim = Sim::new(&cfg).context("Invalid configuration")?;
    info!(
        "{:?} cells, {} levels, dt = {:e} s, pusher {}, {} grid, gamma_boost = {}",
        sim.geom[0].n_cell,
        sim.max_level + 1,
        sim.dt,
        sim.pusher_algo,
        sim.grid_type,
        sim.boost.gamma_boost
    );

    let mut rng = match cfg.setup.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut flds: Vec<Flds> = (0..=sim.max_level).map(|lev| Flds::new(&sim, lev)).collect();
    let mut prtls = Vec::with_capacity(cfg.species.len());
    for sc in &cfg.species {
        let container = ParticleContainer::new(&sim, sc, &mut rng)
            .with_context(|| format!("Could not set up species {}", sc.name))?;
        prtls.push(container);
    }
    let mut solver = FrozenFields;

    for t in 0..=sim.t_final {
        if cfg.output.write_output && t % cfg.output.output_interval == 0 {
            save::save_output(t, &cfg.output, &flds, &prtls)?;
        }
        debug!("step {}", t);
        let time = t as Float * sim.dt;
        for (lev, f) in flds.iter_mut().enumerate() {
            step_level(&sim, lev, f, &mut prtls, time);
        }
        solver.evolve(&sim, &mut flds, sim.dt);
    }
    for p in &prtls {
        p.species().log_summary();
    }
    Ok(())
}
