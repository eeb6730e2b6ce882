use crate::consts::C;
use crate::prtls::tile::PrtlRecord;
use crate::{Float, Injection, Sim};
use rand::prelude::*;
use rand_distr::StandardNormal;

/// Sample the initial particles of a species on level 0, in the simulation
/// frame. Momenta in the configuration are gamma*beta, given in the lab.
pub fn sample_particles<R: Rng + ?Sized>(
    inj: &Injection,
    sim: &Sim,
    charge: Float,
    rng: &mut R,
) -> Vec<PrtlRecord> {
    match inj {
        Injection::GaussianBeam {
            npart,
            x_m,
            x_rms,
            u_mean,
            u_th,
            q_tot,
        } => gaussian_beam(*npart, *x_m, *x_rms, *u_mean, *u_th, *q_tot, sim, charge, rng),
        Injection::UniformPerCell {
            ppc,
            xmin,
            xmax,
            n0,
            u_mean,
            u_th,
        } => uniform_per_cell(*ppc, *xmin, *xmax, *n0, *u_mean, *u_th, sim, rng),
    }
}

#[inline(always)]
fn sample_momentum<R: Rng + ?Sized>(u_mean: [Float; 3], u_th: [Float; 3], rng: &mut R) -> [Float; 3] {
    let mut u = [0.0; 3];
    for d in 0..3 {
        let r: Float = rng.sample(StandardNormal);
        u[d] = (u_mean[d] + u_th[d] * r) * C;
    }
    u
}

#[allow(clippy::too_many_arguments)]
fn gaussian_beam<R: Rng + ?Sized>(
    npart: usize,
    x_m: [Float; 3],
    x_rms: [Float; 3],
    u_mean: [Float; 3],
    u_th: [Float; 3],
    q_tot: Float,
    sim: &Sim,
    charge: Float,
    rng: &mut R,
) -> Vec<PrtlRecord> {
    if npart == 0 {
        return Vec::new();
    }
    let w = if charge != 0.0 {
        (q_tot / (charge * npart as Float)).abs()
    } else {
        1.0
    };
    let boost = &sim.boost;
    (0..npart)
        .map(|_| {
            let mut pos = [0.0; 3];
            for d in 0..3 {
                let r: Float = rng.sample(StandardNormal);
                pos[d] = x_m[d] + x_rms[d] * r;
            }
            pos[2] = boost.z_to_boosted(pos[2]);
            let u = boost.momentum_to_boosted(sample_momentum(u_mean, u_th, rng));
            PrtlRecord {
                pos,
                u,
                w,
                ion_lev: None,
            }
        })
        .collect()
}

/// `ppc[d]` particles per cell along d on a regular sub grid of each cell
/// whose center lies in [xmin, xmax). The density `n0` is the lab density,
/// contracted by gamma_boost in the boosted frame.
#[allow(clippy::too_many_arguments)]
fn uniform_per_cell<R: Rng + ?Sized>(
    ppc: [usize; 3],
    xmin: [Float; 3],
    xmax: [Float; 3],
    n0: Float,
    u_mean: [Float; 3],
    u_th: [Float; 3],
    sim: &Sim,
    rng: &mut R,
) -> Vec<PrtlRecord> {
    let geom = &sim.geom[0];
    let n_per_cell = ppc[0] * ppc[1] * ppc[2];
    if n_per_cell == 0 {
        return Vec::new();
    }
    let w = n0 * sim.boost.gamma_boost * geom.cell_volume() / n_per_cell as Float;
    let mut out = Vec::new();
    for k in 0..geom.n_cell[2] {
        for j in 0..geom.n_cell[1] {
            for i in 0..geom.n_cell[0] {
                let cell = [i, j, k];
                let mut inside = true;
                for d in 0..3 {
                    let xc = geom.prob_lo[d] + (cell[d] as Float + 0.5) * geom.dx[d];
                    inside &= xc >= xmin[d] && xc < xmax[d];
                }
                if !inside {
                    continue;
                }
                for pk in 0..ppc[2] {
                    for pj in 0..ppc[1] {
                        for pi in 0..ppc[0] {
                            let sub = [pi, pj, pk];
                            let mut pos = [0.0; 3];
                            for d in 0..3 {
                                let frac = (sub[d] as Float + 0.5) / ppc[d] as Float;
                                pos[d] = geom.prob_lo[d] + (cell[d] as Float + frac) * geom.dx[d];
                            }
                            let u = sim
                                .boost
                                .momentum_to_boosted(sample_momentum(u_mean, u_th, rng));
                            out.push(PrtlRecord {
                                pos,
                                u,
                                w,
                                ion_lev: None,
                            });
                        }
                    }
                }
            }
        }
    }
    out
}
