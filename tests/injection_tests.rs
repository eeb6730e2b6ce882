mod common;

use approx::assert_relative_eq;
use boosted_pic::boost::BoostedFrame;
use boosted_pic::consts::{C, Q_E};
use boosted_pic::flds::Flds;
use boosted_pic::prtls::container::Species;
use boosted_pic::prtls::pusher::lorentz_factor;
use boosted_pic::prtls::rigid::RigidInjectedSpecies;
use boosted_pic::prtls::tile::PrtlRecord;
use boosted_pic::prtls::ParticleContainer;
use boosted_pic::{Config, Float, Injection, Sim};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Half a meter cube seen from a frame boosted with gamma = 2.
fn boosted_config(dt: Float) -> Config {
    let mut cfg = common::setup_config();
    cfg.params.n_cell = [8, 8, 8];
    cfg.params.prob_hi = [0.5, 0.5, 0.5];
    cfg.params.tile_size = [8, 8, 8];
    cfg.params.dt = dt;
    cfg.boost.gamma_boost = 2.0;
    cfg
}

fn beam_pair(uz: Float) -> Vec<PrtlRecord> {
    vec![
        PrtlRecord {
            pos: [0.2, 0.3, 0.1],
            u: [0.0, 0.0, uz],
            w: 1.0,
            ion_lev: None,
        },
        PrtlRecord {
            pos: [0.3, 0.2, 0.4],
            u: [0.0, 0.0, uz],
            w: 1.0,
            ion_lev: None,
        },
    ]
}

#[test]
fn plane_leaves_the_domain_once() {
    let v_boost = BoostedFrame::new(2.0).unwrap().v_boost();
    // the plane moves 0.06 m per step from z = 0.5, on cells of 0.125 m
    let mut cfg = boosted_config(0.06 / v_boost);
    cfg.params.n_cell = [4, 4, 4];
    let sim = Sim::new(&cfg).unwrap();
    let mut cfg = common::electron_config("beam");
    cfg.zinject_plane = Some(1.0);
    let mut rng = StdRng::seed_from_u64(1);
    let mut beam = ParticleContainer::new(&sim, &cfg, &mut rng).unwrap();
    let mut flds = Flds::new(&sim, 0);
    assert!(!beam.done_injecting(0));

    let mut done = Vec::new();
    for step in 0..15 {
        beam.evolve(&sim, 0, &mut flds, step as Float * sim.dt, sim.dt, false);
        done.push(beam.done_injecting(0));
    }
    // z = 0.02 after 8 steps, below prob_lo after the 9th
    let first = done.iter().position(|&d| d).unwrap();
    assert_eq!(first, 8);
    assert!(done[first..].iter().all(|&d| d));
    if let ParticleContainer::RigidInjected(r) = &beam {
        assert!(r.plane(0).z < 0.0);
    } else {
        panic!("zinject_plane should make a rigidly injected species");
    }
}

#[test]
fn plain_species_are_always_done() {
    let sim = Sim::new(&boosted_config(1e-12)).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let plasma = ParticleContainer::new(&sim, &common::electron_config("e"), &mut rng).unwrap();
    assert!(plasma.done_injecting(0));
}

fn held_beam(rigid_advance: bool) -> (Sim, RigidInjectedSpecies, Flds) {
    let mut cfg = boosted_config(1e-12);
    cfg.fields.e0 = [1e5, 0.0, 0.0];
    let sim = Sim::new(&cfg).unwrap();
    let mut sc = common::electron_config("beam");
    sc.zinject_plane = Some(0.5);
    sc.rigid_advance = rigid_advance;
    let mut beam = RigidInjectedSpecies::new(&sim, &sc, 0.5).unwrap();
    beam.init_data(&sim, beam_pair(1e7));
    let flds = Flds::new(&sim, 0);
    (sim, beam, flds)
}

#[test]
fn particles_behind_the_plane_are_held() {
    let (sim, mut beam, mut flds) = held_beam(false);
    assert_eq!(beam.plane(0).z, 0.25);
    beam.evolve(&sim, 0, &mut flds, 0.0, sim.dt, false);

    let recs = beam.species.records(0);
    let behind = recs.iter().find(|p| p.pos[2] < 0.25).unwrap();
    let ahead = recs.iter().find(|p| p.pos[2] > 0.25).unwrap();
    assert_eq!(behind.pos, [0.2, 0.3, 0.1]);
    assert_eq!(behind.u, [0.0, 0.0, 1e7]);
    // the live electron is accelerated against E_x
    assert!(ahead.u[0] < 0.0);
    assert!(ahead.pos[0] < 0.3);
    assert!(ahead.pos[2] > 0.4);
    assert!(!beam.done_injecting(0));
}

#[test]
fn momentum_push_keeps_held_particles() {
    let (sim, mut beam, flds) = held_beam(true);
    let before = beam.species.records(0);
    beam.push_p(&sim, 0, &flds, 0.0, sim.dt);
    let after = beam.species.records(0);

    let behind = after.iter().find(|p| p.pos[2] < 0.25).unwrap();
    let ahead = after.iter().find(|p| p.pos[2] > 0.25).unwrap();
    assert_eq!(behind.u, [0.0, 0.0, 1e7]);
    assert!(ahead.u[0] < 0.0);
    assert_eq!(ahead.u[1], 0.0);
    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.pos, a.pos);
    }
    // the plane only moves in evolve
    assert_eq!(beam.plane(0).z, 0.25);
}

#[test]
fn rigid_advance_moves_held_particles_with_the_beam() {
    let (sim, mut beam, mut flds) = held_beam(true);
    let vz = 1e7 / lorentz_factor([0.0, 0.0, 1e7]);
    assert_relative_eq!(beam.vzbeam_ave_boosted, vz, max_relative = 1e-14);
    // same vz for every particle: the remap leaves them in place
    assert_relative_eq!(beam.species.records(0)[0].pos[2], 0.1, epsilon = 1e-15);

    beam.evolve(&sim, 0, &mut flds, 0.0, sim.dt, false);
    let recs = beam.species.records(0);
    let behind = recs.iter().find(|p| p.pos[2] < 0.25).unwrap();
    assert_eq!(behind.pos[0], 0.2);
    assert_eq!(behind.pos[1], 0.3);
    assert_relative_eq!(behind.pos[2], 0.1 + sim.dt * vz, epsilon = 1e-15);
    assert_eq!(behind.u, [0.0, 0.0, 1e7]);
}

#[test]
fn held_particles_still_deposit() {
    let (sim, mut beam, mut flds) = held_beam(false);
    beam.evolve(&sim, 0, &mut flds, 0.0, sim.dt, false);
    let jz: Float = flds.j_z.data.iter().sum::<Float>() * flds.geom.cell_volume();
    assert!(jz < 0.0);
}

#[test]
fn once_done_the_beam_pushes_like_a_plain_species() {
    let mut cfg = boosted_config(1e-12);
    cfg.fields.e0 = [1e5, 0.0, 2e4];
    cfg.fields.b0 = [0.0, 1e-3, 0.0];
    let sim = Sim::new(&cfg).unwrap();
    let mut sc = common::electron_config("beam");
    // already below the domain
    sc.zinject_plane = Some(-1.0);
    let mut beam = RigidInjectedSpecies::new(&sim, &sc, -1.0).unwrap();
    beam.init_data(&sim, beam_pair(1e7));
    let mut plain = Species::new(&sim, &common::electron_config("plain")).unwrap();
    plain.add_particles(&sim, 0, beam_pair(1e7));

    let mut f1 = Flds::new(&sim, 0);
    let mut f2 = Flds::new(&sim, 0);
    for step in 0..3 {
        let t = step as Float * sim.dt;
        beam.evolve(&sim, 0, &mut f1, t, sim.dt, false);
        plain.evolve(&sim, 0, &mut f2, t, sim.dt, false, None);
    }
    assert!(beam.done_injecting(0));
    assert_eq!(beam.species.records(0), plain.records(0));
}

#[test]
fn gaussian_beam_is_contracted_and_boosted() {
    let sim = Sim::new(&boosted_config(1e-12)).unwrap();
    let npart = 1000;
    let q_tot = -1e-12;
    let mut sc = common::electron_config("beam");
    sc.zinject_plane = Some(1.0);
    sc.injection = Some(Injection::GaussianBeam {
        npart,
        x_m: [0.25, 0.25, 0.6],
        x_rms: [0.01, 0.01, 0.02],
        u_mean: [0.0, 0.0, 10.0],
        u_th: [0.0; 3],
        q_tot,
    });
    let mut rng = StdRng::seed_from_u64(42);
    let beam = ParticleContainer::new(&sim, &sc, &mut rng).unwrap();
    let recs = beam.species().records(0);
    assert_eq!(recs.len(), npart);

    let uz = sim.boost.momentum_to_boosted([0.0, 0.0, 10.0 * C])[2];
    let w = (q_tot / (-Q_E * npart as Float)).abs();
    let mut z_mean = 0.0;
    for p in &recs {
        assert_eq!(p.u, [0.0, 0.0, uz]);
        assert_eq!(p.w, w);
        z_mean += p.pos[2];
    }
    z_mean /= npart as Float;
    // 0.6 in the lab, 0.3 once contracted; the rms is 0.01 in the boosted frame
    assert!((z_mean - 0.3).abs() < 2e-3);
}

#[test]
fn uniform_plasma_fills_the_selected_cells() {
    let sim = Sim::new(&boosted_config(1e-12)).unwrap();
    let n0 = 1e20;
    let mut sc = common::electron_config("plasma");
    sc.injection = Some(Injection::UniformPerCell {
        ppc: [1, 1, 2],
        xmin: [0.0, 0.0, 0.25],
        xmax: [0.5, 0.5, 0.5],
        n0,
        u_mean: [0.0; 3],
        u_th: [0.0; 3],
    });
    let mut rng = StdRng::seed_from_u64(3);
    let plasma = ParticleContainer::new(&sim, &sc, &mut rng).unwrap();
    let recs = plasma.species().records(0);
    // upper half of the cells along z, two particles per cell
    assert_eq!(recs.len(), 8 * 8 * 4 * 2);
    let vol = sim.geom[0].cell_volume();
    for p in &recs {
        assert!(p.pos[2] > 0.25);
        assert_relative_eq!(p.w, n0 * 2.0 * vol / 2.0, max_relative = 1e-12);
    }
}
