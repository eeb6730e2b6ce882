mod common;

use approx::assert_relative_eq;
use boosted_pic::consts::{M_E, Q_E};
use boosted_pic::flds::Flds;
use boosted_pic::prtls::container::Species;
use boosted_pic::prtls::tile::PrtlRecord;
use boosted_pic::prtls::ParticleContainer;
use boosted_pic::{step_level, Float, Sim};

fn sim_with_fields(tile_size: [usize; 3]) -> Sim {
    let mut cfg = common::setup_config();
    cfg.params.tile_size = tile_size;
    cfg.fields.e0 = [1e2, -3e1, 0.0];
    cfg.fields.b0 = [0.0, 2e-4, 1e-3];
    Sim::new(&cfg).unwrap()
}

fn sample(n: usize) -> Vec<PrtlRecord> {
    (0..n)
        .map(|i| {
            let f = i as Float;
            PrtlRecord {
                pos: [
                    2.0 + (0.37 * f) % 4.0,
                    2.0 + (0.61 * f) % 4.0,
                    4.0 + (0.53 * f) % 8.0,
                ],
                u: [1e5 * (f * 0.7).sin(), 1e5 * (f * 1.3).cos(), 5e4],
                w: 1.0 + f,
                ion_lev: None,
            }
        })
        .collect()
}

#[test]
fn result_does_not_depend_on_particle_order() {
    let sim = sim_with_fields([8, 8, 16]);
    let prtls = sample(64);
    let mut reversed = prtls.clone();
    reversed.reverse();

    let mut a = Species::new(&sim, &common::electron_config("a")).unwrap();
    let mut b = Species::new(&sim, &common::electron_config("b")).unwrap();
    a.add_particles(&sim, 0, prtls);
    b.add_particles(&sim, 0, reversed);
    let mut fa = Flds::new(&sim, 0);
    let mut fb = Flds::new(&sim, 0);
    for step in 0..3 {
        let t = step as Float * sim.dt;
        a.evolve(&sim, 0, &mut fa, t, sim.dt, false, None);
        b.evolve(&sim, 0, &mut fb, t, sim.dt, false, None);
    }

    let ra = a.records(0);
    let mut rb = b.records(0);
    rb.reverse();
    assert_eq!(ra.len(), 64);
    for (pa, pb) in ra.iter().zip(rb.iter()) {
        assert_eq!(pa, pb);
    }
    let scale = fa.j_x.data.iter().fold(0.0 as Float, |m, v| m.max(v.abs()));
    assert!(scale > 0.0);
    for (ja, jb) in fa.j_x.data.iter().zip(fb.j_x.data.iter()) {
        assert!((ja - jb).abs() <= 1e-12 * scale);
    }
}

#[test]
fn zero_dt_step_is_a_no_op_for_particles() {
    let sim = sim_with_fields([4, 4, 8]);
    let mut s = Species::new(&sim, &common::electron_config("e")).unwrap();
    s.add_particles(&sim, 0, sample(32));
    let before = s.records(0);
    let mut flds = Flds::new(&sim, 0);
    s.evolve(&sim, 0, &mut flds, 0.0, 0.0, false, None);
    assert_eq!(s.records(0), before);
}

#[test]
fn skip_deposition_leaves_currents_alone() {
    let sim = sim_with_fields([4, 4, 8]);
    let mut s = Species::new(&sim, &common::electron_config("e")).unwrap();
    s.add_particles(&sim, 0, sample(32));
    let mut flds = Flds::new(&sim, 0);
    s.evolve(&sim, 0, &mut flds, 0.0, sim.dt, true, None);
    assert!(flds.j_x.data.iter().all(|&v| v == 0.0));
    assert!(flds.j_z.data.iter().all(|&v| v == 0.0));
    s.evolve(&sim, 0, &mut flds, sim.dt, sim.dt, false, None);
    assert!(flds.j_z.data.iter().any(|&v| v != 0.0));
}

#[test]
fn tile_deposits_add_up_to_the_total_charge() {
    let sim = sim_with_fields([4, 4, 8]);
    let mut s = Species::new(&sim, &common::electron_config("e")).unwrap();
    let prtls = sample(40);
    let total_w: Float = prtls.iter().map(|p| p.w).sum();
    s.add_particles(&sim, 0, prtls);
    assert!(s.tiles[0].iter().filter(|t| !t.is_empty()).count() > 1);
    let mut flds = Flds::new(&sim, 0);
    s.deposit_charge(&sim, 0, &mut flds);
    let q: Float = flds.rho.data.iter().sum::<Float>() * flds.geom.cell_volume();
    assert_relative_eq!(q, -Q_E * total_w, max_relative = 1e-12);
}

#[test]
fn current_of_a_uniform_drift() {
    let sim = sim_with_fields([4, 4, 8]);
    let mut cfg = common::electron_config("e");
    cfg.do_not_push = true;
    let mut s = Species::new(&sim, &cfg).unwrap();
    let uz = 1e6;
    s.add_particles(
        &sim,
        0,
        vec![PrtlRecord {
            pos: [4.1, 3.9, 8.2],
            u: [0.0, 0.0, uz],
            w: 5.0,
            ion_lev: None,
        }],
    );
    let mut flds = Flds::new(&sim, 0);
    s.evolve(&sim, 0, &mut flds, 0.0, sim.dt, false, None);
    let vz = uz / boosted_pic::prtls::pusher::lorentz_factor([0.0, 0.0, uz]);
    let jz: Float = flds.j_z.data.iter().sum::<Float>() * flds.geom.cell_volume();
    assert_relative_eq!(jz, -Q_E * 5.0 * vz, max_relative = 1e-12);
    // do_not_push: the particle has not moved
    assert_eq!(s.records(0)[0].pos, [4.1, 3.9, 8.2]);
}

#[test]
fn ionization_level_scales_the_charge() {
    let sim = sim_with_fields([4, 4, 8]);
    let mut cfg = common::electron_config("ions");
    cfg.physical_species = None;
    cfg.charge = Some(Q_E);
    cfg.mass = Some(1836.0 * M_E);
    cfg.ionization_level = Some(3);
    let mut s = Species::new(&sim, &cfg).unwrap();
    s.add_particles(&sim, 0, sample(4));
    assert_eq!(s.records(0)[0].ion_lev, Some(3));
    let mut flds = Flds::new(&sim, 0);
    s.deposit_charge(&sim, 0, &mut flds);
    let q: Float = flds.rho.data.iter().sum::<Float>() * flds.geom.cell_volume();
    let total_w: Float = sample(4).iter().map(|p| p.w).sum();
    assert_relative_eq!(q, 3.0 * Q_E * total_w, max_relative = 1e-12);
}

#[test]
fn redistribute_moves_particles_between_tiles() {
    let sim = sim_with_fields([4, 4, 8]);
    let mut s = Species::new(&sim, &common::electron_config("e")).unwrap();
    let p = |pos| PrtlRecord {
        pos,
        u: [0.0; 3],
        w: 1.0,
        ion_lev: None,
    };
    s.tiles[0][0].push(p([5.0, 1.0, 1.0]));
    s.tiles[0][0].push(p([1.0, 1.0, 1.0]));
    s.tiles[0][0].push(p([1.0, 1.0, -0.5]));
    let lost = s.redistribute(&sim, 0);
    assert_eq!(lost, 1);
    assert_eq!(s.tiles[0][0].len(), 1);
    assert_eq!(s.tiles[0][1].len(), 1);
    assert_eq!(s.tiles[0][1].position(0), [5.0, 1.0, 1.0]);
}

#[cfg(not(feature = "periodic"))]
#[test]
fn particles_leaving_the_domain_are_absorbed() {
    let sim = sim_with_fields([4, 4, 8]);
    let mut s = Species::new(&sim, &common::electron_config("e")).unwrap();
    s.tiles[0][0].push(PrtlRecord {
        pos: [-0.1, 1.0, 1.0],
        u: [0.0; 3],
        w: 1.0,
        ion_lev: None,
    });
    assert_eq!(s.redistribute(&sim, 0), 1);
    assert_eq!(s.num_particles(), 0);
}

#[cfg(feature = "periodic")]
#[test]
fn particles_wrap_around_in_x_and_y() {
    let sim = sim_with_fields([4, 4, 8]);
    let mut s = Species::new(&sim, &common::electron_config("e")).unwrap();
    s.tiles[0][0].push(PrtlRecord {
        pos: [-0.5, 1.0, 1.0],
        u: [0.0; 3],
        w: 1.0,
        ion_lev: None,
    });
    assert_eq!(s.redistribute(&sim, 0), 0);
    assert_eq!(s.tiles[0][1].position(0), [7.5, 1.0, 1.0]);
}

#[test]
fn mean_velocity_of_a_container() {
    let sim = sim_with_fields([4, 4, 8]);
    let mut s = Species::new(&sim, &common::electron_config("e")).unwrap();
    assert_eq!(s.mean_particle_velocity(), [0.0; 3]);
    let u = [0.0, 0.0, 2e8];
    let v = u[2] / boosted_pic::prtls::pusher::lorentz_factor(u);
    let recs = (0..10)
        .map(|i| PrtlRecord {
            pos: [0.5 + 0.7 * i as Float, 1.0, 1.0],
            u: if i % 2 == 0 { u } else { [0.0; 3] },
            w: 1.0,
            ion_lev: None,
        })
        .collect();
    s.add_particles(&sim, 0, recs);
    let mean = s.mean_particle_velocity();
    assert_relative_eq!(mean[2], 0.5 * v, max_relative = 1e-12);
    assert_eq!(mean[0], 0.0);
}

#[test]
fn momentum_push_leaves_positions_alone() {
    let sim = sim_with_fields([4, 4, 8]);
    let mut s = Species::new(&sim, &common::electron_config("e")).unwrap();
    s.add_particles(&sim, 0, sample(16));
    let before = s.records(0);
    let flds = Flds::new(&sim, 0);
    s.push_p(&sim, 0, &flds, 0.0, sim.dt, None);
    for (b, a) in before.iter().zip(s.records(0).iter()) {
        assert_eq!(b.pos, a.pos);
        assert!(b.u != a.u);
    }
}

#[test]
fn a_level_step_fills_currents_and_charge() {
    let sim = sim_with_fields([4, 4, 8]);
    let prtls = sample(24);
    let total_w: Float = prtls.iter().map(|p| p.w).sum();
    let mut e = Species::new(&sim, &common::electron_config("e")).unwrap();
    e.add_particles(&sim, 0, prtls.clone());
    let mut cfg = common::electron_config("tracers");
    cfg.do_not_deposit = true;
    let mut tracers = Species::new(&sim, &cfg).unwrap();
    tracers.add_particles(&sim, 0, prtls);
    let mut species = vec![
        ParticleContainer::Physical(e),
        ParticleContainer::Physical(tracers),
    ];

    let mut flds = Flds::new(&sim, 0);
    flds.rho.fill(1.0);
    step_level(&sim, 0, &mut flds, &mut species, 0.0);
    assert!(flds.j_x.data.iter().any(|&v| v != 0.0));
    // stale rho is dropped, the tracers add nothing
    let q: Float = flds.rho.data.iter().sum::<Float>() * flds.geom.cell_volume();
    assert_relative_eq!(q, -Q_E * total_w, max_relative = 1e-12);
    assert_eq!(species[0].species().num_particles_lev(0), 24);
    assert_eq!(species[1].species().num_particles_lev(0), 24);
}
