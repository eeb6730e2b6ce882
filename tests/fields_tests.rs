mod common;

use boosted_pic::flds::field::IndexType;
use boosted_pic::flds::{FieldSolver, Flds, FrozenFields};
use boosted_pic::{Float, Sim};

fn init_flds(grid_type: &str) -> Flds {
    let mut cfg = common::setup_config();
    cfg.params.grid_type = grid_type.to_string();
    cfg.fields.e0 = [1.0, 2.0, 3.0];
    cfg.fields.b0 = [-1.0, -2.0, -3.0];
    let sim = Sim::new(&cfg).unwrap();
    assert_eq!(sim.n_guard(), 4);
    Flds::new(&sim, 0)
}

#[test]
fn test_field_init() {
    let flds = init_flds("staggered");
    // 8 x 8 x 16 cells, 4 guard cells on each side
    assert_eq!(flds.e_x.data.len(), 16 * 17 * 25);
    assert_eq!(flds.b_x.data.len(), 17 * 16 * 24);
    assert_eq!(flds.rho.data.len(), 17 * 17 * 25);
    assert_eq!(flds.j_z.ixtype(), IndexType::yee_e(2));
    assert_eq!(flds.b_y.ixtype(), IndexType::yee_b(1));
    for (fld, v) in flds.e().iter().zip([1.0, 2.0, 3.0].iter()) {
        assert!(fld.data.iter().all(|x| x == v));
    }
    for (fld, v) in flds.b().iter().zip([-1.0, -2.0, -3.0].iter()) {
        assert!(fld.data.iter().all(|x| x == v));
    }
    for fld in &[&flds.j_x, &flds.j_y, &flds.j_z, &flds.rho] {
        assert!(fld.data.iter().all(|&x| x == 0.0));
    }
}

#[test]
fn nodal_grid_puts_everything_on_the_nodes() {
    let flds = init_flds("nodal");
    for fld in flds.e().iter().chain(flds.b().iter()) {
        assert_eq!(fld.ixtype(), IndexType::nodal());
        assert_eq!(fld.data.len(), 17 * 17 * 25);
    }
}

#[test]
fn zero_currents_keeps_e_and_b() {
    let mut flds = init_flds("staggered");
    flds.j_y.fill(5.0);
    flds.rho.fill(1.0);
    flds.zero_currents();
    assert!(flds.j_y.data.iter().all(|&x| x == 0.0));
    assert!(flds.rho.data.iter().all(|&x| x == 0.0));
    assert!(flds.e_z.data.iter().all(|&x| x == 3.0));
}

#[test]
fn frozen_fields_leave_the_grid_alone() {
    let sim = common::setup_sim();
    let mut flds = vec![Flds::new(&sim, 0)];
    flds[0].set_uniform([0.5; 3], [0.25; 3]);
    FrozenFields.evolve(&sim, &mut flds, sim.dt);
    assert!(flds[0].b_z.data.iter().all(|&x| x == 0.25 as Float));
}

#[test]
fn refined_levels_halve_the_cell_size() {
    let mut cfg = common::setup_config();
    cfg.params.max_level = 1;
    let sim = Sim::new(&cfg).unwrap();
    assert_eq!(sim.geom.len(), 2);
    assert_eq!(sim.geom[1].n_cell, [16, 16, 32]);
    assert_eq!(sim.geom[1].dx, [0.5, 0.5, 0.5]);
    let fine = Flds::new(&sim, 1);
    assert_eq!(fine.rho.data.len(), 25 * 25 * 41);
}
