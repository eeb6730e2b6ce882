#![allow(dead_code)]
use boosted_pic::{Boost, Config, FieldsConfig, Float, Output, Params, Setup, Sim, SpeciesConfig};

pub fn setup_config() -> Config {
    // This is a function that sets up a dummy small
    // simulation so that it can be used in testing;
    Config {
        output: Output {
            write_output: false,
            output_interval: 100,
            stride: 4,
            outdir: "output".to_string(),
        },
        setup: Setup {
            t_final: 10,
            seed: Some(7),
        },
        params: Params {
            n_cell: [8, 8, 16],
            prob_lo: [0.0, 0.0, 0.0],
            prob_hi: [8.0, 8.0, 16.0],
            tile_size: [4, 4, 8],
            max_level: 0,
            dt: 1e-10,
            nox: 2,
            pusher: "boris".to_string(),
            grid_type: "staggered".to_string(),
            moving_window_v: 0.0,
        },
        boost: Boost { gamma_boost: 1.0 },
        fields: FieldsConfig::default(),
        species: Vec::new(),
    }
}

pub fn setup_sim() -> Sim {
    Sim::new(&setup_config()).unwrap()
}

pub fn electron_config(name: &str) -> SpeciesConfig {
    SpeciesConfig {
        name: name.to_string(),
        physical_species: Some("electron".to_string()),
        charge: None,
        mass: None,
        do_classical_radiation_reaction: false,
        do_not_push: false,
        do_not_deposit: false,
        ionization_level: None,
        external_e: None,
        external_b: None,
        zinject_plane: None,
        rigid_advance: false,
        injection: None,
    }
}

/// Center and radius of the circle through three points of the x-y plane.
pub fn circle_through(p: [[Float; 2]; 3]) -> ([Float; 2], Float) {
    let [a, b, c] = p;
    let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
    let a2 = a[0] * a[0] + a[1] * a[1];
    let b2 = b[0] * b[0] + b[1] * b[1];
    let c2 = c[0] * c[0] + c[1] * c[1];
    let ux = (a2 * (b[1] - c[1]) + b2 * (c[1] - a[1]) + c2 * (a[1] - b[1])) / d;
    let uy = (a2 * (c[0] - b[0]) + b2 * (a[0] - c[0]) + c2 * (b[0] - a[0])) / d;
    let r = ((a[0] - ux).powi(2) + (a[1] - uy).powi(2)).sqrt();
    ([ux, uy], r)
}
