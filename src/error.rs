use thiserror::Error;

/// Configuration errors. All of them are fatal: the run is aborted with
/// the offending value in the message.
#[derive(Error, Debug)]
pub enum PicError {
    #[error("Unknown particle pusher `{0}` (expected boris, vay or higuera)")]
    UnknownPusher(String),

    #[error("Unknown physical species `{0}`")]
    UnknownSpecies(String),

    #[error("Species `{0}` has no physical species and no explicit charge/mass")]
    UnspecifiedSpecies(String),

    #[error("Unknown grid type `{0}` (expected staggered or nodal)")]
    UnknownGridType(String),

    #[error("Interpolation order must be 1, 2 or 3, got {0}")]
    InterpolationOrder(usize),

    #[error("gamma_boost must be >= 1, got {0}")]
    InvalidBoost(f64),

    #[error("Invalid geometry: {0}")]
    Geometry(String),

    #[error("dt = {dt:e} s moves light further than one cell on level {lev} (dx = {dx:e} m)")]
    Courant { dt: f64, dx: f64, lev: usize },

    #[error("output_interval must be positive when write_output is set")]
    OutputInterval,

    #[error("Species `{name}`: {message}")]
    Species { name: String, message: String },
}

pub type PicResult<T> = Result<T, PicError>;
