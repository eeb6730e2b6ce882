use crate::consts::{M_E, M_P, Q_E};
use crate::error::PicError;
use crate::Float;
use std::fmt;
use std::str::FromStr;

/// Particle types with tabulated charge and mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalSpecies {
    Unspecified,
    Electron,
    Positron,
    Photon,
    Hydrogen,
    Helium,
    Boron,
    Carbon,
    Nitrogen,
    Oxygen,
    Copper,
}

impl FromStr for PhysicalSpecies {
    type Err = PicError;

    fn from_str(s: &str) -> Result<PhysicalSpecies, PicError> {
        use PhysicalSpecies::*;
        match s {
            "unspecified" => Ok(Unspecified),
            "electron" => Ok(Electron),
            "positron" => Ok(Positron),
            "photon" => Ok(Photon),
            "hydrogen" | "proton" => Ok(Hydrogen),
            "helium" | "alpha" => Ok(Helium),
            "boron" => Ok(Boron),
            "carbon" => Ok(Carbon),
            "nitrogen" => Ok(Nitrogen),
            "oxygen" => Ok(Oxygen),
            "copper" => Ok(Copper),
            _ => Err(PicError::UnknownSpecies(s.to_string())),
        }
    }
}

impl fmt::Display for PhysicalSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl PhysicalSpecies {
    /// Charge [C], `None` when unspecified.
    pub fn charge(self) -> Option<Float> {
        use PhysicalSpecies::*;
        match self {
            Unspecified => None,
            Electron => Some(-Q_E),
            Positron => Some(Q_E),
            Photon => Some(0.0),
            Hydrogen => Some(Q_E),
            Helium => Some(Q_E * 2.0),
            Boron => Some(Q_E * 5.0),
            Carbon => Some(Q_E * 6.0),
            Nitrogen => Some(Q_E * 7.0),
            Oxygen => Some(Q_E * 8.0),
            Copper => Some(Q_E * 29.0),
        }
    }

    /// Rest mass [kg], `None` when unspecified.
    pub fn mass(self) -> Option<Float> {
        use PhysicalSpecies::*;
        match self {
            Unspecified => None,
            Electron | Positron => Some(M_E),
            Photon => Some(0.0),
            Hydrogen => Some(M_P),
            Helium => Some(M_P * 3.97369),
            Boron => Some(M_P * 10.7319),
            Carbon => Some(M_E * 22032.0),
            Nitrogen => Some(M_E * 25716.9),
            Oxygen => Some(M_P * 15.8834),
            Copper => Some(M_P * 63.0864),
        }
    }

    pub fn name(self) -> &'static str {
        use PhysicalSpecies::*;
        match self {
            Unspecified => "unspecified",
            Electron => "electron",
            Positron => "positron",
            Photon => "photon",
            Hydrogen => "hydrogen",
            Helium => "helium",
            Boron => "boron",
            Carbon => "carbon",
            Nitrogen => "nitrogen",
            Oxygen => "oxygen",
            Copper => "copper",
        }
    }
}
