//! Relativistic momentum pushers.
//!
//! Every pusher advances the momentum per unit mass u = gamma * v [m/s] of
//! one particle by a full timestep, given the fields gathered at the
//! particle position. The variants are different physics, they only agree
//! in the non-relativistic limit without radiation.

use crate::consts::{C, EP0, INV_C2, PI};
use crate::error::PicError;
use crate::Float;
use std::fmt;
use std::str::FromStr;

/// The pusher named in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PusherAlgo {
    Boris,
    Vay,
    HigueraCary,
}

impl FromStr for PusherAlgo {
    type Err = PicError;

    fn from_str(s: &str) -> Result<PusherAlgo, PicError> {
        match s.to_lowercase().as_str() {
            "boris" => Ok(PusherAlgo::Boris),
            "vay" => Ok(PusherAlgo::Vay),
            "higuera" | "higuera-cary" | "higueracary" => Ok(PusherAlgo::HigueraCary),
            _ => Err(PicError::UnknownPusher(s.to_string())),
        }
    }
}

impl fmt::Display for PusherAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PusherAlgo::Boris => "boris",
            PusherAlgo::Vay => "vay",
            PusherAlgo::HigueraCary => "higuera",
        };
        write!(f, "{}", name)
    }
}

/// The momentum update actually run in the particle loop. Chosen once per
/// species; radiation reaction takes precedence over the configured algo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pusher {
    Boris,
    Vay,
    HigueraCary,
    BorisRadiationReaction,
}

impl Pusher {
    pub fn select(algo: PusherAlgo, do_classical_radiation_reaction: bool) -> Pusher {
        if do_classical_radiation_reaction {
            return Pusher::BorisRadiationReaction;
        }
        match algo {
            PusherAlgo::Boris => Pusher::Boris,
            PusherAlgo::Vay => Pusher::Vay,
            PusherAlgo::HigueraCary => Pusher::HigueraCary,
        }
    }

    #[inline(always)]
    pub fn update_momentum(
        self,
        u: &mut [Float; 3],
        e: [Float; 3],
        b: [Float; 3],
        q: Float,
        m: Float,
        dt: Float,
    ) {
        match self {
            Pusher::Boris => update_momentum_boris(u, e, b, q, m, dt),
            Pusher::Vay => update_momentum_vay(u, e, b, q, m, dt),
            Pusher::HigueraCary => update_momentum_higuera_cary(u, e, b, q, m, dt),
            Pusher::BorisRadiationReaction => {
                update_momentum_boris_with_radiation_reaction(u, e, b, q, m, dt)
            }
        }
    }
}

#[inline(always)]
pub fn lorentz_factor(u: [Float; 3]) -> Float {
    (1.0 + (u[0] * u[0] + u[1] * u[1] + u[2] * u[2]) * INV_C2).sqrt()
}

/// x += dt * u / gamma, with gamma of the (new) momentum.
#[inline(always)]
pub fn update_position(x: &mut [Float; 3], u: [Float; 3], dt: Float) {
    let c1 = dt * lorentz_factor(u).powi(-1);
    x[0] += c1 * u[0];
    x[1] += c1 * u[1];
    x[2] += c1 * u[2];
}

/// Boris (1970): half electric kick, magnetic rotation, half kick.
#[inline(always)]
pub fn update_momentum_boris(
    u: &mut [Float; 3],
    e: [Float; 3],
    b: [Float; 3],
    q: Float,
    m: Float,
    dt: Float,
) {
    let econst = 0.5 * q * dt / m;
    let ext = econst * e[0];
    let eyt = econst * e[1];
    let ezt = econst * e[2];

    let ux = u[0] + ext;
    let uy = u[1] + eyt;
    let uz = u[2] + ezt;
    let gt = (1. + (ux * ux + uy * uy + uz * uz) * INV_C2).sqrt().powi(-1);

    let bxt = econst * gt * b[0];
    let byt = econst * gt * b[1];
    let bzt = econst * gt * b[2];

    let boris = 2.0 * (1.0 + bxt * bxt + byt * byt + bzt * bzt).powi(-1);

    let uxt = ux + uy * bzt - uz * byt;
    let uyt = uy + uz * bxt - ux * bzt;
    let uzt = uz + ux * byt - uy * bxt;

    u[0] = ux + boris * (uyt * bzt - uzt * byt) + ext;
    u[1] = uy + boris * (uzt * bxt - uxt * bzt) + eyt;
    u[2] = uz + boris * (uxt * byt - uyt * bxt) + ezt;
}

/// Vay (2008): implicit in the time-centred velocity, gets the E x B drift
/// of relativistic particles right.
#[inline(always)]
pub fn update_momentum_vay(
    u: &mut [Float; 3],
    e: [Float; 3],
    b: [Float; 3],
    q: Float,
    m: Float,
    dt: Float,
) {
    let econst = q * dt / m;
    let bconst = 0.5 * q * dt / m;
    let inv_c = 1.0 / C;
    let [ux, uy, uz] = *u;

    let inv_gamma = lorentz_factor(*u).powi(-1);
    let taux = bconst * b[0];
    let tauy = bconst * b[1];
    let tauz = bconst * b[2];
    let tausq = taux * taux + tauy * tauy + tauz * tauz;

    // u' and gamma'^2
    let uxpr = ux + econst * e[0] + (uy * tauz - uz * tauy) * inv_gamma;
    let uypr = uy + econst * e[1] + (uz * taux - ux * tauz) * inv_gamma;
    let uzpr = uz + econst * e[2] + (ux * tauy - uy * taux) * inv_gamma;
    let gprsq = 1.0 + (uxpr * uxpr + uypr * uypr + uzpr * uzpr) * INV_C2;

    let ust = (uxpr * taux + uypr * tauy + uzpr * tauz) * inv_c;
    let sigma = gprsq - tausq;
    let gisq = 2.0 / (sigma + (sigma * sigma + 4.0 * (tausq + ust * ust)).sqrt());

    let bg = bconst * gisq.sqrt();
    let tx = bg * b[0];
    let ty = bg * b[1];
    let tz = bg * b[2];
    let s = 1.0 / (1.0 + tausq * gisq);
    let tu = tx * uxpr + ty * uypr + tz * uzpr;

    u[0] = s * (uxpr + tx * tu + uypr * tz - uzpr * ty);
    u[1] = s * (uypr + ty * tu + uzpr * tx - uxpr * tz);
    u[2] = s * (uzpr + tz * tu + uxpr * ty - uypr * tx);
}

/// Higuera & Cary (2017): volume preserving like Boris, with the gamma of
/// the rotation taken from the Vay solution.
#[inline(always)]
pub fn update_momentum_higuera_cary(
    u: &mut [Float; 3],
    e: [Float; 3],
    b: [Float; 3],
    q: Float,
    m: Float,
    dt: Float,
) {
    let qmt = 0.5 * q * dt / m;

    // u minus
    let umx = u[0] + qmt * e[0];
    let umy = u[1] + qmt * e[1];
    let umz = u[2] + qmt * e[2];
    let gamma_m_sq = 1.0 + (umx * umx + umy * umy + umz * umz) * INV_C2;

    let betax = qmt * b[0];
    let betay = qmt * b[1];
    let betaz = qmt * b[2];
    let betam = betax * betax + betay * betay + betaz * betaz;

    let sigma = gamma_m_sq - betam;
    let ust = (umx * betax + umy * betay + umz * betaz) / C;
    let gamma = (0.5 * (sigma + (sigma * sigma + 4.0 * (betam + ust * ust)).sqrt())).sqrt();

    let tx = betax / gamma;
    let ty = betay / gamma;
    let tz = betaz / gamma;
    let s = 1.0 / (1.0 + tx * tx + ty * ty + tz * tz);
    let umt = umx * tx + umy * ty + umz * tz;

    // u plus
    let upx = s * (umx + umt * tx + umy * tz - umz * ty);
    let upy = s * (umy + umt * ty + umz * tx - umx * tz);
    let upz = s * (umz + umt * tz + umx * ty - umy * tx);

    u[0] = upx + qmt * e[0] + upy * tz - upz * ty;
    u[1] = upy + qmt * e[1] + upz * tx - upx * tz;
    u[2] = upz + qmt * e[2] + upx * ty - upy * tx;
}

/// Boris push followed by the Landau-Lifshitz classical radiation reaction
/// force (without the field derivative term), evaluated at the time-centred
/// momentum.
#[inline(always)]
pub fn update_momentum_boris_with_radiation_reaction(
    u: &mut [Float; 3],
    e: [Float; 3],
    b: [Float; 3],
    q: Float,
    m: Float,
    dt: Float,
) {
    let u_old = *u;
    update_momentum_boris(u, e, b, q, m, dt);

    // normalized momentum at integer time
    let ux_n = (u[0] + u_old[0]) * 0.5 / C;
    let uy_n = (u[1] + u_old[1]) * 0.5 / C;
    let uz_n = (u[2] + u_old[2]) * 0.5 / C;
    let gamma_n = (1.0 + ux_n * ux_n + uy_n * uy_n + uz_n * uz_n).sqrt();
    let inv_gamma_n = 1.0 / gamma_n;

    let bx_n = ux_n * inv_gamma_n;
    let by_n = uy_n * inv_gamma_n;
    let bz_n = uz_n * inv_gamma_n;
    let vx_n = bx_n * C;
    let vy_n = by_n * C;
    let vz_n = bz_n * C;

    // Lorentz force over charge
    let flx_q = e[0] + vy_n * b[2] - vz_n * b[1];
    let fly_q = e[1] + vz_n * b[0] - vx_n * b[2];
    let flz_q = e[2] + vx_n * b[1] - vy_n * b[0];
    let fl_q2 = flx_q * flx_q + fly_q * fly_q + flz_q * flz_q;

    let bdot_e = bx_n * e[0] + by_n * e[1] + bz_n * e[2];
    let coeff = gamma_n * gamma_n * (fl_q2 - bdot_e * bdot_e);

    let q2 = q * q;
    let rr_coeff = (2.0 / 3.0) * q2 * q2 / (4.0 * PI * EP0 * m * m * m * C * C * C * C);

    let frx = rr_coeff * (C * (fly_q * b[2] - flz_q * b[1]) + bdot_e * e[0] - coeff * bx_n);
    let fry = rr_coeff * (C * (flz_q * b[0] - flx_q * b[2]) + bdot_e * e[1] - coeff * by_n);
    let frz = rr_coeff * (C * (flx_q * b[1] - fly_q * b[0]) + bdot_e * e[2] - coeff * bz_n);

    u[0] += frx * dt;
    u[1] += fry * dt;
    u[2] += frz * dt;
}
