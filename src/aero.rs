//! ISA standard atmosphere and airspeed conversions (CAS/TAS/Mach).
//!
//! Advisory speeds are solved in CAS but time-over-distance is flown in TAS,
//! so every solver pass round-trips through these conversions at the segment
//! altitude.

const G: f64 = 9.80665;

const T0: f64 = 288.15; // sea-level temperature (K)
const P0: f64 = 101_325.0; // sea-level pressure (Pa)
const RHO0: f64 = 1.225; // sea-level density (kg/m³)
const L: f64 = -0.0065; // troposphere lapse rate (K/m)
const R: f64 = 287.058; // specific gas constant (J/(kg·K))
const GAMMA: f64 = 1.4; // ratio of specific heats

// --- Atmosphere (ISA standard model) ---

pub struct Atmosphere {
    pub density: f64,        // kg/m³
    pub temperature: f64,    // K
    pub pressure: f64,       // Pa
    pub speed_of_sound: f64, // m/s
}

impl Atmosphere {
    pub fn at_altitude(alt_m: f64) -> Self {
        let alt = alt_m.max(0.0);

        if alt < 11_000.0 {
            let t = T0 + L * alt;
            let p = P0 * (t / T0).powf(-G / (L * R));
            let rho = p / (R * t);
            let a = (GAMMA * R * t).sqrt();
            Self { density: rho, temperature: t, pressure: p, speed_of_sound: a }
        } else {
            // Stratosphere: constant temperature
            let t11 = T0 + L * 11_000.0;
            let p11 = P0 * (t11 / T0).powf(-G / (L * R));
            let t = t11;
            let p = p11 * ((-G / (R * t)) * (alt - 11_000.0)).exp();
            let rho = p / (R * t);
            let a = (GAMMA * R * t).sqrt();
            Self { density: rho, temperature: t, pressure: p, speed_of_sound: a }
        }
    }
}

// --- Airspeed conversions ---

/// Calibrated airspeed (m/s) to true airspeed (m/s) at a given altitude.
/// Compressible flow: CAS defines an impact pressure against the sea-level
/// atmosphere, which the local atmosphere converts back to a true speed.
pub fn cas_to_tas(cas_m_s: f64, alt_m: f64) -> f64 {
    let atmo = Atmosphere::at_altitude(alt_m);
    let qdyn = P0 * ((1.0 + RHO0 * cas_m_s * cas_m_s / (7.0 * P0)).powf(3.5) - 1.0);
    (7.0 * atmo.pressure / atmo.density * ((1.0 + qdyn / atmo.pressure).powf(2.0 / 7.0) - 1.0))
        .sqrt()
}

/// True airspeed (m/s) to calibrated airspeed (m/s) at a given altitude.
pub fn tas_to_cas(tas_m_s: f64, alt_m: f64) -> f64 {
    let atmo = Atmosphere::at_altitude(alt_m);
    let qdyn = atmo.pressure
        * ((1.0 + atmo.density * tas_m_s * tas_m_s / (7.0 * atmo.pressure)).powf(3.5) - 1.0);
    (7.0 * P0 / RHO0 * ((qdyn / P0 + 1.0).powf(2.0 / 7.0) - 1.0)).sqrt()
}

/// Mach number to true airspeed (m/s) at a given altitude.
pub fn mach_to_tas(mach: f64, alt_m: f64) -> f64 {
    mach * Atmosphere::at_altitude(alt_m).speed_of_sound
}

/// True airspeed (m/s) to Mach number at a given altitude.
pub fn tas_to_mach(tas_m_s: f64, alt_m: f64) -> f64 {
    tas_m_s / Atmosphere::at_altitude(alt_m).speed_of_sound
}
