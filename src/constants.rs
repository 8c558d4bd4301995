// Unit conversions
pub const M_TO_FT: f64 = 3.28084;
pub const FT_TO_M: f64 = 0.3048;
pub const MPS_TO_KTS: f64 = 1.94384;
pub const KTS_TO_MPS: f64 = 0.514444;
pub const NM_TO_M: f64 = 1852.0;

// Standard cruise-phase speed change rates. Deceleration is gentler than
// acceleration on purpose: idle-thrust braking is slower than climb-thrust
// acceleration for a transport aircraft.
pub const ACCEL_M_S2: f64 = 0.97;
pub const DECEL_M_S2: f64 = -0.6325;

pub const SECONDS_PER_DAY: i64 = 86_400;
