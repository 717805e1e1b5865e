//! Power levels are carried as milli-dB(m) integers throughout the stack

/// Output power a carrier ramps down to before its RF is muted (-10 dBm)
pub const RF_DISABLED_MDBM: i32 = to_mdb(-10);

#[inline]
pub const fn to_mdb(db: i32) -> i32 {
    db * 1000
}

/// Truncating conversion, matches the integer attenuation steps of the transceiver
#[inline]
pub const fn from_mdb(mdb: i32) -> i32 {
    mdb / 1000
}
