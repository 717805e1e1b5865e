use gsm_core::TrxNr;

/// Start ramping the output power of a carrier towards `target_mdbm`
#[derive(Debug)]
pub struct PowerRampReq {
    pub trx: TrxNr,
    /// Returned in `PowerRampConf`. A newer request for the same carrier replaces this one.
    pub token: u32,
    pub target_mdbm: i32,
    /// Output power at the time of the request
    pub cur_mdbm: i32,
    /// Maximum output power of the carrier
    pub max_mdbm: i32,
    /// Do not limit the target to the nominal power
    pub bypass: bool,
}

/// The ramp with the given token reached its target
#[derive(Debug)]
pub struct PowerRampConf {
    pub trx: TrxNr,
    pub token: u32,
}

/// Ramp step: apply a new output power
#[derive(Debug)]
pub struct ChangePowerReq {
    pub trx: TrxNr,
    pub p_trxout_mdbm: i32,
}

/// The transceiver applied a new output power
#[derive(Debug)]
pub struct PowerChangedInd {
    pub trx: TrxNr,
    pub p_trxout_mdbm: i32,
}
