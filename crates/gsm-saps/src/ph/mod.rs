pub mod fields;

use gsm_core::{ChanNr, PhysChanConfig, TrxNr};

use crate::ph::fields::encryption::Encryption;
use crate::ph::fields::lchan_params::LchanParams;

/// MPH-INFO request: activate a logical channel (CHANNEL ACTIVATION)
#[derive(Debug)]
pub struct MphActivateReq {
    pub trx: TrxNr,
    pub chan_nr: ChanNr,
    pub params: LchanParams,
}

/// MPH-INFO request: change mode and/or ciphering of an active channel (MODE MODIFY)
#[derive(Debug)]
pub struct MphModifyReq {
    pub trx: TrxNr,
    pub chan_nr: ChanNr,
    pub params: LchanParams,
}

/// MPH-INFO request: deactivate a logical channel, or only its SACCH
#[derive(Debug)]
pub struct MphDeactivateReq {
    pub trx: TrxNr,
    pub chan_nr: ChanNr,
    pub sacch_only: bool,
}

/// MPH-INFO request: start ciphering in the given directions (ENCRYPTION COMMAND)
#[derive(Debug)]
pub struct MphActCiphReq {
    pub trx: TrxNr,
    pub chan_nr: ChanNr,
    /// New algorithm and key. None keeps the ones given at activation.
    pub encr: Option<Encryption>,
    pub uplink: bool,
    pub downlink: bool,
}

/// MPH-INFO request: toggle decoding of uplink access bursts (handover, group call talker)
#[derive(Debug)]
pub struct MphUlAccessReq {
    pub trx: TrxNr,
    pub chan_nr: ChanNr,
    pub enable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MphConfKind {
    Activate,
    Deactivate,
}

/// MPH-INFO confirm, cause 0 signals success
#[derive(Debug)]
pub struct MphInfoConf {
    pub trx: TrxNr,
    pub chan_nr: ChanNr,
    pub kind: MphConfKind,
    pub cause: u8,
}

/// Uplink measurement report of one received speech block, sent by the scheduler
#[derive(Debug)]
pub struct PhMeasInd {
    pub trx: TrxNr,
    pub chan_nr: ChanNr,
    /// Codec mode index (into the active codec set) the block was received with
    pub ul_ft: u8,
    /// Carrier to interference ratio in centibel
    pub ci_cb: i16,
}

/// Switch a dynamic timeslot to the given concrete kind
#[derive(Debug)]
pub struct TsConnectReq {
    pub trx: TrxNr,
    pub tn: u8,
    pub as_pchan: PhysChanConfig,
}

#[derive(Debug)]
pub struct TsDisconnectReq {
    pub trx: TrxNr,
    pub tn: u8,
}

/// Result of a `TsConnectReq`, cause 0 signals success
#[derive(Debug)]
pub struct TsConnectedInd {
    pub trx: TrxNr,
    pub tn: u8,
    pub cause: u8,
}

#[derive(Debug)]
pub struct TsDisconnectedInd {
    pub trx: TrxNr,
    pub tn: u8,
}
