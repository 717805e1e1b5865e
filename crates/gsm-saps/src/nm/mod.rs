use gsm_core::{AdmState, NmNackCause, NmObjClass, OpState, PhysChanConfig, TrxNr};

/// Addresses a managed object instance. Fields not meaningful for a class are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NmObj {
    pub class: NmObjClass,
    pub trx: TrxNr,
    pub tn: u8,
}

impl NmObj {
    pub fn new(class: NmObjClass) -> Self {
        Self { class, trx: 0, tn: 0 }
    }

    pub fn radio_carrier(trx: TrxNr) -> Self {
        Self { class: NmObjClass::RadioCarrier, trx, tn: 0 }
    }

    pub fn baseband_transceiver(trx: TrxNr) -> Self {
        Self { class: NmObjClass::BasebandTransceiver, trx, tn: 0 }
    }

    pub fn channel(trx: TrxNr, tn: u8) -> Self {
        Self { class: NmObjClass::Channel, trx, tn }
    }
}

/// OML message an ACK or NACK refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NmMsgType {
    SetBtsAttr,
    SetRadioAttr,
    SetChanAttr,
    Opstart,
    ChgAdmState,
}

/// Set BTS Attributes: cell-wide identity of the BTS
#[derive(Debug)]
pub struct NmSetBtsAttrReq {
    pub bsic: u8,
    pub c0_arfcn: u16,
}

/// Set Radio Carrier Attributes
#[derive(Debug)]
pub struct NmSetRadioAttrReq {
    pub trx: TrxNr,
    /// Ignored for C0, whose frequency is set through `NmSetBtsAttrReq`
    pub arfcn: u16,
    pub max_power_red_db: i32,
}

/// Set Channel Attributes
#[derive(Debug)]
pub struct NmSetChanAttrReq {
    pub trx: TrxNr,
    pub tn: u8,
    pub pchan: PhysChanConfig,
    pub tsc_set: u8,
    pub tsc: u8,
}

#[derive(Debug)]
pub struct NmOpstartReq {
    pub obj: NmObj,
}

#[derive(Debug)]
pub struct NmChgAdmStateReq {
    pub obj: NmObj,
    pub adm_state: AdmState,
}

/// The OML link to this carrier was lost, its transceiver must be shut down
#[derive(Debug)]
pub struct NmTrxCloseReq {
    pub trx: TrxNr,
}

#[derive(Debug)]
pub struct NmAck {
    pub obj: NmObj,
    pub msg_type: NmMsgType,
}

#[derive(Debug)]
pub struct NmNack {
    pub obj: NmObj,
    pub msg_type: NmMsgType,
    pub cause: NmNackCause,
}

/// State Changed Event Report
#[derive(Debug)]
pub struct NmOpStateInd {
    pub obj: NmObj,
    pub op_state: OpState,
}
