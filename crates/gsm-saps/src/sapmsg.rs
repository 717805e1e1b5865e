use core::fmt::Display;

use gsm_core::Sap;
use gsm_core::bts_entities::BtsEntity;

use super::nm::*;
use super::pcu::*;
use super::ph::*;
use super::pwr::*;
use super::trxc::*;


/// Exhaustive list of primitives for use in the SapMsg struct
#[derive(Debug)]
pub enum SapMsgInner {

    // PH-SAP (RSL <-> L1, scheduler -> L1)
    MphActivateReq(MphActivateReq),
    MphModifyReq(MphModifyReq),
    MphDeactivateReq(MphDeactivateReq),
    MphActCiphReq(MphActCiphReq),
    MphUlAccessReq(MphUlAccessReq),
    MphInfoConf(MphInfoConf),
    PhMeasInd(PhMeasInd),
    TsConnectReq(TsConnectReq),
    TsDisconnectReq(TsDisconnectReq),
    TsConnectedInd(TsConnectedInd),
    TsDisconnectedInd(TsDisconnectedInd),

    // NM-SAP (OML <-> L1)
    NmSetBtsAttrReq(NmSetBtsAttrReq),
    NmSetRadioAttrReq(NmSetRadioAttrReq),
    NmSetChanAttrReq(NmSetChanAttrReq),
    NmOpstartReq(NmOpstartReq),
    NmChgAdmStateReq(NmChgAdmStateReq),
    NmTrxCloseReq(NmTrxCloseReq),
    NmAck(NmAck),
    NmNack(NmNack),
    NmOpStateInd(NmOpStateInd),

    // TRXC-SAP (L1 <-> transceiver control link)
    TrxcCmdReq(TrxcCmdReq),
    TrxcCmdRsp(TrxcCmdRsp),

    // PWR-SAP (L1 <-> power ramp executor)
    PowerRampReq(PowerRampReq),
    PowerRampConf(PowerRampConf),
    ChangePowerReq(ChangePowerReq),
    PowerChangedInd(PowerChangedInd),

    // PCU-SAP
    PcuInfoInd(PcuInfoInd),
}

impl Display for SapMsgInner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            // PH-SAP
            SapMsgInner::MphActivateReq(_) => write!(f, "MphActivateReq"),
            SapMsgInner::MphModifyReq(_) => write!(f, "MphModifyReq"),
            SapMsgInner::MphDeactivateReq(_) => write!(f, "MphDeactivateReq"),
            SapMsgInner::MphActCiphReq(_) => write!(f, "MphActCiphReq"),
            SapMsgInner::MphUlAccessReq(_) => write!(f, "MphUlAccessReq"),
            SapMsgInner::MphInfoConf(_) => write!(f, "MphInfoConf"),
            SapMsgInner::PhMeasInd(_) => write!(f, "PhMeasInd"),
            SapMsgInner::TsConnectReq(_) => write!(f, "TsConnectReq"),
            SapMsgInner::TsDisconnectReq(_) => write!(f, "TsDisconnectReq"),
            SapMsgInner::TsConnectedInd(_) => write!(f, "TsConnectedInd"),
            SapMsgInner::TsDisconnectedInd(_) => write!(f, "TsDisconnectedInd"),

            // NM-SAP
            SapMsgInner::NmSetBtsAttrReq(_) => write!(f, "NmSetBtsAttrReq"),
            SapMsgInner::NmSetRadioAttrReq(_) => write!(f, "NmSetRadioAttrReq"),
            SapMsgInner::NmSetChanAttrReq(_) => write!(f, "NmSetChanAttrReq"),
            SapMsgInner::NmOpstartReq(_) => write!(f, "NmOpstartReq"),
            SapMsgInner::NmChgAdmStateReq(_) => write!(f, "NmChgAdmStateReq"),
            SapMsgInner::NmTrxCloseReq(_) => write!(f, "NmTrxCloseReq"),
            SapMsgInner::NmAck(_) => write!(f, "NmAck"),
            SapMsgInner::NmNack(_) => write!(f, "NmNack"),
            SapMsgInner::NmOpStateInd(_) => write!(f, "NmOpStateInd"),

            // TRXC-SAP
            SapMsgInner::TrxcCmdReq(_) => write!(f, "TrxcCmdReq"),
            SapMsgInner::TrxcCmdRsp(_) => write!(f, "TrxcCmdRsp"),

            // PWR-SAP
            SapMsgInner::PowerRampReq(_) => write!(f, "PowerRampReq"),
            SapMsgInner::PowerRampConf(_) => write!(f, "PowerRampConf"),
            SapMsgInner::ChangePowerReq(_) => write!(f, "ChangePowerReq"),
            SapMsgInner::PowerChangedInd(_) => write!(f, "PowerChangedInd"),

            // PCU-SAP
            SapMsgInner::PcuInfoInd(_) => write!(f, "PcuInfoInd"),
        }
    }
}

#[derive(Debug)]
pub struct SapMsg {
    pub sap: Sap,
    pub src: BtsEntity,
    pub dest: BtsEntity,
    pub msg: SapMsgInner
}

impl SapMsg {
    pub fn new(
        sap: Sap,
        src: BtsEntity,
        dest: BtsEntity,
        msg: SapMsgInner
    ) -> Self {
        Self {
            sap,
            src,
            dest,
            msg
        }
    }

    pub fn get_source(&self) -> &BtsEntity {
        &self.src
    }
    pub fn get_dest(&self) -> &BtsEntity {
        &self.dest
    }
    pub fn get_sap(&self) -> &Sap {
        &self.sap
    }
}
