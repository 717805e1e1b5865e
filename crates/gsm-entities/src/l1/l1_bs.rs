use gsm_config::SharedConfig;
use gsm_core::bts_entities::BtsEntity;
use gsm_core::{AdmState, ChanNr, NmNackCause, NmObjClass, OpState, PhysChanConfig, Sap, TrxNr, assert_warn};
use gsm_saps::nm::{NmMsgType, NmObj};
use gsm_saps::ph::{TsConnectedInd, TsDisconnectedInd};
use gsm_saps::trxc::{ProvisioningRequest, TrxcCmdRsp};
use gsm_saps::{SapMsg, SapMsgInner};

use crate::l1::components::carrier::{CiphState, LchanState, RadioCarrier, carrier_mut};
use crate::l1::components::nm_reply::{send_ack, send_nack, send_op_state};
use crate::l1::components::provision::ProvErr;
use crate::l1::components::{adm_state, lchan, pchan_resolver, power_ctrl};
use crate::sched::L1Scheduler;
use crate::{BtsEntityTrait, MessageQueue};

/// Layer 1 model of the BTS. Owns all carriers with their timeslots and logical channels,
/// and drives the scheduler, the transceiver link and the power ramp executor.
pub struct TrxL1Bs<S: L1Scheduler> {
    config: SharedConfig,
    pub carriers: Vec<RadioCarrier>,
    pub sched: S,
}

impl<S: L1Scheduler> TrxL1Bs<S> {
    pub fn new(config: SharedConfig, sched: S) -> Self {
        let cfg = config.config();
        let carriers = cfg.trx.iter().enumerate()
            .map(|(trx, c)| {
                tracing::info!(trx = trx, "nominal power {} dBm, {} timeslots enabled",
                    c.nominal_power_dbm, cfg.enabled_timeslots(trx));
                RadioCarrier::new(trx as TrxNr, c)
            })
            .collect();

        Self { config, carriers, sched }
    }

    pub fn carrier(&self, trx: TrxNr) -> Option<&RadioCarrier> {
        self.carriers.get(trx as usize)
    }

    /// Borrow a carrier together with the scheduler
    fn split(&mut self, trx: TrxNr) -> Option<(&mut RadioCarrier, &mut S)> {
        match carrier_mut(&mut self.carriers, trx) {
            Ok(carrier) => Some((carrier, &mut self.sched)),
            Err(e) => {
                tracing::warn!("dropping request: {}", e);
                None
            }
        }
    }

    fn rx_mph_activate_req(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_mph_activate_req");
        let SapMsgInner::MphActivateReq(prim) = message.msg else { panic!() };
        let Some((carrier, sched)) = self.split(prim.trx) else { return };

        if let Err(e) = lchan::activate(carrier, sched, queue, prim.chan_nr, prim.params) {
            tracing::warn!(trx = prim.trx, "cannot activate {}: {}", prim.chan_nr, e);
        }
    }

    fn rx_mph_modify_req(&mut self, _queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_mph_modify_req");
        let SapMsgInner::MphModifyReq(prim) = message.msg else { panic!() };
        let Some((carrier, sched)) = self.split(prim.trx) else { return };

        if let Err(e) = lchan::modify(carrier, sched, prim.chan_nr, prim.params) {
            tracing::warn!(trx = prim.trx, "cannot modify {}: {}", prim.chan_nr, e);
        }
    }

    fn rx_mph_deactivate_req(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_mph_deactivate_req");
        let SapMsgInner::MphDeactivateReq(prim) = message.msg else { panic!() };
        let Some((carrier, sched)) = self.split(prim.trx) else { return };

        if let Err(e) = lchan::deactivate(carrier, sched, queue, prim.chan_nr, prim.sacch_only) {
            tracing::warn!(trx = prim.trx, "cannot deactivate {}: {}", prim.chan_nr, e);
        }
    }

    fn rx_mph_act_ciph_req(&mut self, _queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_mph_act_ciph_req");
        let SapMsgInner::MphActCiphReq(prim) = message.msg else { panic!() };
        let Some((carrier, sched)) = self.split(prim.trx) else { return };

        if let Err(e) = lchan::set_ciphering(carrier, sched, prim.chan_nr, prim.encr, prim.uplink, prim.downlink) {
            tracing::warn!(trx = prim.trx, "cannot set ciphering on {}: {}", prim.chan_nr, e);
        }
    }

    fn rx_mph_ul_access_req(&mut self, _queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_mph_ul_access_req");
        let SapMsgInner::MphUlAccessReq(prim) = message.msg else { panic!() };
        let Some((carrier, sched)) = self.split(prim.trx) else { return };

        if let Err(e) = lchan::set_uplink_access(carrier, sched, prim.chan_nr, prim.enable) {
            tracing::warn!(trx = prim.trx, "cannot set uplink access on {}: {}", prim.chan_nr, e);
        }
    }

    fn rx_ph_meas_ind(&mut self, _queue: &mut MessageQueue, message: SapMsg) {
        let SapMsgInner::PhMeasInd(prim) = message.msg else { panic!() };
        let Some((carrier, sched)) = self.split(prim.trx) else { return };

        let lchan = match carrier.lchan_mut(prim.chan_nr) {
            Ok(lchan) => lchan,
            Err(e) => {
                tracing::warn!(trx = prim.trx, "measurement for {}", e);
                return;
            }
        };
        if lchan.state != LchanState::Active {
            return;
        }
        if let Some(cmr) = lchan.amr_loop.input(prim.ul_ft, prim.ci_cb, prim.chan_nr.is_half_rate()) {
            sched.set_amr_cmr(prim.trx, prim.chan_nr, cmr);
        }
    }

    fn send_ts_connected(queue: &mut MessageQueue, trx: TrxNr, tn: u8, cause: u8) {
        queue.push_back(SapMsg::new(
            Sap::PhSap,
            BtsEntity::L1,
            BtsEntity::Rsl,
            SapMsgInner::TsConnectedInd(TsConnectedInd { trx, tn, cause }),
        ));
    }

    fn rx_ts_connect_req(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_ts_connect_req");
        let SapMsgInner::TsConnectReq(prim) = message.msg else { panic!() };
        let Some((carrier, sched)) = self.split(prim.trx) else { return };
        tracing::debug!(trx = prim.trx, "connecting TS{} as {}", prim.tn, prim.as_pchan);

        let Some(ts) = carrier.ts.get_mut(prim.tn as usize).filter(|ts| ts.pchan.is_dynamic()) else {
            tracing::warn!(trx = prim.trx, "TS{} is not a dynamic timeslot", prim.tn);
            Self::send_ts_connected(queue, prim.trx, prim.tn, NmNackCause::CantPerform.into_raw() as u8);
            return;
        };
        ts.dyn_want = prim.as_pchan;

        match pchan_resolver::apply(carrier, sched, queue, prim.tn, prim.as_pchan) {
            Ok(token) => {
                // Completes with the SETSLOT response
                carrier.ts[prim.tn as usize].pending_connect = Some(token);
            }
            Err(e) => {
                tracing::warn!(trx = prim.trx, "cannot connect TS{} as {}: {}", prim.tn, prim.as_pchan, e);
                let ts = &mut carrier.ts[prim.tn as usize];
                ts.dyn_want = ts.dyn_is;
                Self::send_ts_connected(queue, prim.trx, prim.tn, e.nack_cause().into_raw() as u8);
            }
        }
    }

    fn rx_ts_disconnect_req(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_ts_disconnect_req");
        let SapMsgInner::TsDisconnectReq(prim) = message.msg else { panic!() };

        // Nothing to tear down on the transceiver
        queue.push_back(SapMsg::new(
            Sap::PhSap,
            BtsEntity::L1,
            BtsEntity::Rsl,
            SapMsgInner::TsDisconnectedInd(TsDisconnectedInd { trx: prim.trx, tn: prim.tn }),
        ));
    }

    fn rx_ph_prim(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        match message.msg {
            SapMsgInner::MphActivateReq(_) => self.rx_mph_activate_req(queue, message),
            SapMsgInner::MphModifyReq(_) => self.rx_mph_modify_req(queue, message),
            SapMsgInner::MphDeactivateReq(_) => self.rx_mph_deactivate_req(queue, message),
            SapMsgInner::MphActCiphReq(_) => self.rx_mph_act_ciph_req(queue, message),
            SapMsgInner::MphUlAccessReq(_) => self.rx_mph_ul_access_req(queue, message),
            SapMsgInner::PhMeasInd(_) => self.rx_ph_meas_ind(queue, message),
            SapMsgInner::TsConnectReq(_) => self.rx_ts_connect_req(queue, message),
            SapMsgInner::TsDisconnectReq(_) => self.rx_ts_disconnect_req(queue, message),
            _ => panic!("unexpected PH-SAP primitive {}", message.msg),
        }
    }

    fn rx_set_bts_attr(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_set_bts_attr");
        let SapMsgInner::NmSetBtsAttrReq(prim) = message.msg else { panic!() };

        // C0 carries the cell's frequency, every carrier the cell's identity
        for carrier in self.carriers.iter_mut() {
            if carrier.trx == 0 {
                carrier.arfcn = Some(prim.c0_arfcn);
                carrier.prov.set_frequency(queue, prim.c0_arfcn);
            }
            carrier.bsic = Some(prim.bsic);
            carrier.prov.set_identity(queue, prim.bsic);
        }
        send_ack(queue, NmObj::new(NmObjClass::Bts), NmMsgType::SetBtsAttr);
    }

    fn rx_set_radio_attr(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_set_radio_attr");
        let SapMsgInner::NmSetRadioAttrReq(prim) = message.msg else { panic!() };
        let obj = NmObj::radio_carrier(prim.trx);
        let Ok(carrier) = carrier_mut(&mut self.carriers, prim.trx) else {
            send_nack(queue, obj, NmMsgType::SetRadioAttr, NmNackCause::CantPerform);
            return;
        };

        carrier.max_power_red_db = prim.max_power_red_db;
        if carrier.trx != 0 {
            carrier.arfcn = Some(prim.arfcn);
            carrier.prov.set_frequency(queue, prim.arfcn);
        }

        // Follow a changed power reduction right away when transmitting
        if carrier.forced_max_power_red_db.is_none()
            && carrier.prov.is_powered()
            && carrier.adm_state == AdmState::Unlocked
        {
            if let Err(e) = power_ctrl::start_operating_ramp(carrier, queue) {
                tracing::warn!(trx = prim.trx, "cannot apply max power reduction {} dB: {}", prim.max_power_red_db, e);
            }
        }
        send_ack(queue, obj, NmMsgType::SetRadioAttr);
    }

    fn rx_set_chan_attr(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_set_chan_attr");
        let SapMsgInner::NmSetChanAttrReq(prim) = message.msg else { panic!() };
        let obj = NmObj::channel(prim.trx, prim.tn);
        let Ok(carrier) = carrier_mut(&mut self.carriers, prim.trx) else {
            send_nack(queue, obj, NmMsgType::SetChanAttr, NmNackCause::CantPerform);
            return;
        };
        let Some(ts) = carrier.ts.get_mut(prim.tn as usize) else {
            send_nack(queue, obj, NmMsgType::SetChanAttr, NmNackCause::ResNotAvail);
            return;
        };

        assert_warn!(ts.pending_connect.is_none(), "channel attributes set on TS{} during a dynamic switch", prim.tn);
        ts.pchan = prim.pchan;
        ts.tsc_set = prim.tsc_set;
        ts.tsc = prim.tsc;
        ts.pending_connect = None;
        if prim.pchan.is_dynamic() {
            ts.dyn_is = pchan_resolver::initial_dyn_kind(prim.pchan);
            ts.dyn_want = ts.dyn_is;
        }
        let kind = pchan_resolver::effective_kind(ts);

        match pchan_resolver::apply(carrier, &mut self.sched, queue, prim.tn, kind) {
            Ok(_) => send_ack(queue, obj, NmMsgType::SetChanAttr),
            Err(e) => {
                tracing::warn!(trx = prim.trx, "cannot configure TS{} as {}: {}", prim.tn, kind, e);
                send_nack(queue, obj, NmMsgType::SetChanAttr, e.nack_cause());
            }
        }
    }

    fn rx_opstart(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_opstart");
        let SapMsgInner::NmOpstartReq(prim) = message.msg else { panic!() };
        let obj = prim.obj;

        match obj.class {
            NmObjClass::SiteManager
            | NmObjClass::Bts
            | NmObjClass::BasebandTransceiver
            | NmObjClass::Channel
            | NmObjClass::GprsNse
            | NmObjClass::GprsCell
            | NmObjClass::GprsNsvc => {
                send_ack(queue, obj, NmMsgType::Opstart);
            }
            NmObjClass::RadioCarrier => {
                let Ok(carrier) = carrier_mut(&mut self.carriers, obj.trx) else {
                    send_nack(queue, obj, NmMsgType::Opstart, NmNackCause::CantPerform);
                    return;
                };
                // Acknowledged once the transceiver confirms power-on
                if let Err(e) = carrier.prov.enable(queue) {
                    tracing::warn!(trx = obj.trx, "cannot power on transceiver: {:?}", e);
                    send_nack(queue, obj, NmMsgType::Opstart, NmNackCause::CantPerform);
                }
            }
            NmObjClass::Other(_) => {
                send_nack(queue, obj, NmMsgType::Opstart, NmNackCause::ObjClassNotSupp);
            }
        }
    }

    fn rx_chg_adm_state(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_chg_adm_state");
        let SapMsgInner::NmChgAdmStateReq(prim) = message.msg else { panic!() };

        if prim.obj.class != NmObjClass::RadioCarrier {
            send_ack(queue, prim.obj, NmMsgType::ChgAdmState);
            return;
        }
        let Ok(carrier) = carrier_mut(&mut self.carriers, prim.obj.trx) else {
            send_nack(queue, prim.obj, NmMsgType::ChgAdmState, NmNackCause::CantPerform);
            return;
        };
        adm_state::request(carrier, queue, prim.obj, prim.adm_state);
    }

    fn rx_trx_close(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::trace!("rx_trx_close");
        let SapMsgInner::NmTrxCloseReq(prim) = message.msg else { panic!() };
        let Ok(carrier) = carrier_mut(&mut self.carriers, prim.trx) else {
            tracing::warn!("close of unknown trx {}", prim.trx);
            return;
        };

        tracing::info!(trx = prim.trx, "closing transceiver");
        adm_state::abandon(carrier, queue);
        carrier.ramp_after_nominal = false;
        carrier.prov.close(queue);
        send_op_state(queue, NmObj::radio_carrier(prim.trx), OpState::Disabled);
        send_op_state(queue, NmObj::baseband_transceiver(prim.trx), OpState::Disabled);
    }

    fn rx_nm_prim(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        match message.msg {
            SapMsgInner::NmSetBtsAttrReq(_) => self.rx_set_bts_attr(queue, message),
            SapMsgInner::NmSetRadioAttrReq(_) => self.rx_set_radio_attr(queue, message),
            SapMsgInner::NmSetChanAttrReq(_) => self.rx_set_chan_attr(queue, message),
            SapMsgInner::NmOpstartReq(_) => self.rx_opstart(queue, message),
            SapMsgInner::NmChgAdmStateReq(_) => self.rx_chg_adm_state(queue, message),
            SapMsgInner::NmTrxCloseReq(_) => self.rx_trx_close(queue, message),
            _ => panic!("unexpected NM-SAP primitive {}", message.msg),
        }
    }

    /// The transceiver confirmed power-on
    fn on_powered(carrier: &mut RadioCarrier, queue: &mut MessageQueue) {
        let mute = carrier.adm_state != AdmState::Unlocked;
        carrier.prov.set_rf_mute(queue, mute);
        carrier.rf_muted = mute;
        carrier.prov.query_nominal_power(queue);
        carrier.ramp_after_nominal = carrier.adm_state == AdmState::Unlocked;
    }

    /// Ramp up after power-on, once the nominal power is known
    fn ramp_after_power_on(carrier: &mut RadioCarrier, queue: &mut MessageQueue) {
        if !std::mem::take(&mut carrier.ramp_after_nominal) {
            return;
        }
        // Locked meanwhile, or an administrative ramp took over
        if carrier.adm_state != AdmState::Unlocked || carrier.procedure_pending() {
            return;
        }
        if let Err(e) = power_ctrl::start_operating_ramp(carrier, queue) {
            tracing::warn!(trx = carrier.trx, "cannot ramp up after power-on: {}", e);
        }
    }

    fn rx_trxc_cmd_rsp(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        let SapMsgInner::TrxcCmdRsp(rsp) = message.msg else { panic!() };
        let Ok(carrier) = carrier_mut(&mut self.carriers, rsp.trx) else {
            tracing::warn!("response from unknown trx {}", rsp.trx);
            return;
        };

        let req = match carrier.prov.resolve(&rsp) {
            Ok(req) => req,
            Err(ProvErr::StaleEnable(token)) => {
                tracing::info!(trx = rsp.trx, "ignoring power-on response {} for closed transceiver", token);
                return;
            }
            Err(e) => {
                tracing::warn!(trx = rsp.trx, "unexpected response: {:?}", e);
                return;
            }
        };
        tracing::debug!(trx = rsp.trx, "<- RSP {} status={}", req, rsp.status);

        match req {
            ProvisioningRequest::Enable => {
                let obj = NmObj::radio_carrier(rsp.trx);
                if carrier.prov.is_powered() {
                    tracing::info!(trx = rsp.trx, "transceiver powered on");
                    send_ack(queue, obj, NmMsgType::Opstart);
                    Self::on_powered(carrier, queue);
                } else {
                    tracing::error!(trx = rsp.trx, "transceiver failed to power on (status {})", rsp.status);
                    send_nack(queue, obj, NmMsgType::Opstart, NmNackCause::CantPerform);
                }
            }
            ProvisioningRequest::SetTimeslot { tn, .. } => {
                Self::rx_setslot_rsp(carrier, queue, tn, &rsp);
            }
            ProvisioningRequest::SetPowerAtt { att_db } => {
                if rsp.status != 0 {
                    tracing::warn!(trx = rsp.trx, "SETPOWER {} failed (status {})", att_db, rsp.status);
                }
                power_ctrl::power_changed(carrier, queue, rsp.value.unwrap_or(att_db));
            }
            ProvisioningRequest::NomTxPower => {
                match rsp.value {
                    Some(nominal_dbm) if rsp.status == 0 => {
                        tracing::info!(trx = rsp.trx, "transceiver reports nominal power {} dBm", nominal_dbm);
                        power_ctrl::set_nominal_power(carrier, queue, nominal_dbm);
                    }
                    _ => tracing::warn!(trx = rsp.trx, "no nominal power reported (status {})", rsp.status),
                }
                Self::ramp_after_power_on(carrier, queue);
            }
            other => {
                if rsp.status != 0 {
                    tracing::error!(trx = rsp.trx, "{} failed (status {})", other, rsp.status);
                }
            }
        }
    }

    fn rx_setslot_rsp(carrier: &mut RadioCarrier, queue: &mut MessageQueue, tn: u8, rsp: &TrxcCmdRsp) {
        let ts = &mut carrier.ts[tn as usize];
        if ts.pending_connect != Some(rsp.token) {
            if rsp.status != 0 {
                tracing::error!(trx = rsp.trx, "SETSLOT for TS{} failed (status {})", tn, rsp.status);
            }
            return;
        }

        ts.pending_connect = None;
        let cause = if rsp.status == 0 {
            ts.dyn_is = ts.dyn_want;
            0
        } else {
            tracing::error!(trx = rsp.trx, "dynamic switch of TS{} to {} failed (status {})", tn, ts.dyn_want, rsp.status);
            ts.dyn_want = ts.dyn_is;
            NmNackCause::CantPerform.into_raw() as u8
        };
        Self::send_ts_connected(queue, rsp.trx, tn, cause);
    }

    fn rx_pwr_prim(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        match message.msg {
            SapMsgInner::PowerRampConf(prim) => {
                let Ok(carrier) = carrier_mut(&mut self.carriers, prim.trx) else { return };
                if !adm_state::ramp_complete(carrier, queue, prim.token) {
                    tracing::debug!(trx = prim.trx, "power ramp {} finished", prim.token);
                }
            }
            SapMsgInner::ChangePowerReq(prim) => {
                let Ok(carrier) = carrier_mut(&mut self.carriers, prim.trx) else { return };
                power_ctrl::change_power(carrier, queue, prim.p_trxout_mdbm);
            }
            _ => panic!("unexpected PWR-SAP primitive {}", message.msg),
        }
    }

    /// Test helper: state of the addressed logical channel
    pub fn lchan_state(&self, trx: TrxNr, chan_nr: ChanNr) -> Option<(LchanState, CiphState)> {
        let lchan = self.carrier(trx)?.lchan(chan_nr).ok()?;
        Some((lchan.state, lchan.ciph_state))
    }

    /// Effective kind of a timeslot, as it was last applied
    pub fn ts_kind(&self, trx: TrxNr, tn: u8) -> Option<PhysChanConfig> {
        let ts = self.carrier(trx)?.ts.get(tn as usize)?;
        Some(pchan_resolver::effective_kind(ts))
    }
}

impl<S: L1Scheduler + 'static> BtsEntityTrait for TrxL1Bs<S> {
    fn entity(&self) -> BtsEntity {
        BtsEntity::L1
    }

    fn set_config(&mut self, config: SharedConfig) {
        self.config = config;
    }

    fn rx_prim(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        tracing::debug!("rx_prim: {:?}", message);

        match message.sap {
            Sap::PhSap => self.rx_ph_prim(queue, message),
            Sap::NmSap => self.rx_nm_prim(queue, message),
            Sap::TrxcSap => self.rx_trxc_cmd_rsp(queue, message),
            Sap::PwrSap => self.rx_pwr_prim(queue, message),
            _ => panic!("unexpected SAP {:?}", message.sap),
        }
    }
}
