mod common;

use gsm_core::bts_entities::BtsEntity;
use gsm_core::pchan::to_slot_type;
use gsm_core::{AdmState, ChanNr, NmNackCause, NmObjClass, OpState, PhysChanConfig, Sap, debug};
use gsm_entities::l1::components::carrier::{CiphState, LchanState};
use gsm_saps::nm::*;
use gsm_saps::ph::fields::amr_conf::{AmrModeCfg, AmrMultirateConf};
use gsm_saps::ph::fields::chan_mode::{ChanModeParams, RslCmode, TchMode};
use gsm_saps::ph::fields::encryption::{CipherAlg, Encryption};
use gsm_saps::ph::fields::lchan_params::LchanParams;
use gsm_saps::ph::*;
use gsm_saps::pwr::PowerRampConf;
use gsm_saps::trxc::{ProvisioningRequest, TrxcCmdRsp, TscCfg};
use gsm_saps::{SapMsg, SapMsgInner};
use common::{ComponentTest, default_test_config};

/// L1 on its own. Transceiver commands and ramp requests end up in sinks and are
/// answered by the test.
fn setup(cfg: gsm_config::StackConfig) -> ComponentTest {
    debug::setup_logging_verbose();
    let mut test = ComponentTest::new(cfg);
    test.populate_entities(
        vec![BtsEntity::L1],
        vec![BtsEntity::Oml, BtsEntity::Rsl, BtsEntity::Trxc, BtsEntity::Pwr, BtsEntity::Pcu],
    );
    test
}

fn nm(test: &mut ComponentTest, msg: SapMsgInner) -> Vec<SapMsg> {
    test.submit_to_l1(Sap::NmSap, BtsEntity::Oml, msg);
    test.deliver_all_messages();
    test.dump_sinks()
}

fn ph(test: &mut ComponentTest, msg: SapMsgInner) -> Vec<SapMsg> {
    test.submit_to_l1(Sap::PhSap, BtsEntity::Rsl, msg);
    test.deliver_all_messages();
    test.dump_sinks()
}

fn acks(msgs: &[SapMsg]) -> Vec<(NmObj, NmMsgType)> {
    msgs.iter().filter_map(|m| match &m.msg {
        SapMsgInner::NmAck(ack) => Some((ack.obj, ack.msg_type)),
        _ => None,
    }).collect()
}

fn nacks(msgs: &[SapMsg]) -> Vec<(NmObj, NmMsgType, NmNackCause)> {
    msgs.iter().filter_map(|m| match &m.msg {
        SapMsgInner::NmNack(nack) => Some((nack.obj, nack.msg_type, nack.cause)),
        _ => None,
    }).collect()
}

fn cmds(msgs: &[SapMsg]) -> Vec<ProvisioningRequest> {
    msgs.iter().filter_map(|m| match &m.msg {
        SapMsgInner::TrxcCmdReq(req) => Some(req.cmd.clone()),
        _ => None,
    }).collect()
}

/// Ramp requests as (token, target)
fn ramps(msgs: &[SapMsg]) -> Vec<(u32, i32)> {
    msgs.iter().filter_map(|m| match &m.msg {
        SapMsgInner::PowerRampReq(req) => Some((req.token, req.target_mdbm)),
        _ => None,
    }).collect()
}

fn pcu_infos(msgs: &[SapMsg]) -> Vec<(AdmState, bool)> {
    msgs.iter().filter_map(|m| match &m.msg {
        SapMsgInner::PcuInfoInd(ind) => Some((ind.adm_state, ind.rf_muted)),
        _ => None,
    }).collect()
}

fn mph_confs(msgs: &[SapMsg]) -> Vec<(ChanNr, MphConfKind)> {
    msgs.iter().filter_map(|m| match &m.msg {
        SapMsgInner::MphInfoConf(conf) => Some((conf.chan_nr, conf.kind)),
        _ => None,
    }).collect()
}

/// Answers every transceiver command in `msgs` the way a healthy transceiver would,
/// returns everything L1 sent in reaction
fn answer_trxc(test: &mut ComponentTest, msgs: &[SapMsg], status: i32) -> Vec<SapMsg> {
    for m in msgs {
        if let SapMsgInner::TrxcCmdReq(req) = &m.msg {
            let value = match req.cmd {
                ProvisioningRequest::SetPowerAtt { att_db } => Some(att_db),
                ProvisioningRequest::NomTxPower => Some(20),
                _ => None,
            };
            let rsp = TrxcCmdRsp { trx: req.trx, token: req.token, status, value };
            test.submit_to_l1(Sap::TrxcSap, BtsEntity::Trxc, SapMsgInner::TrxcCmdRsp(rsp));
        }
    }
    test.deliver_all_messages();
    test.dump_sinks()
}

fn ramp_done(test: &mut ComponentTest, token: u32) -> Vec<SapMsg> {
    let conf = PowerRampConf { trx: 0, token };
    test.submit_to_l1(Sap::PwrSap, BtsEntity::Pwr, SapMsgInner::PowerRampConf(conf));
    test.deliver_all_messages();
    test.dump_sinks()
}

fn opstart(test: &mut ComponentTest, obj: NmObj) -> Vec<SapMsg> {
    nm(test, SapMsgInner::NmOpstartReq(NmOpstartReq { obj }))
}

fn chg_adm(test: &mut ComponentTest, adm_state: AdmState) -> Vec<SapMsg> {
    nm(test, SapMsgInner::NmChgAdmStateReq(NmChgAdmStateReq { obj: NmObj::radio_carrier(0), adm_state }))
}

fn set_chan_attr(test: &mut ComponentTest, tn: u8, pchan: PhysChanConfig, tsc_set: u8) -> Vec<SapMsg> {
    nm(test, SapMsgInner::NmSetChanAttrReq(NmSetChanAttrReq { trx: 0, tn, pchan, tsc_set, tsc: 7 }))
}

/// Powers on trx 0 and answers everything the power-on triggers
fn power_on(test: &mut ComponentTest) -> Vec<SapMsg> {
    let msgs = opstart(test, NmObj::radio_carrier(0));
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::Enable]);
    let msgs = answer_trxc(test, &msgs, 0);
    let follow_up = answer_trxc(test, &msgs, 0);
    msgs.into_iter().chain(follow_up).collect()
}

/// Powered and unlocked, with the ramp completed
fn unlocked(test: &mut ComponentTest) {
    power_on(test);
    let msgs = chg_adm(test, AdmState::Unlocked);
    let (token, _) = ramps(&msgs)[0];
    answer_trxc(test, &msgs, 0);
    ramp_done(test, token);
}

#[test]
fn test_opstart() {
    let mut test = setup(default_test_config(1));

    for class in [NmObjClass::SiteManager, NmObjClass::Bts, NmObjClass::BasebandTransceiver, NmObjClass::GprsCell] {
        let obj = NmObj::new(class);
        assert_eq!(acks(&opstart(&mut test, obj)), vec![(obj, NmMsgType::Opstart)]);
    }
    let obj = NmObj::new(NmObjClass::Other(0x55));
    assert_eq!(nacks(&opstart(&mut test, obj)), vec![(obj, NmMsgType::Opstart, NmNackCause::ObjClassNotSupp)]);

    // The radio carrier is acknowledged once the transceiver confirms power-on
    let rc = NmObj::radio_carrier(0);
    let msgs = opstart(&mut test, rc);
    assert!(acks(&msgs).is_empty());
    let msgs = answer_trxc(&mut test, &msgs, 0);
    assert_eq!(acks(&msgs), vec![(rc, NmMsgType::Opstart)]);
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::RfMute { mute: true }, ProvisioningRequest::NomTxPower]);
    assert!(ramps(&msgs).is_empty());

    // Powering on twice is refused
    assert_eq!(nacks(&opstart(&mut test, rc)), vec![(rc, NmMsgType::Opstart, NmNackCause::CantPerform)]);
}

#[test]
fn test_opstart_power_on_failure() {
    let mut test = setup(default_test_config(1));
    let rc = NmObj::radio_carrier(0);
    let msgs = opstart(&mut test, rc);
    let msgs = answer_trxc(&mut test, &msgs, -1);
    assert_eq!(nacks(&msgs), vec![(rc, NmMsgType::Opstart, NmNackCause::CantPerform)]);
    assert!(cmds(&msgs).is_empty());
    assert!(!test.l1().carrier(0).unwrap().prov.is_powered());
}

#[test]
fn test_adm_state_unpowered() {
    let mut test = setup(default_test_config(1));
    let rc = NmObj::radio_carrier(0);

    let msgs = chg_adm(&mut test, AdmState::Locked);
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::RfMute { mute: true }]);
    assert_eq!(acks(&msgs), vec![(rc, NmMsgType::ChgAdmState)]);
    assert_eq!(pcu_infos(&msgs), vec![(AdmState::Locked, true)]);
    assert!(ramps(&msgs).is_empty());
    assert!(!test.l1().carrier(0).unwrap().procedure_pending());

    let msgs = chg_adm(&mut test, AdmState::Unlocked);
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::RfMute { mute: false }]);
    assert_eq!(acks(&msgs), vec![(rc, NmMsgType::ChgAdmState)]);
    assert!(ramps(&msgs).is_empty());
    assert_eq!(test.l1().carrier(0).unwrap().adm_state, AdmState::Unlocked);
}

#[test]
fn test_adm_state_powered_after_unlock() {
    let mut test = setup(default_test_config(1));

    // Unlocked before power-on: unmuted and ramped up once powered
    chg_adm(&mut test, AdmState::Unlocked);
    let msgs = power_on(&mut test);
    assert!(cmds(&msgs).contains(&ProvisioningRequest::RfMute { mute: false }));
    assert_eq!(ramps(&msgs).len(), 1);
    assert_eq!(ramps(&msgs)[0].1, 20000);
}

#[test]
fn test_adm_state_unlock_and_lock() {
    let mut test = setup(default_test_config(1));
    let rc = NmObj::radio_carrier(0);
    power_on(&mut test);

    let msgs = chg_adm(&mut test, AdmState::Unlocked);
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::RfMute { mute: false }]);
    let (up, target) = ramps(&msgs)[0];
    assert_eq!(target, 20000);
    assert!(acks(&msgs).is_empty());
    assert!(test.l1().carrier(0).unwrap().procedure_pending());
    assert_eq!(test.l1().carrier(0).unwrap().adm_state, AdmState::Locked);

    let msgs = ramp_done(&mut test, up);
    assert_eq!(acks(&msgs), vec![(rc, NmMsgType::ChgAdmState)]);
    assert_eq!(pcu_infos(&msgs), vec![(AdmState::Unlocked, false)]);
    assert!(!test.l1().carrier(0).unwrap().procedure_pending());

    // LOCKED commits right away, muting waits for the ramp
    let msgs = chg_adm(&mut test, AdmState::Locked);
    assert_eq!(acks(&msgs), vec![(rc, NmMsgType::ChgAdmState)]);
    assert!(cmds(&msgs).is_empty());
    let (down, target) = ramps(&msgs)[0];
    assert_eq!(target, -10000);
    assert_eq!(test.l1().carrier(0).unwrap().adm_state, AdmState::Locked);

    let msgs = ramp_done(&mut test, down);
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::RfMute { mute: true }]);
    assert_eq!(pcu_infos(&msgs), vec![(AdmState::Locked, true)]);
    assert!(acks(&msgs).is_empty());
}

#[test]
fn test_unlock_supersedes_ramp_down() {
    let mut test = setup(default_test_config(1));
    let rc = NmObj::radio_carrier(0);
    unlocked(&mut test);

    let msgs = chg_adm(&mut test, AdmState::Locked);
    let (down, _) = ramps(&msgs)[0];

    // RF was never muted, so it is not unmuted either
    let msgs = chg_adm(&mut test, AdmState::Unlocked);
    assert!(cmds(&msgs).is_empty());
    assert!(nacks(&msgs).is_empty());
    let (up, target) = ramps(&msgs)[0];
    assert_eq!(target, 20000);

    // The superseded ramp-down completing changes nothing
    let msgs = ramp_done(&mut test, down);
    assert!(msgs.is_empty());
    assert!(!test.l1().carrier(0).unwrap().rf_muted);

    let msgs = ramp_done(&mut test, up);
    assert!(cmds(&msgs).is_empty());
    assert_eq!(acks(&msgs), vec![(rc, NmMsgType::ChgAdmState)]);
    assert_eq!(test.l1().carrier(0).unwrap().adm_state, AdmState::Unlocked);
}

#[test]
fn test_lock_supersedes_ramp_up() {
    let mut test = setup(default_test_config(1));
    let rc = NmObj::radio_carrier(0);
    power_on(&mut test);

    let msgs = chg_adm(&mut test, AdmState::Unlocked);
    let (up, _) = ramps(&msgs)[0];

    let msgs = chg_adm(&mut test, AdmState::Locked);
    assert_eq!(nacks(&msgs), vec![(rc, NmMsgType::ChgAdmState, NmNackCause::ReqNotGrant)]);
    assert_eq!(acks(&msgs), vec![(rc, NmMsgType::ChgAdmState)]);
    let (down, target) = ramps(&msgs)[0];
    assert_eq!(target, -10000);

    assert!(ramp_done(&mut test, up).is_empty());
    let msgs = ramp_done(&mut test, down);
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::RfMute { mute: true }]);
    assert_eq!(test.l1().carrier(0).unwrap().adm_state, AdmState::Locked);
}

#[test]
#[should_panic]
fn test_same_direction_while_ramping() {
    let mut test = setup(default_test_config(1));
    power_on(&mut test);
    chg_adm(&mut test, AdmState::Unlocked);
    chg_adm(&mut test, AdmState::Unlocked);
}

#[test]
fn test_unlock_not_startable() {
    let mut cfg = default_test_config(1);
    cfg.trx[0].forced_max_power_red_db = Some(40);
    let mut test = setup(cfg);
    let rc = NmObj::radio_carrier(0);
    power_on(&mut test);

    let msgs = chg_adm(&mut test, AdmState::Unlocked);
    assert_eq!(nacks(&msgs), vec![(rc, NmMsgType::ChgAdmState, NmNackCause::ReqNotGrant)]);
    assert!(cmds(&msgs).is_empty());
    assert!(ramps(&msgs).is_empty());
    let carrier = test.l1().carrier(0).unwrap();
    assert_eq!(carrier.adm_state, AdmState::Locked);
    assert!(carrier.rf_muted);
    assert!(!carrier.procedure_pending());
}

#[test]
fn test_unlock_over_ramp_down_not_startable() {
    let mut test = setup(default_test_config(1));
    let rc = NmObj::radio_carrier(0);
    unlocked(&mut test);

    // Nominal power minus 40 dB is below the RF disabled level
    let req = NmSetRadioAttrReq { trx: 0, arfcn: 1, max_power_red_db: 40 };
    let msgs = nm(&mut test, SapMsgInner::NmSetRadioAttrReq(req));
    assert!(ramps(&msgs).is_empty());

    let msgs = chg_adm(&mut test, AdmState::Locked);
    let (down, _) = ramps(&msgs)[0];

    let msgs = chg_adm(&mut test, AdmState::Unlocked);
    assert_eq!(nacks(&msgs), vec![(rc, NmMsgType::ChgAdmState, NmNackCause::ReqNotGrant)]);
    assert!(ramps(&msgs).is_empty());
    assert!(cmds(&msgs).is_empty());
    let carrier = test.l1().carrier(0).unwrap();
    assert_eq!(carrier.adm_state, AdmState::Locked);
    assert!(carrier.procedure_pending());

    // The ramp-down is still the outstanding one and mutes RF
    let msgs = ramp_done(&mut test, down);
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::RfMute { mute: true }]);
    let carrier = test.l1().carrier(0).unwrap();
    assert!(carrier.rf_muted);
    assert!(!carrier.procedure_pending());
}

#[test]
fn test_lock_over_ramp_up_not_startable() {
    let mut test = setup(default_test_config(1));
    let rc = NmObj::radio_carrier(0);
    power_on(&mut test);

    let msgs = chg_adm(&mut test, AdmState::Unlocked);
    let (up, _) = ramps(&msgs)[0];

    // RF disabled level above the maximum output power
    test.l1().carriers[0].p_max_out_mdbm = -20000;
    let msgs = chg_adm(&mut test, AdmState::Locked);
    assert_eq!(nacks(&msgs), vec![(rc, NmMsgType::ChgAdmState, NmNackCause::ReqNotGrant)]);
    assert!(acks(&msgs).is_empty());
    assert!(ramps(&msgs).is_empty());
    assert!(test.l1().carrier(0).unwrap().procedure_pending());

    // The UNLOCKED request was not superseded and completes
    let msgs = ramp_done(&mut test, up);
    assert_eq!(acks(&msgs), vec![(rc, NmMsgType::ChgAdmState)]);
    assert_eq!(test.l1().carrier(0).unwrap().adm_state, AdmState::Unlocked);
    assert!(!test.l1().carrier(0).unwrap().procedure_pending());
}

#[test]
fn test_trx_close_abandons_ramp() {
    let mut test = setup(default_test_config(1));
    let rc = NmObj::radio_carrier(0);
    power_on(&mut test);
    let msgs = chg_adm(&mut test, AdmState::Unlocked);
    let (up, _) = ramps(&msgs)[0];

    let msgs = nm(&mut test, SapMsgInner::NmTrxCloseReq(NmTrxCloseReq { trx: 0 }));
    assert_eq!(nacks(&msgs), vec![(rc, NmMsgType::ChgAdmState, NmNackCause::ReqNotGrant)]);
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::Close]);
    let op_states: Vec<_> = msgs.iter().filter_map(|m| match &m.msg {
        SapMsgInner::NmOpStateInd(ind) => Some((ind.obj.class, ind.op_state)),
        _ => None,
    }).collect();
    assert_eq!(op_states, vec![
        (NmObjClass::RadioCarrier, OpState::Disabled),
        (NmObjClass::BasebandTransceiver, OpState::Disabled),
    ]);

    answer_trxc(&mut test, &msgs, 0);
    assert!(!test.l1().carrier(0).unwrap().prov.is_powered());
    assert!(ramp_done(&mut test, up).is_empty());
}

#[test]
fn test_trx_close_before_power_on_response() {
    let mut test = setup(default_test_config(1));
    let msgs = opstart(&mut test, NmObj::radio_carrier(0));
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::Enable]);
    nm(&mut test, SapMsgInner::NmTrxCloseReq(NmTrxCloseReq { trx: 0 }));

    // The late power-on confirmation is dropped without a reply
    let rsp_msgs = answer_trxc(&mut test, &msgs, 0);
    assert!(acks(&rsp_msgs).is_empty());
    assert!(nacks(&rsp_msgs).is_empty());
    assert!(cmds(&rsp_msgs).is_empty());
    assert!(!test.l1().carrier(0).unwrap().prov.is_powered());
}

#[test]
fn test_set_bts_and_radio_attr() {
    let mut test = setup(default_test_config(2));

    let msgs = nm(&mut test, SapMsgInner::NmSetBtsAttrReq(NmSetBtsAttrReq { bsic: 63, c0_arfcn: 100 }));
    assert_eq!(acks(&msgs), vec![(NmObj::new(NmObjClass::Bts), NmMsgType::SetBtsAttr)]);
    assert_eq!(cmds(&msgs), vec![
        ProvisioningRequest::SetFrequency { arfcn: 100 },
        ProvisioningRequest::SetIdentity { bsic: 63 },
        ProvisioningRequest::SetIdentity { bsic: 63 },
    ]);

    // C0 keeps the cell's frequency
    let req = NmSetRadioAttrReq { trx: 0, arfcn: 5, max_power_red_db: 0 };
    let msgs = nm(&mut test, SapMsgInner::NmSetRadioAttrReq(req));
    assert!(cmds(&msgs).is_empty());
    assert_eq!(acks(&msgs), vec![(NmObj::radio_carrier(0), NmMsgType::SetRadioAttr)]);

    let req = NmSetRadioAttrReq { trx: 1, arfcn: 104, max_power_red_db: 0 };
    let msgs = nm(&mut test, SapMsgInner::NmSetRadioAttrReq(req));
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::SetFrequency { arfcn: 104 }]);
    assert_eq!(test.l1().carrier(1).unwrap().arfcn, Some(104));
}

#[test]
fn test_radio_attr_reduction_ramps() {
    let mut test = setup(default_test_config(1));
    unlocked(&mut test);

    let req = NmSetRadioAttrReq { trx: 0, arfcn: 1, max_power_red_db: 4 };
    let msgs = nm(&mut test, SapMsgInner::NmSetRadioAttrReq(req));
    assert_eq!(ramps(&msgs).iter().map(|r| r.1).collect::<Vec<_>>(), vec![16000]);
    assert_eq!(acks(&msgs), vec![(NmObj::radio_carrier(0), NmMsgType::SetRadioAttr)]);
    // Not an administrative ramp
    assert!(!test.l1().carrier(0).unwrap().procedure_pending());
}

#[test]
fn test_set_chan_attr() {
    let mut cfg = default_test_config(1);
    cfg.trx[0].slotmask = 0x7f;
    let mut test = setup(cfg);

    let msgs = set_chan_attr(&mut test, 0, PhysChanConfig::CcchSdcch4Cbch, 0);
    assert_eq!(acks(&msgs), vec![(NmObj::channel(0, 0), NmMsgType::SetChanAttr)]);
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::SetTimeslot {
        tn: 0,
        slot_type: to_slot_type(PhysChanConfig::CcchSdcch4Cbch),
        tsc: None,
    }]);
    assert!(test.l1().sched.bcch_ccch_active(0, 0));
    assert!(test.l1().sched.chan(0, ChanNr::cbch4(0)).is_some());
    assert_eq!(test.l1().lchan_state(0, ChanNr::bcch(0)), Some((LchanState::Active, CiphState::None)));

    let msgs = set_chan_attr(&mut test, 1, PhysChanConfig::TchF, 1);
    assert_eq!(cmds(&msgs), vec![ProvisioningRequest::SetTimeslot {
        tn: 1,
        slot_type: to_slot_type(PhysChanConfig::TchF),
        tsc: Some(TscCfg { set: 2, code: 7 }),
    }]);

    // Masked out
    let msgs = set_chan_attr(&mut test, 7, PhysChanConfig::TchF, 0);
    assert_eq!(nacks(&msgs), vec![(NmObj::channel(0, 7), NmMsgType::SetChanAttr, NmNackCause::ResNotAvail)]);
    assert!(cmds(&msgs).is_empty());
}

#[test]
fn test_set_chan_attr_unsupported() {
    let mut cfg = default_test_config(1);
    cfg.trx[0].supported_pchans.retain(|p| *p != PhysChanConfig::TchH);
    let mut test = setup(cfg);

    let msgs = set_chan_attr(&mut test, 2, PhysChanConfig::TchH, 0);
    assert_eq!(nacks(&msgs), vec![(NmObj::channel(0, 2), NmMsgType::SetChanAttr, NmNackCause::ResNotAvail)]);
}

#[test]
fn test_dynamic_timeslot_connect() {
    let mut test = setup(default_test_config(1));

    let msgs = set_chan_attr(&mut test, 3, PhysChanConfig::TchFPdch, 0);
    assert_eq!(acks(&msgs).len(), 1);
    assert_eq!(test.l1().ts_kind(0, 3), Some(PhysChanConfig::TchF));
    assert_eq!(test.l1().sched.pchan(0, 3), Some(PhysChanConfig::TchF));

    let msgs = ph(&mut test, SapMsgInner::TsConnectReq(TsConnectReq { trx: 0, tn: 3, as_pchan: PhysChanConfig::Pdch }));
    assert!(msgs.iter().all(|m| !matches!(m.msg, SapMsgInner::TsConnectedInd(_))));

    let msgs = answer_trxc(&mut test, &msgs, 0);
    let connected: Vec<_> = msgs.iter().filter_map(|m| match &m.msg {
        SapMsgInner::TsConnectedInd(ind) => Some((ind.tn, ind.cause)),
        _ => None,
    }).collect();
    assert_eq!(connected, vec![(3, 0)]);
    assert_eq!(test.l1().ts_kind(0, 3), Some(PhysChanConfig::Pdch));

    let msgs = ph(&mut test, SapMsgInner::TsDisconnectReq(TsDisconnectReq { trx: 0, tn: 3 }));
    assert!(matches!(msgs[0].msg, SapMsgInner::TsDisconnectedInd(TsDisconnectedInd { tn: 3, .. })));

    // Static timeslots cannot be switched
    set_chan_attr(&mut test, 4, PhysChanConfig::TchF, 0);
    let msgs = ph(&mut test, SapMsgInner::TsConnectReq(TsConnectReq { trx: 0, tn: 4, as_pchan: PhysChanConfig::Pdch }));
    let SapMsgInner::TsConnectedInd(ind) = &msgs[0].msg else { panic!("unexpected {}", msgs[0].msg) };
    assert_eq!(ind.cause, NmNackCause::CantPerform.into_raw() as u8);
}

fn amr_params(codecs: &[(u8, u8)]) -> LchanParams {
    LchanParams {
        mode: ChanModeParams {
            rsl_cmode: RslCmode::Speech,
            tch_mode: TchMode::SpeechAmr,
            amr: AmrMultirateConf {
                modes: codecs.iter().enumerate()
                    .map(|(i, (t, h))| AmrModeCfg { mode: i as u8 * 2, threshold: *t, hysteresis: *h })
                    .collect(),
                icmi: true,
                smod: 0,
            },
        },
        encr: Encryption::new(CipherAlg::A5_1, &[0xab; 8]),
        ..LchanParams::default()
    }
}

#[test]
fn test_lchan_lifecycle() {
    let mut test = setup(default_test_config(1));
    set_chan_attr(&mut test, 0, PhysChanConfig::CcchSdcch4, 0);
    set_chan_attr(&mut test, 1, PhysChanConfig::TchF, 0);
    let chan = ChanNr::tch_f(1);

    // Common control channels are refused without confirmation
    let msgs = ph(&mut test, SapMsgInner::MphActivateReq(MphActivateReq {
        trx: 0, chan_nr: ChanNr::bcch(0), params: LchanParams::default(),
    }));
    assert!(mph_confs(&msgs).is_empty());
    assert_eq!(test.l1().lchan_state(0, ChanNr::bcch(0)), Some((LchanState::Active, CiphState::None)));

    let msgs = ph(&mut test, SapMsgInner::MphActivateReq(MphActivateReq {
        trx: 0, chan_nr: chan, params: amr_params(&[(10, 4), (0, 0)]),
    }));
    assert_eq!(mph_confs(&msgs), vec![(chan, MphConfKind::Activate)]);
    assert_eq!(test.l1().lchan_state(0, chan), Some((LchanState::Active, CiphState::RxTxConf)));

    // Switch to signalling without ciphering
    let msgs = ph(&mut test, SapMsgInner::MphModifyReq(MphModifyReq {
        trx: 0, chan_nr: chan, params: LchanParams::default(),
    }));
    assert!(mph_confs(&msgs).is_empty());
    assert_eq!(test.l1().lchan_state(0, chan), Some((LchanState::Active, CiphState::None)));
    assert!(!test.l1().carrier(0).unwrap().lchan(chan).unwrap().amr_loop.is_enabled());

    let msgs = ph(&mut test, SapMsgInner::MphActCiphReq(MphActCiphReq {
        trx: 0, chan_nr: chan, encr: Some(Encryption::new(CipherAlg::A5_3, &[0x01; 16])), uplink: true, downlink: false,
    }));
    assert!(msgs.is_empty());
    assert_eq!(test.l1().lchan_state(0, chan), Some((LchanState::Active, CiphState::RxConf)));
    ph(&mut test, SapMsgInner::MphActCiphReq(MphActCiphReq {
        trx: 0, chan_nr: chan, encr: None, uplink: false, downlink: true,
    }));
    assert_eq!(test.l1().lchan_state(0, chan), Some((LchanState::Active, CiphState::RxTxConf)));
    assert_eq!(test.l1().sched.chan(0, chan).unwrap().dl_cipher, Some(CipherAlg::A5_3));

    ph(&mut test, SapMsgInner::MphUlAccessReq(MphUlAccessReq { trx: 0, chan_nr: chan, enable: true }));
    assert!(test.l1().sched.chan(0, chan).unwrap().ul_access);

    let msgs = ph(&mut test, SapMsgInner::MphDeactivateReq(MphDeactivateReq { trx: 0, chan_nr: chan, sacch_only: true }));
    assert!(mph_confs(&msgs).is_empty());
    let msgs = ph(&mut test, SapMsgInner::MphDeactivateReq(MphDeactivateReq { trx: 0, chan_nr: chan, sacch_only: false }));
    assert_eq!(mph_confs(&msgs), vec![(chan, MphConfKind::Deactivate)]);
    assert_eq!(test.l1().lchan_state(0, chan), Some((LchanState::None, CiphState::None)));
    assert!(test.l1().sched.chan(0, chan).is_none());

    // Reserved on deactivation as well
    let msgs = ph(&mut test, SapMsgInner::MphDeactivateReq(MphDeactivateReq {
        trx: 0, chan_nr: ChanNr::pch_agch(0), sacch_only: false,
    }));
    assert!(mph_confs(&msgs).is_empty());
    assert_eq!(test.l1().lchan_state(0, ChanNr::bcch(0)), Some((LchanState::Active, CiphState::None)));
}

fn meas(test: &mut ComponentTest, chan_nr: ChanNr, n: usize, ci_cb: i16) {
    for _ in 0..n {
        let ul_ft = test.l1().carrier(0).unwrap().lchan(chan_nr).unwrap().amr_loop.dl_cmr();
        let ind = PhMeasInd { trx: 0, chan_nr, ul_ft, ci_cb };
        test.submit_to_l1(Sap::PhSap, BtsEntity::Sched, SapMsgInner::PhMeasInd(ind));
        test.deliver_all_messages();
    }
}

#[test]
fn test_amr_adaptation_full_rate() {
    let mut test = setup(default_test_config(1));
    set_chan_attr(&mut test, 1, PhysChanConfig::TchF, 0);
    let chan = ChanNr::tch_f(1);
    ph(&mut test, SapMsgInner::MphActivateReq(MphActivateReq {
        trx: 0, chan_nr: chan, params: amr_params(&[(10, 4), (0, 0)]),
    }));
    assert_eq!(test.l1().sched.chan(0, chan).unwrap().dl_cmr, 0);

    // 80 cB > 5 * (10 + 4)
    meas(&mut test, chan, 47, 80);
    assert_eq!(test.l1().sched.chan(0, chan).unwrap().dl_cmr, 0);
    meas(&mut test, chan, 1, 80);
    assert_eq!(test.l1().sched.chan(0, chan).unwrap().dl_cmr, 1);
    let lchan_loop = &test.l1().carrier(0).unwrap().lchan(chan).unwrap().amr_loop;
    assert_eq!(lchan_loop.accumulators(), (0, 0));

    // Back down below 5 * 10
    meas(&mut test, chan, 48, 20);
    assert_eq!(test.l1().sched.chan(0, chan).unwrap().dl_cmr, 0);
}

#[test]
fn test_amr_adaptation_half_rate() {
    let mut test = setup(default_test_config(1));
    set_chan_attr(&mut test, 2, PhysChanConfig::TchH, 0);
    let chan = ChanNr::tch_h(2, 1);
    ph(&mut test, SapMsgInner::MphActivateReq(MphActivateReq {
        trx: 0, chan_nr: chan, params: amr_params(&[(10, 4), (12, 4), (0, 0)]),
    }));

    meas(&mut test, chan, 24, 100);
    assert_eq!(test.l1().sched.chan(0, chan).unwrap().dl_cmr, 1);
    // Upgrades are only considered from the most robust mode
    meas(&mut test, chan, 24, 100);
    assert_eq!(test.l1().sched.chan(0, chan).unwrap().dl_cmr, 1);
    meas(&mut test, chan, 24, 40);
    assert_eq!(test.l1().sched.chan(0, chan).unwrap().dl_cmr, 0);

    // Measurements on a released channel are dropped
    ph(&mut test, SapMsgInner::MphDeactivateReq(MphDeactivateReq { trx: 0, chan_nr: chan, sacch_only: false }));
    meas(&mut test, chan, 24, 0);
    assert_eq!(test.l1().carrier(0).unwrap().lchan(chan).unwrap().amr_loop.accumulators(), (0, 0));
}
