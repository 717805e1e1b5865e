use std::collections::HashMap;

use gsm_config::SharedConfig;
use gsm_core::bts_entities::BtsEntity;
use gsm_core::power::to_mdb;
use gsm_core::{Sap, TrxNr};
use gsm_saps::pwr::{ChangePowerReq, PowerRampConf};
use gsm_saps::{SapMsg, SapMsgInner};

use crate::{BtsEntityTrait, MessageQueue};

#[derive(Debug, Clone, Copy)]
struct ActiveRamp {
    token: u32,
    target_mdbm: i32,
    /// Last output power confirmed by L1
    cur_mdbm: i32,
    /// Power of the step in flight, if any
    requested_mdbm: Option<i32>,
    /// Nothing was applied yet
    first_step: bool,
}

/// Power ramp executor. Moves the output power of each carrier towards its target in
/// steps of the configured size, one step per tick, and confirms once the target is applied.
pub struct PowerRampBs {
    config: SharedConfig,
    ramps: HashMap<TrxNr, ActiveRamp>,
}

impl PowerRampBs {
    pub fn new(config: SharedConfig) -> Self {
        Self { config, ramps: HashMap::new() }
    }

    /// Token of the ramp currently executing on `trx`
    pub fn active_token(&self, trx: TrxNr) -> Option<u32> {
        self.ramps.get(&trx).map(|r| r.token)
    }

    /// Output power of the next step
    fn next_step(&self, ramp: &ActiveRamp) -> i32 {
        let cfg = self.config.config();
        let step = to_mdb(cfg.power_ramp.step_size_db);

        if ramp.target_mdbm > ramp.cur_mdbm {
            // A ramp-up never begins above the initial power limit
            let initial = to_mdb(cfg.power_ramp.max_initial_power_dbm);
            if ramp.first_step && ramp.cur_mdbm < initial {
                return initial.min(ramp.target_mdbm);
            }
            (ramp.cur_mdbm + step).min(ramp.target_mdbm)
        } else {
            (ramp.cur_mdbm - step).max(ramp.target_mdbm)
        }
    }

    fn rx_power_ramp_req(&mut self, _queue: &mut MessageQueue, message: SapMsg) {
        let SapMsgInner::PowerRampReq(prim) = message.msg else { panic!() };

        if let Some(old) = self.ramps.get(&prim.trx) {
            tracing::debug!(trx = prim.trx, "ramp {} replaced by {}", old.token, prim.token);
        }
        tracing::info!(trx = prim.trx, "ramp {}: {} -> {} mdBm (max {} mdBm{})",
            prim.token, prim.cur_mdbm, prim.target_mdbm, prim.max_mdbm,
            if prim.bypass { ", bypass" } else { "" });

        // A step of a replaced ramp may still be in flight, its confirmation updates cur_mdbm
        let requested_mdbm = self.ramps.get(&prim.trx).and_then(|r| r.requested_mdbm);
        self.ramps.insert(prim.trx, ActiveRamp {
            token: prim.token,
            target_mdbm: prim.target_mdbm,
            cur_mdbm: prim.cur_mdbm,
            requested_mdbm,
            first_step: true,
        });
    }

    fn rx_power_changed_ind(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        let SapMsgInner::PowerChangedInd(prim) = message.msg else { panic!() };
        let Some(ramp) = self.ramps.get_mut(&prim.trx) else {
            tracing::debug!(trx = prim.trx, "power changed to {} mdBm outside of a ramp", prim.p_trxout_mdbm);
            return;
        };

        ramp.cur_mdbm = prim.p_trxout_mdbm;
        let Some(requested) = ramp.requested_mdbm.take() else { return };
        if requested != ramp.target_mdbm {
            return;
        }

        let token = ramp.token;
        self.ramps.remove(&prim.trx);
        tracing::info!(trx = prim.trx, "ramp {} reached {} mdBm", token, requested);
        queue.push_back(SapMsg::new(
            Sap::PwrSap,
            BtsEntity::Pwr,
            BtsEntity::L1,
            SapMsgInner::PowerRampConf(PowerRampConf { trx: prim.trx, token }),
        ));
    }
}

impl BtsEntityTrait for PowerRampBs {
    fn entity(&self) -> BtsEntity {
        BtsEntity::Pwr
    }

    fn set_config(&mut self, config: SharedConfig) {
        self.config = config;
    }

    fn rx_prim(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        match message.msg {
            SapMsgInner::PowerRampReq(_) => self.rx_power_ramp_req(queue, message),
            SapMsgInner::PowerChangedInd(_) => self.rx_power_changed_ind(queue, message),
            _ => panic!("unexpected primitive on {:?}: {}", message.sap, message.msg),
        }
    }

    fn tick_start(&mut self, queue: &mut MessageQueue, _tick: u64) {
        let mut trxs: Vec<TrxNr> = self.ramps.keys().copied().collect();
        trxs.sort_unstable();

        for trx in trxs {
            let ramp = self.ramps[&trx];
            if ramp.requested_mdbm.is_some() {
                continue;
            }
            let next = self.next_step(&ramp);
            tracing::debug!(trx = trx, "ramp {} step to {} mdBm", ramp.token, next);

            if let Some(r) = self.ramps.get_mut(&trx) {
                r.requested_mdbm = Some(next);
                r.first_step = false;
            }
            queue.push_back(SapMsg::new(
                Sap::PwrSap,
                BtsEntity::Pwr,
                BtsEntity::L1,
                SapMsgInner::ChangePowerReq(ChangePowerReq { trx, p_trxout_mdbm: next }),
            ));
        }
    }
}
