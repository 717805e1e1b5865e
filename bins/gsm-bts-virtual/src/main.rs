use clap::Parser;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use gsm_config::{SharedConfig, toml_config};
use gsm_core::bts_entities::BtsEntity;
use gsm_core::{AdmState, Sap, TrxNr, debug};
use gsm_entities::MessageRouter;
use gsm_entities::{l1::TrxL1Bs, pwr::PowerRampBs, sched::SlotScheduler, trxc::TrxcBs, trxc::VirtTrxcDev};
use gsm_saps::nm::{NmChgAdmStateReq, NmObj, NmOpstartReq};
use gsm_saps::{SapMsg, SapMsgInner};

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> SharedConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            println!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

/// Build the transceiver control stack on top of a virtual transceiver
fn build_bts_stack(cfg: &SharedConfig) -> MessageRouter {
    let mut router = MessageRouter::new(cfg.clone());

    let dev = VirtTrxcDev::new(cfg);
    let trxc = TrxcBs::new(cfg.clone(), dev);
    let l1 = TrxL1Bs::new(cfg.clone(), SlotScheduler::new(cfg));
    let pwr = PowerRampBs::new(cfg.clone());
    router.register_entity(Box::new(trxc));
    router.register_entity(Box::new(l1));
    router.register_entity(Box::new(pwr));

    router
}

/// Queue what a BSC would send to bring every carrier into service
fn submit_bringup(router: &mut MessageRouter, num_trx: usize) {
    for trx in 0..num_trx as TrxNr {
        let obj = NmObj::radio_carrier(trx);
        router.submit_message(SapMsg::new(
            Sap::NmSap,
            BtsEntity::Oml,
            BtsEntity::L1,
            SapMsgInner::NmOpstartReq(NmOpstartReq { obj }),
        ));
        router.submit_message(SapMsg::new(
            Sap::NmSap,
            BtsEntity::Oml,
            BtsEntity::L1,
            SapMsgInner::NmChgAdmStateReq(NmChgAdmStateReq { obj, adm_state: AdmState::Unlocked }),
        ));
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Virtual GSM BTS transceiver control stack",
    long_about = "Runs the BTS layer 1 control plane against a virtual transceiver using the provided TOML configuration file"
)]
struct Args {
    /// Config file (required)
    #[arg(help = "TOML config with carrier and power ramp parameters")]
    config: String,

    /// Power on and unlock all carriers at startup
    #[arg(long)]
    bringup: bool,

    /// Milliseconds between stack ticks
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
}

fn main() {
    let args = Args::parse();
    let cfg = load_config_from_toml(&args.config);
    let _log_guard = debug::setup_logging_default(cfg.config().debug_log.clone());

    let mut router = build_bts_stack(&cfg);
    router.set_tick_interval(Some(Duration::from_millis(args.tick_ms)));

    if args.bringup {
        tracing::info!("Bringing up {} carrier(s)", cfg.config().trx.len());
        submit_bringup(&mut router, cfg.config().trx.len());
    }

    // Set up Ctrl+C handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("failed to set Ctrl+C handler");

    router.run_stack(None, Some(running));
}
