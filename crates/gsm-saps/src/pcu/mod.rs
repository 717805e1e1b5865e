use gsm_core::{AdmState, TrxNr};

/// Carrier state relevant to the PCU changed
#[derive(Debug)]
pub struct PcuInfoInd {
    pub trx: TrxNr,
    pub adm_state: AdmState,
    pub rf_muted: bool,
}
