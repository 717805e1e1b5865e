use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use gsm_core::PhysChanConfig;
use serde::Deserialize;
use toml::Value;

use super::stack_config::{CfgPowerRamp, CfgTrx, SharedConfig, StackConfig, default_supported_pchans};

/// Build `SharedConfig` from a TOML configuration file
pub fn from_toml_str(toml_str: &str) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    for (i, trx) in root.trx.iter().enumerate() {
        if !trx.extra.is_empty() {
            return Err(format!("Unrecognized fields in trx[{}]: {:?}", i, sorted_keys(&trx.extra)).into());
        }
    }
    if let Some(ref pr) = root.power_ramp {
        if !pr.extra.is_empty() {
            return Err(format!("Unrecognized fields in power_ramp: {:?}", sorted_keys(&pr.extra)).into());
        }
    }

    // Build config from required and optional values
    let mut cfg = StackConfig {
        debug_log: root.debug_log,
        trx: Vec::with_capacity(root.trx.len()),
        power_ramp: CfgPowerRamp::default(),
    };

    for trx in root.trx {
        let mut dst = CfgTrx::default();
        apply_trx_patch(&mut dst, trx);
        cfg.trx.push(dst);
    }

    if let Some(pr) = root.power_ramp {
        apply_power_ramp_patch(&mut cfg.power_ramp, pr);
    }

    cfg.validate()?;
    Ok(SharedConfig::from_config(cfg))
}

/// Build `SharedConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `SharedConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    let r = BufReader::new(f);
    let cfg = from_reader(r)?;
    Ok(cfg)
}

fn apply_trx_patch(dst: &mut CfgTrx, src: TrxDto) {
    if let Some(v) = src.nominal_power {
        dst.nominal_power_dbm = v;
    }
    // Option
    dst.forced_max_power_red_db = src.forced_max_power_red;

    if let Some(v) = src.slotmask {
        dst.slotmask = v;
    }
    dst.supported_pchans = src.supported_pchans.unwrap_or_else(default_supported_pchans);
}

fn apply_power_ramp_patch(dst: &mut CfgPowerRamp, src: PowerRampDto) {
    if let Some(v) = src.step_size {
        dst.step_size_db = v;
    }
    if let Some(v) = src.max_initial_power {
        dst.max_initial_power_dbm = v;
    }
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,

    #[serde(default)]
    trx: Vec<TrxDto>,

    #[serde(default)]
    power_ramp: Option<PowerRampDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct TrxDto {
    pub nominal_power: Option<i32>,
    pub forced_max_power_red: Option<i32>,
    pub slotmask: Option<u8>,
    pub supported_pchans: Option<Vec<PhysChanConfig>>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct PowerRampDto {
    pub step_size: Option<i32>,
    pub max_initial_power: Option<i32>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}


#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TRX: &str = r#"
        config_version = "0.1"
        debug_log = "/tmp/bts.log"

        [[trx]]
        nominal_power = 20
        slotmask = 255

        [[trx]]
        forced_max_power_red = 6
        slotmask = 15
        supported_pchans = ["TchF", "TchH", "Pdch"]

        [power_ramp]
        step_size = 4
    "#;

    #[test]
    fn test_load_two_trx() {
        let shared = from_toml_str(TWO_TRX).unwrap();
        let cfg = shared.config();
        assert_eq!(cfg.trx.len(), 2);
        assert_eq!(cfg.trx[0].nominal_power_dbm, 20);
        assert_eq!(cfg.trx[0].forced_max_power_red_db, None);
        assert_eq!(cfg.trx[1].forced_max_power_red_db, Some(6));
        assert_eq!(cfg.trx[1].supported_pchans, vec![PhysChanConfig::TchF, PhysChanConfig::TchH, PhysChanConfig::Pdch]);
        assert_eq!(cfg.enabled_timeslots(1), 4);
        assert_eq!(cfg.power_ramp.step_size_db, 4);
        assert_eq!(cfg.power_ramp.max_initial_power_dbm, 0);
    }

    #[test]
    fn test_reject_unknown_fields() {
        let toml = "config_version = \"0.1\"\n[[trx]]\nnominal_pwr = 3\n";
        assert!(from_toml_str(toml).is_err());
        let toml = "config_version = \"0.1\"\nbogus = 1\n[[trx]]\n";
        assert!(from_toml_str(toml).is_err());
    }

    #[test]
    fn test_reject_wrong_version() {
        let toml = "config_version = \"0.5\"\n[[trx]]\n";
        assert!(from_toml_str(toml).is_err());
    }

    #[test]
    fn test_reject_invalid_config() {
        // No carriers at all
        let toml = "config_version = \"0.1\"\n";
        assert!(from_toml_str(toml).is_err());
    }
}
