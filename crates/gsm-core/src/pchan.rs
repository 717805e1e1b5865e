use serde::Deserialize;

/// Physical channel configuration of a timeslot (TS 52.021 / TS 48.058 channel combinations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PhysChanConfig {
    None,
    Ccch,
    CcchSdcch4,
    CcchSdcch4Cbch,
    TchF,
    TchH,
    Sdcch8Sacch8c,
    Sdcch8Sacch8cCbch,
    Pdch,
    /// Dynamic TCH/F or PDCH, switched by PDCH ACT/DEACT
    TchFPdch,
    /// Fully dynamic timeslot, switched by regular channel activation
    OsmoDyn,
    Unknown,
}

impl PhysChanConfig {
    /// Dynamically switchable kinds must be resolved to a concrete kind before being applied
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, PhysChanConfig::TchFPdch | PhysChanConfig::OsmoDyn)
    }

    /// Kinds carrying an always-on BCCH/CCCH
    #[inline]
    pub fn has_ccch(&self) -> bool {
        matches!(
            self,
            PhysChanConfig::Ccch | PhysChanConfig::CcchSdcch4 | PhysChanConfig::CcchSdcch4Cbch
        )
    }

    /// Kinds carrying a cell broadcast channel
    #[inline]
    pub fn has_cbch(&self) -> bool {
        matches!(self, PhysChanConfig::CcchSdcch4Cbch | PhysChanConfig::Sdcch8Sacch8cCbch)
    }
}

impl core::fmt::Display for PhysChanConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            PhysChanConfig::None => "NONE",
            PhysChanConfig::Ccch => "CCCH",
            PhysChanConfig::CcchSdcch4 => "CCCH+SDCCH4",
            PhysChanConfig::CcchSdcch4Cbch => "CCCH+SDCCH4+CBCH",
            PhysChanConfig::TchF => "TCH/F",
            PhysChanConfig::TchH => "TCH/H",
            PhysChanConfig::Sdcch8Sacch8c => "SDCCH8",
            PhysChanConfig::Sdcch8Sacch8cCbch => "SDCCH8+CBCH",
            PhysChanConfig::Pdch => "PDCH",
            PhysChanConfig::TchFPdch => "TCH/F_PDCH",
            PhysChanConfig::OsmoDyn => "TCH/F_TCH/H_SDCCH8_PDCH",
            PhysChanConfig::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Slot type codes understood by the transceiver (SETSLOT command)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TrxSlotType {
    Unknown = 0,
    /// Combination I, TCH/F + FACCH/F + SACCH/TF
    I = 1,
    /// Combination III, 2x TCH/H + FACCH/H + SACCH/TH
    III = 3,
    /// Combination IV, FCCH + SCH + BCCH + CCCH
    IV = 4,
    /// Combination V, FCCH + SCH + BCCH + CCCH + SDCCH/4 + SACCH/C4
    V = 5,
    /// Combination VII, SDCCH/8 + SACCH/8
    VII = 7,
    /// Dummy burst filling
    Fill = 8,
    /// Combination XIII, PDTCH/F + PACCH/F + PTCCH/F
    XIII = 13,
}

impl std::convert::TryFrom<u64> for TrxSlotType {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(TrxSlotType::Unknown),
            1 => Ok(TrxSlotType::I),
            3 => Ok(TrxSlotType::III),
            4 => Ok(TrxSlotType::IV),
            5 => Ok(TrxSlotType::V),
            7 => Ok(TrxSlotType::VII),
            8 => Ok(TrxSlotType::Fill),
            13 => Ok(TrxSlotType::XIII),
            _ => Err(()),
        }
    }
}

impl TrxSlotType {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        self as u64
    }
}

impl From<TrxSlotType> for u64 {
    fn from(e: TrxSlotType) -> Self { e.into_raw() }
}

impl core::fmt::Display for TrxSlotType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}({})", self, self.into_raw())
    }
}

/// Physical channel kind to transceiver slot type. Order matters: reverse lookups
/// return the first entry carrying a given slot type.
const SLOT_TYPE_TABLE: [(PhysChanConfig, TrxSlotType); 10] = [
    (PhysChanConfig::None, TrxSlotType::Fill),
    (PhysChanConfig::Ccch, TrxSlotType::IV),
    (PhysChanConfig::CcchSdcch4, TrxSlotType::V),
    (PhysChanConfig::CcchSdcch4Cbch, TrxSlotType::V),
    (PhysChanConfig::TchF, TrxSlotType::I),
    (PhysChanConfig::TchH, TrxSlotType::III),
    (PhysChanConfig::Sdcch8Sacch8c, TrxSlotType::VII),
    (PhysChanConfig::Sdcch8Sacch8cCbch, TrxSlotType::VII),
    (PhysChanConfig::Pdch, TrxSlotType::XIII),
    (PhysChanConfig::Unknown, TrxSlotType::Unknown),
];

/// Maps a physical channel kind to the slot type sent to the transceiver.
/// Dynamic kinds have no slot type of their own and map to `TrxSlotType::Unknown`.
pub fn to_slot_type(pchan: PhysChanConfig) -> TrxSlotType {
    SLOT_TYPE_TABLE
        .iter()
        .find(|(p, _)| *p == pchan)
        .map(|(_, t)| *t)
        .unwrap_or(TrxSlotType::Unknown)
}

/// Maps a raw transceiver slot type back to the first physical channel kind using it
pub fn from_slot_type(slot_type: u8) -> PhysChanConfig {
    SLOT_TYPE_TABLE
        .iter()
        .find(|(_, t)| t.into_raw() == slot_type as u64)
        .map(|(p, _)| *p)
        .unwrap_or(PhysChanConfig::Unknown)
}
