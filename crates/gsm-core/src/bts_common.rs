// SAPs between the control-plane entities
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Sap {
    /// RSL/L1, MPH-INFO primitives and measurement indications
    PhSap,

    /// OML/L1, attribute sets, opstart and state changes
    NmSap,

    /// L1/transceiver control link
    TrxcSap,

    /// L1/power ramp executor
    PwrSap,

    /// L1/PCU information
    PcuSap,
}
