// Entities taking part in the BTS control plane
#[derive(PartialEq, Eq, Hash, Clone, Debug, Copy)]
pub enum BtsEntity {
    /// Operations & Maintenance (A-bis OML) handler
    Oml,
    /// Radio Signalling Link (A-bis RSL) handler
    Rsl,
    /// Transceiver-specific layer 1 model, owns carriers, timeslots and lchans
    L1,
    /// Per-timeslot burst scheduler. Only ever a source of measurement primitives
    Sched,
    /// Transceiver control link (hardware transport)
    Trxc,
    /// Power ramp executor
    Pwr,
    /// Packet control unit
    Pcu,
}
