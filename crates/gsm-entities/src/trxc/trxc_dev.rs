use gsm_saps::trxc::{TrxcCmdReq, TrxcCmdRsp};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TrxcDevError {
    /// No transceiver behind this carrier number
    UnknownTrx,
    /// The control link is down
    LinkDown,
}

/// Trait for transceiver control transports. Commands are submitted one by one,
/// responses are collected once per tick.
pub trait TrxcDev: Send {
    fn submit(&mut self, req: &TrxcCmdReq) -> Result<(), TrxcDevError>;

    /// Responses that arrived since the last call
    fn poll(&mut self) -> Vec<TrxcCmdRsp>;
}
