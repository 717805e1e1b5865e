pub mod adm_state;
pub mod amr_loop;
pub mod carrier;
pub mod lchan;
pub mod nm_reply;
pub mod pchan_resolver;
pub mod power_ctrl;
pub mod provision;
