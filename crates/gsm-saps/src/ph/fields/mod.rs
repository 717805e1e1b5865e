pub mod amr_conf;
pub mod chan_mode;
pub mod encryption;
pub mod lchan_params;
