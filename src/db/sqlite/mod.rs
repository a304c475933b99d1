mod log_stores;

pub use log_stores::*;
