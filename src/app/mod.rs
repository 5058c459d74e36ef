pub mod aggregator;
pub mod ports;
pub mod session;
