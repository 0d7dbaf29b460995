pub mod address;
pub mod bps;
pub mod price;
pub mod timestamp;
