pub mod base;
pub mod oracle;
