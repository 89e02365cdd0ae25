pub mod error;
pub mod qr;
pub mod types;
