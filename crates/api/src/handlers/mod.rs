pub mod auth;
pub mod qr;
