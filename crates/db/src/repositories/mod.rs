mod qr_repo;

pub use qr_repo::{QrModel, QrRepo};
