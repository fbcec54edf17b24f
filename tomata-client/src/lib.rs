mod client;
mod dev_backend;
pub mod domain;
mod tomata_url;

pub(crate) use tomata_url::*;

pub use client::*;
pub use dev_backend::DevBackend;
