mod config;
mod credentials;
mod directory;
mod error;
mod image_host;
mod notifier;
mod pass;
mod payload;
mod qr;
mod routes;
mod shortener;
mod signer;
#[cfg(test)]
mod test_support;
mod types;
mod wallet;

pub use config::*;
pub use credentials::*;
pub use directory::*;
pub use error::*;
pub use image_host::*;
pub use notifier::*;
pub use pass::*;
pub use payload::*;
pub use qr::*;
pub use routes::*;
pub use shortener::*;
pub use signer::*;
pub use types::*;
pub use wallet::*;
