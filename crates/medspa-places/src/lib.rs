pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::{PlacesClient, DETAIL_FIELDS};
pub use error::PlacesError;
pub use types::ApiStatus;
