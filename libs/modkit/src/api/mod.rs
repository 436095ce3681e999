pub mod error;
pub mod layers;
pub mod request_id;
