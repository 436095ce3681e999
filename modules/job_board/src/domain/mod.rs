pub mod credentials;
pub mod error;
pub mod fallback;
pub mod mapping;
pub mod ports;
pub mod repo;
pub mod service;
pub mod sync;
