pub mod http;
pub mod payload;
pub mod snapshot;
pub mod storage;
