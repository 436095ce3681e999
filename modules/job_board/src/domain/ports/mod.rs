pub mod snapshot;
pub mod source;

pub use snapshot::{Snapshot, SnapshotSource, SnapshotUser, UserSecret};
pub use source::{JobSource, RemoteJob};
