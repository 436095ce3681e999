pub mod model;

pub use model::{Credentials, Job, NewAccount, Profile, ProfilePatch, User};
