pub mod accounts;
pub mod jobs;

pub use accounts::AccountsService;
pub use jobs::JobsService;
