pub mod credentials;
pub mod submission;
