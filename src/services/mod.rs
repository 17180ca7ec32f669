pub mod diagnostics_service;
pub mod submission_service;
