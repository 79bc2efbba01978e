//! Cascade orchestration - validation and the delete/restore engines

pub mod delete;
pub mod restore;
pub mod validate;

pub use delete::run_deletes;
pub use restore::run_restores;
pub use validate::validate_cascade;
