pub mod analysis;
pub mod batch;
pub mod ranking;
mod repository;

pub use repository::RepositoryError;
