//! Book infrastructure: repositories, service and sample data

mod factory;
mod in_memory;
mod postgres;
mod seed;
mod service;

pub use factory::{BookRepositoryFactory, StorageType};
pub use in_memory::InMemoryBookRepository;
pub use postgres::PostgresBookRepository;
pub use seed::{seed_sample_books, SeedOutcome};
pub use service::{BookPage, BookService};
