//! Book domain module
//!
//! Books are the catalog's only resource. They are keyed by a generated id
//! and carry a unique, normalized ISBN used for metadata enrichment.

mod entity;
mod isbn;
mod repository;
mod validation;

pub use entity::{Book, BookId};
pub use isbn::Isbn;
pub use repository::{
    BookQuery, BookRepository, DEFAULT_PAGE_SIZE, DUPLICATE_ISBN_MESSAGE, INVALID_PAGE_MESSAGE,
    MAX_PAGE_SIZE,
};
#[cfg(test)]
pub use repository::MockBookRepository;
pub use validation::{BookFields, BookInput, BookValidationError};
