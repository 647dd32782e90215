//! API request/response types

pub mod book;
pub mod error;
pub mod json;

pub use book::{
    BookListResponse, BookResponse, ListBooksParams, RefreshErrorResponse, RefreshStatusResponse,
};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
