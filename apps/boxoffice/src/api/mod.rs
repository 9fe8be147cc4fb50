//! HTTP handlers.
//!
//! Handlers are thin: extract the request, call one service method, shape the
//! JSON response. Every failure is a [`DomainError`](boxoffice_core::DomainError)
//! converted into an [`AppError`](boxoffice_web::AppError) by `?`.

pub mod comments;
pub mod events;
pub mod members;
pub mod products;
pub mod users;

use serde::Serialize;

/// `{count, data}` body for collections.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    /// Number of records in `data`
    pub count: usize,
    /// The records
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// `{message?, data, warnings?}` body for single records.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    /// Outcome of a mutation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    /// The record
    pub data: T,
    /// Informational warnings of a mutation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl<T> DataResponse<T> {
    /// Body holding only `data`.
    pub const fn new(data: T) -> Self {
        Self {
            message: None,
            data,
            warnings: None,
        }
    }

    /// Add a message.
    #[must_use]
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    /// Add warnings; an empty list is still serialized.
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = Some(warnings);
        self
    }
}
