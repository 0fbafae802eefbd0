//! Helper functions for creating errors

use super::types::BackofficeError;

impl BackofficeError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch(message.into())
    }

    pub fn operation<S: Into<String>>(message: S) -> Self {
        Self::Operation(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }
}
