//! The command surface: validated wrappers over the execution helpers.
//!
//! Each wrapper checks its arguments, then hands a single store
//! round-trip to the matching typed helper on
//! [`KvClient`](crate::client::KvClient). Blank keys, patterns, and
//! members are rejected before any network contact.

mod connection;
mod keys;
mod lists;
mod server;
mod sets;
mod strings;

use crate::error::KvMiddlewareError;

pub(crate) fn non_blank(value: &str, what: &str) -> Result<(), KvMiddlewareError> {
    if value.trim().is_empty() {
        return Err(KvMiddlewareError::InvalidArgument(format!(
            "{what} must not be blank"
        )));
    }
    Ok(())
}

pub(crate) fn non_empty<T>(values: &[T], what: &str) -> Result<(), KvMiddlewareError> {
    if values.is_empty() {
        return Err(KvMiddlewareError::InvalidArgument(format!(
            "at least one {what} is required"
        )));
    }
    Ok(())
}

pub(crate) fn all_non_blank(values: &[&str], what: &str) -> Result<(), KvMiddlewareError> {
    for value in values {
        non_blank(value, what)?;
    }
    Ok(())
}

/// Build the argument vector `[first, rest...]`.
pub(crate) fn prepend<'a>(first: &'a str, rest: &[&'a str]) -> Vec<&'a str> {
    let mut args = Vec::with_capacity(rest.len() + 1);
    args.push(first);
    args.extend_from_slice(rest);
    args
}
