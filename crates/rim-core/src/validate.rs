//! # Validation Contract
//!
//! Leaf values and aggregates implement [`Validate`]. Validation is a pure
//! function of the current state: it never mutates, never retries, and stops
//! at the first violation.
//!
//! Aggregates report a failing part by wrapping the part's own error with
//! [`ValidationError::within`] or [`ValidationError::at_index`]; the nested
//! message is kept verbatim and the underlying kind stays reachable through
//! [`ValidationError::root_cause`].

use crate::error::ValidationError;

/// A value that can check its own semantic invariants.
pub trait Validate {
    /// `Ok(())` if valid, otherwise the first violation found.
    fn valid(&self) -> Result<(), ValidationError>;
}

impl<T: Validate + ?Sized> Validate for &T {
    fn valid(&self) -> Result<(), ValidationError> {
        (**self).valid()
    }
}

impl<T: Validate + ?Sized> Validate for Box<T> {
    fn valid(&self) -> Result<(), ValidationError> {
        (**self).valid()
    }
}

/// Validate a sequence, reporting the first invalid member as
/// `<item> at index <i>: <member error>`.
pub fn validate_each<'a, T, I>(item: &'static str, members: I) -> Result<(), ValidationError>
where
    T: Validate + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for (index, member) in members.into_iter().enumerate() {
        member.valid().map_err(|err| err.at_index(item, index))?;
    }
    Ok(())
}
