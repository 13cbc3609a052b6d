//! Argument helpers for operator reducers
//!
//! Reducers destructure their arguments through these functions. A mismatch
//! is an authoring mistake in the operator library, so it is reported as a
//! [`SystemError`] rather than a domain error.

use super::types::{Schema, SystemError};

/// Expect exactly `tag`
pub fn expect_tag<S: Schema>(value: &S, tag: S::Tag) -> Result<&S, SystemError> {
    if value.has_tag(tag) {
        Ok(value)
    } else {
        Err(SystemError::tag_mismatch(&[tag], value.tag()))
    }
}

/// Expect `tag` and narrow the value to the payload `project` extracts
///
/// `project` should answer `Some` exactly for values tagged `tag`. A value
/// it rejects is reported as a mismatch against `tag`, whatever its tag.
pub fn expect_payload<'a, S: Schema, P: ?Sized>(
    value: &'a S,
    tag: S::Tag,
    project: impl FnOnce(&'a S) -> Option<&'a P>,
) -> Result<&'a P, SystemError> {
    match project(value) {
        Some(payload) if value.has_tag(tag) => Ok(payload),
        _ => Err(SystemError::tag_mismatch(&[tag], value.tag())),
    }
}

/// Expect one of `tags`, returning the tag actually found
pub fn expect_one_of<S: Schema>(value: &S, tags: &[S::Tag]) -> Result<S::Tag, SystemError> {
    let found = value.tag();
    if tags.contains(&found) {
        Ok(found)
    } else {
        Err(SystemError::tag_mismatch(tags, found))
    }
}

/// Expect exactly `n` arguments
pub fn expect_arity<T>(args: &[T], n: usize) -> Result<(), SystemError> {
    if args.len() == n {
        Ok(())
    } else {
        Err(SystemError::new(format!(
            "expected {n} argument(s), got {}",
            args.len()
        )))
    }
}
