/*
 * Copyright 2026 The cheekyfs authors
 *
 * This file is part of cheekyfs.
 *
 * cheekyfs is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * cheekyfs is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
 * A PARTICULAR PURPOSE. See the GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License along with
 * cheekyfs. If not, see <https://www.gnu.org/licenses/>.
 */

//! Splits absolute paths into validated name components.
//!
//! There is no interpretation of `.` or `..`; they are ordinary names, subject
//! to the same length limit as anything else.

use crate::error::{Error, Result};
use crate::MAX_PATH_COMPONENT_LENGTH;

/// Splits an absolute path into its components.
///
/// `/` parses to an empty sequence (the root). A double slash anywhere in the
/// path (an empty component) is rejected as [`Error::InvalidPath`], matching
/// the reference implementation's documented behavior for that corner case.
pub fn parse(path: &str) -> Result<Vec<String>> {
    if path.is_empty() {
        return Err(Error::InvalidPath);
    }
    if !path.starts_with('/') {
        return Err(Error::InvalidPath);
    }
    if path == "/" {
        return Ok(Vec::new());
    }
    if path.ends_with('/') {
        return Err(Error::InvalidPath);
    }

    path[1..]
        .split('/')
        .map(|component| {
            if component.is_empty() {
                return Err(Error::InvalidPath);
            }
            if component.len() > MAX_PATH_COMPONENT_LENGTH {
                return Err(Error::InvalidName);
            }
            Ok(component.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_invalid() {
        assert_eq!(parse(""), Err(Error::InvalidPath));
    }

    #[test]
    fn must_start_with_slash() {
        assert_eq!(parse("foo"), Err(Error::InvalidPath));
    }

    #[test]
    fn root_has_no_components() {
        assert_eq!(parse("/").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn trailing_slash_is_invalid() {
        assert_eq!(parse("/foo/"), Err(Error::InvalidPath));
    }

    #[test]
    fn double_slash_is_invalid() {
        assert_eq!(parse("//foo"), Err(Error::InvalidPath));
        assert_eq!(parse("/foo//bar"), Err(Error::InvalidPath));
    }

    #[test]
    fn splits_on_single_slashes() {
        assert_eq!(parse("/foo/bar").unwrap(), vec!["foo", "bar"]);
    }

    #[test]
    fn component_at_the_limit_is_fine() {
        assert_eq!(parse("/abcdef").unwrap(), vec!["abcdef"]);
    }

    #[test]
    fn component_over_the_limit_is_invalid_name() {
        assert_eq!(parse("/abcdefg"), Err(Error::InvalidName));
    }

    #[test]
    fn dot_and_dotdot_are_ordinary_names() {
        assert_eq!(parse("/./..").unwrap(), vec![".", ".."]);
    }
}
