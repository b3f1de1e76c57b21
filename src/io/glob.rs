// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Functions to glob files.

use std::path::{Path, PathBuf};

use glob::glob;
use itertools::Itertools;
use thiserror::Error;

/// Given a glob pattern, get all of the matches from the filesystem.
pub(crate) fn get_all_matches_from_glob(g: &str) -> Result<Vec<PathBuf>, GlobError> {
    let mut entries = vec![];
    for entry in glob(g)? {
        match entry {
            Ok(e) => entries.push(e),
            Err(e) => return Err(GlobError::GlobCrate(e)),
        }
    }
    Ok(entries)
}

/// The same as `get_all_matches_from_glob`, but only a single result is
/// expected to be returned from the glob match. If there are no results, or
/// more than one, an error is returned.
pub(crate) fn get_single_match_from_glob(g: &str) -> Result<PathBuf, GlobError> {
    let entries = get_all_matches_from_glob(g)?;
    match entries.as_slice() {
        [] => Err(GlobError::NoMatches {
            glob: g.to_string(),
        }),
        [e] => Ok(e.clone()),
        _ => Err(GlobError::MoreThanOneMatch {
            glob: g.to_string(),
        }),
    }
}

/// Resolve a single input file. A path that exists is used as is; otherwise
/// the string is treated as a glob that must match exactly one file.
pub(crate) fn resolve_single_input(s: &str) -> Result<PathBuf, GlobError> {
    let p = Path::new(s);
    if p.exists() {
        Ok(p.to_path_buf())
    } else {
        get_single_match_from_glob(s)
    }
}

/// Resolve a list of input files, expanding any glob patterns. Paths that
/// exist are used as is. The result is sorted and deduplicated; every
/// argument must resolve to at least one file.
pub(crate) fn resolve_inputs<S: AsRef<str>>(args: &[S]) -> Result<Vec<PathBuf>, GlobError> {
    let mut files = vec![];
    for arg in args {
        let arg = arg.as_ref();
        let p = Path::new(arg);
        if p.exists() {
            files.push(p.to_path_buf());
            continue;
        }
        let matches = get_all_matches_from_glob(arg)?;
        if matches.is_empty() {
            return Err(GlobError::NoMatches {
                glob: arg.to_string(),
            });
        }
        files.extend(matches);
    }
    Ok(files.into_iter().sorted().dedup().collect())
}

#[derive(Error, Debug)]
/// Error type associated with glob helper functions.
pub enum GlobError {
    #[error("No files were found for {glob}")]
    NoMatches { glob: String },

    #[error("More than one glob matches were found for {glob}; we require only one match")]
    MoreThanOneMatch { glob: String },

    #[error(transparent)]
    GlobCrate(#[from] glob::GlobError),

    #[error(transparent)]
    PatternError(#[from] glob::PatternError),
}
