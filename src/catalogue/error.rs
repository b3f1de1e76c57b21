// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with FITS catalogues and their templates.

use std::path::PathBuf;

use thiserror::Error;

use crate::io::read::fits::FitsError;

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Column '{column}' has format '{tform}', which isn't supported")]
    UnsupportedFormat { column: String, tform: String },

    #[error("Column '{column}' is not in {catalogue}")]
    MissingColumn { column: String, catalogue: String },

    #[error("Column '{column}' holds {actual} values, but {expected} values are required")]
    WrongType {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("The template columns {columns} were not given any data")]
    MissingData { columns: String },

    #[error("The columns {columns} are not in the template")]
    UnknownColumns { columns: String },

    #[error("Column '{column}' has {len} rows, but column '{first_column}' has {expected}")]
    LengthMismatch {
        column: String,
        len: usize,
        first_column: String,
        expected: usize,
    },

    #[error("report_verbosity must be 0 or 1, but got {0}")]
    InvalidVerbosity(i64),

    #[error("Template column '{0}' was asked for twice")]
    DuplicateColumn(String),

    #[error("Data file '{file}' doesn't have a recognised file extension! Valid extensions are: {valid}")]
    DataFileType { file: PathBuf, valid: String },

    #[error("Couldn't decode {format} structure from {file}:\n{err}")]
    DataFileDecode {
        file: PathBuf,
        format: &'static str,
        err: String,
    },

    #[error(transparent)]
    Fits(#[from] FitsError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
