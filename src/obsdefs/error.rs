// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with PROGTEMP and OBSTEMP definition tables.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Couldn't read definition file {file}: {err}")]
    IO { file: PathBuf, err: std::io::Error },

    #[error("{file} doesn't have a DATAMVER line")]
    MissingDatamver { file: PathBuf },

    #[error("{file} line {line_num}: expected '<field> <code> <value...>', but got '{line}'")]
    Malformed {
        file: PathBuf,
        line_num: usize,
        line: String,
    },

    #[error("'{0}' is not a valid PROGTEMP (expected e.g. '11331' or '11331.2+')")]
    InvalidProgtemp(String),

    #[error("'{0}' is not a valid OBSTEMP (expected five letters, e.g. 'DACEB')")]
    InvalidObstemp(String),

    #[error("Code '{code}' of '{field}' is not defined in {file}")]
    UnknownCode {
        field: String,
        code: String,
        file: PathBuf,
    },
}
