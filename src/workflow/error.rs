// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from running workflow stages.

use std::path::PathBuf;

use thiserror::Error;

use crate::{
    catalogue::CatalogueError, io::GlobError, obsdefs::DefinitionError, obxml::ObXmlError,
};

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Input file {0} does not exist or is not a file")]
    MissingInput(PathBuf),

    #[error("Cannot derive an output file name from {0}")]
    BadFileName(PathBuf),

    #[error("DATAMVER mismatch: field catalogue has '{catalogue}', XML template has '{xml_template}', PROGTEMP file has '{progtemp}', OBSTEMP file has '{obstemp}'")]
    DatamverMismatch {
        catalogue: String,
        xml_template: String,
        progtemp: String,
        obstemp: String,
    },

    #[error("More than one OB would be written to {0}; rename the fields in the field catalogue")]
    OutputClash(String),

    #[error("The number of calibration stars requested must be -1 (no limit) or non-negative, not {0}")]
    BadCalibRequest(i64),

    #[error("The maximum radius must be a non-negative number of degrees, not {0}")]
    BadMaxRadius(f64),

    #[cfg(feature = "plotting")]
    #[error(transparent)]
    Draw(#[from] super::plotting::DrawError),

    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error(transparent)]
    ObXml(#[from] ObXmlError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Glob(#[from] GlobError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
