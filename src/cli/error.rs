// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all mosflow-related errors. This should be the *only*
//! error enum that is publicly visible from the binary.

use thiserror::Error;

use crate::{
    catalogue::CatalogueError, io::GlobError, obsdefs::DefinitionError, obxml::ObXmlError,
    workflow::WorkflowError,
};

/// The *only* error that `mosflow` reports. Each message carries a hint where
/// one is useful.
#[derive(Error, Debug)]
pub enum MosflowError {
    /// The DATAMVER values of the inputs disagree.
    #[error("{0}\n\nAll inputs must come from the same data model version. Use --pass_datamver to continue anyway.")]
    Datamver(String),

    /// An input file doesn't exist.
    #[error("{0}\n\nCheck the path, or run the previous stage of the workflow first.")]
    MissingInput(String),

    /// A problem with a FITS catalogue or catalogue template.
    #[error("{0}")]
    Catalogue(String),

    /// A cfitsio error. Because these are usually quite spartan, some
    /// suggestions are provided here.
    #[error("cfitsio error: {0}\n\nIf you don't know what this means, try --log_level debug.")]
    Cfitsio(String),

    /// A problem with a populator's data file.
    #[error("{0}\n\nData files are TOML or JSON tables mapping each template column to a list of values.")]
    DataFile(String),

    /// A problem with an OB XML.
    #[error("{0}")]
    ObXml(String),

    /// A problem with a PROGTEMP or OBSTEMP definition file.
    #[error("{0}\n\nDefinition files hold one 'DATAMVER <version>' line and rows of '<field> <code> <value...>'.")]
    Definition(String),

    /// A bad command-line value.
    #[error("{0}")]
    Args(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl MosflowError {
    /// The exit status of the process when this error is reported.
    pub fn exit_code(&self) -> i32 {
        match self {
            MosflowError::Datamver(_) => 2,
            _ => 1,
        }
    }
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<WorkflowError> for MosflowError {
    fn from(e: WorkflowError) -> Self {
        let s = e.to_string();
        match e {
            WorkflowError::MissingInput(_) => Self::MissingInput(s),
            WorkflowError::DatamverMismatch { .. } => Self::Datamver(s),
            WorkflowError::BadFileName(_)
            | WorkflowError::BadCalibRequest(_)
            | WorkflowError::BadMaxRadius(_) => Self::Args(s),
            WorkflowError::OutputClash(_) => Self::Catalogue(s),
            #[cfg(feature = "plotting")]
            WorkflowError::Draw(_) => Self::Generic(s),
            WorkflowError::Catalogue(e) => Self::from(e),
            WorkflowError::ObXml(e) => Self::from(e),
            WorkflowError::Definition(e) => Self::from(e),
            WorkflowError::Glob(e) => Self::from(e),
            WorkflowError::IO(e) => Self::from(e),
        }
    }
}

impl From<CatalogueError> for MosflowError {
    fn from(e: CatalogueError) -> Self {
        let s = e.to_string();
        match e {
            CatalogueError::Fits(_) => Self::Cfitsio(s),
            CatalogueError::DataFileType { .. } | CatalogueError::DataFileDecode { .. } => {
                Self::DataFile(s)
            }
            CatalogueError::IO(_) => Self::Generic(s),
            _ => Self::Catalogue(s),
        }
    }
}

impl From<ObXmlError> for MosflowError {
    fn from(e: ObXmlError) -> Self {
        Self::ObXml(e.to_string())
    }
}

impl From<DefinitionError> for MosflowError {
    fn from(e: DefinitionError) -> Self {
        Self::Definition(e.to_string())
    }
}

impl From<GlobError> for MosflowError {
    fn from(e: GlobError) -> Self {
        Self::MissingInput(e.to_string())
    }
}

impl From<std::io::Error> for MosflowError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_exit_codes() {
        let e = MosflowError::from(WorkflowError::DatamverMismatch {
            catalogue: "8.00".to_string(),
            xml_template: "7.00".to_string(),
            progtemp: "8.00".to_string(),
            obstemp: "8.00".to_string(),
        });
        assert!(matches!(e, MosflowError::Datamver(_)));
        assert_eq!(e.exit_code(), 2);
        assert!(e.to_string().contains("--pass_datamver"));

        let e = MosflowError::from(WorkflowError::MissingInput(PathBuf::from("nope.fits")));
        assert!(matches!(e, MosflowError::MissingInput(_)));
        assert_eq!(e.exit_code(), 1);
    }

    #[test]
    fn test_catalogue_errors_are_classified() {
        let e = MosflowError::from(WorkflowError::Catalogue(CatalogueError::InvalidVerbosity(2)));
        assert!(matches!(e, MosflowError::Catalogue(_)));
        assert!(e.to_string().contains("report_verbosity"));
    }
}
