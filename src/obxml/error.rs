// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with OB XML documents.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObXmlError {
    #[error("Couldn't read {file}: {err}")]
    Read { file: PathBuf, err: std::io::Error },

    #[error("Couldn't write {file}: {err}")]
    Write { file: PathBuf, err: std::io::Error },

    #[error("{file}: {err}")]
    InFile { file: PathBuf, err: Box<ObXmlError> },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML: {0}")]
    Syntax(String),

    #[error("The XML document has no root element")]
    NoRoot,

    #[error("The OB has no <{0}> element")]
    MissingElement(&'static str),

    #[error("<{element}> has no '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("<{element}> attribute '{attribute}' is not a number: '{value}'")]
    NotANumber {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
}
