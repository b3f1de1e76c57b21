// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! OBSTEMP decoding. Each of the five letters of an OBSTEMP selects the value
//! of one observing constraint.

use std::path::Path;

use super::{DefinitionError, DefinitionTable};

/// The constraints encoded by an OBSTEMP, in letter order. These are also the
/// attribute names of the `<obsconstraints>` element of an OB.
pub const OBSTEMP_FIELDS: [&str; 5] = [
    "seeing_max",
    "transparency_min",
    "elevation_min",
    "moondist_min",
    "skybright_max",
];

/// A decoded OBSTEMP: (constraint, value) pairs in `OBSTEMP_FIELDS` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstempInfo {
    pub code: String,
    pub constraints: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone)]
pub struct ObstempTable(pub DefinitionTable);

impl ObstempTable {
    pub fn read<P: AsRef<Path>>(file: P) -> Result<ObstempTable, DefinitionError> {
        DefinitionTable::read(file).map(ObstempTable)
    }

    pub fn datamver(&self) -> &str {
        &self.0.datamver
    }

    pub fn decode(&self, code: &str) -> Result<ObstempInfo, DefinitionError> {
        let code = code.trim();
        if code.chars().count() != OBSTEMP_FIELDS.len()
            || !code.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(DefinitionError::InvalidObstemp(code.to_string()));
        }

        let mut constraints = Vec::with_capacity(OBSTEMP_FIELDS.len());
        for (field, letter) in OBSTEMP_FIELDS.iter().zip(code.chars()) {
            let values = self.0.lookup(field, &letter.to_string())?;
            let value = values
                .first()
                .cloned()
                .ok_or_else(|| DefinitionError::InvalidObstemp(code.to_string()))?;
            constraints.push((*field, value));
        }

        Ok(ObstempInfo {
            code: code.to_string(),
            constraints,
        })
    }
}
