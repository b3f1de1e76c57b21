// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PROGTEMP decoding.
//!
//! A PROGTEMP is five digits, optionally followed by `.N` (the number of
//! chained OBs) and/or `+` (an extended OB). The digits are, in order: the
//! observing mode and resolution, the red VPH, the blue VPH, the number of
//! exposures and the binning.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::{DefinitionError, DefinitionTable};

lazy_static! {
    static ref PROGTEMP: Regex =
        Regex::new(r"^(\d)(\d)(\d)(\d)(\d)(?:\.(\d+))?(\+)?$").unwrap();
}

/// A decoded PROGTEMP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgtempInfo {
    pub code: String,
    /// e.g. "MOS", "LIFU", "mIFU".
    pub obsmode: String,
    /// e.g. "LR", "HR".
    pub resolution: String,
    pub red_vph: String,
    pub blue_vph: String,
    pub num_exposures: u32,
    pub binning: String,
    /// The time of each exposure, if the table defines one for this mode
    /// [seconds].
    pub exp_time: Option<String>,
    /// The number of chained OBs.
    pub chained: Option<u32>,
    pub extended: bool,
}

#[derive(Debug, Clone)]
pub struct ProgtempTable(pub DefinitionTable);

impl ProgtempTable {
    pub fn read<P: AsRef<Path>>(file: P) -> Result<ProgtempTable, DefinitionError> {
        DefinitionTable::read(file).map(ProgtempTable)
    }

    pub fn datamver(&self) -> &str {
        &self.0.datamver
    }

    pub fn decode(&self, code: &str) -> Result<ProgtempInfo, DefinitionError> {
        let invalid = || DefinitionError::InvalidProgtemp(code.to_string());
        let caps = PROGTEMP.captures(code.trim()).ok_or_else(invalid)?;
        let digit = |i: usize| caps.get(i).map(|m| m.as_str()).ok_or_else(invalid);

        let mode = self.0.lookup("mode", digit(1)?)?;
        let (obsmode, resolution) = match mode {
            [obsmode, resolution, ..] => (obsmode.clone(), resolution.clone()),
            [obsmode] => (obsmode.clone(), String::new()),
            [] => return Err(invalid()),
        };
        let first = |field: &str, code: &str| -> Result<String, DefinitionError> {
            self.0
                .lookup(field, code)?
                .first()
                .cloned()
                .ok_or_else(invalid)
        };

        Ok(ProgtempInfo {
            code: code.trim().to_string(),
            obsmode,
            resolution,
            red_vph: first("red_vph", digit(2)?)?,
            blue_vph: first("blue_vph", digit(3)?)?,
            num_exposures: digit(4)?.parse().map_err(|_| invalid())?,
            binning: first("binning", digit(5)?)?,
            exp_time: self
                .0
                .get("exp_time", digit(1)?)
                .and_then(|v| v.first().cloned()),
            chained: match caps.get(6) {
                Some(m) => Some(m.as_str().parse().map_err(|_| invalid())?),
                None => None,
            },
            extended: caps.get(7).is_some(),
        })
    }
}
