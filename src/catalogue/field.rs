// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{Catalogue, CatalogueError};

/// A row of a MOS field-centre catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    pub survey: String,
    pub field_name: String,
    pub progtemp: String,
    pub obstemp: String,
    /// [degrees]
    pub ra: f64,
    /// [degrees]
    pub dec: f64,
    pub max_fibres: i64,
}

impl Catalogue {
    /// Interpret this catalogue as a field-centre catalogue.
    pub fn field_records(&self) -> Result<Vec<FieldRecord>, CatalogueError> {
        let surveys = self.str_column("TARGSRVY")?;
        let names = self.str_column("FIELD_NAME")?;
        let progtemps = self.str_column("PROGTEMP")?;
        let obstemps = self.str_column("OBSTEMP")?;
        let ras = self.float_column("FIELD_RA")?;
        let decs = self.float_column("FIELD_DEC")?;
        let max_fibres = self.int_column("MAX_FIBRES")?;

        Ok((0..self.num_rows())
            .map(|i| FieldRecord {
                survey: surveys[i].clone(),
                field_name: names[i].clone(),
                progtemp: progtemps[i].clone(),
                obstemp: obstemps[i].clone(),
                ra: ras[i],
                dec: decs[i],
                max_fibres: max_fibres[i],
            })
            .collect())
    }
}
