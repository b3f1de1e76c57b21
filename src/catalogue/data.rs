// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Column data for populating templates, read from TOML or JSON files.
//!
//! The file holds a single table mapping column names to arrays, e.g.
//!
//! ```toml
//! TARGSRVY = ["GA-LRHIGHLAT", "GA-LRHIGHLAT"]
//! FIELD_RA = [100.0, 200.0]
//! ```

use std::{fs::File, io::Read, path::Path, str::FromStr};

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{CatalogueError, ColumnValues};

lazy_static::lazy_static! {
    pub static ref DATA_FILE_TYPES_COMMA_SEPARATED: String = DataFileType::iter().join(", ");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub enum DataFileType {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

/// Read a column name -> values map from a TOML or JSON file. The format is
/// chosen by the file extension.
pub fn read_data_file(file: &Path) -> Result<IndexMap<String, ColumnValues>, CatalogueError> {
    debug!("Attempting to parse data file {}", file.display());
    let file_type = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .and_then(|e| DataFileType::from_str(&e).ok());

    let mut contents = String::new();
    match file_type {
        Some(DataFileType::Toml) => {
            debug!("Parsing toml file...");
            File::open(file)?.read_to_string(&mut contents)?;
            toml::from_str(&contents).map_err(|err| CatalogueError::DataFileDecode {
                file: file.to_path_buf(),
                format: "toml",
                err: err.to_string(),
            })
        }
        Some(DataFileType::Json) => {
            debug!("Parsing json file...");
            File::open(file)?.read_to_string(&mut contents)?;
            serde_json::from_str(&contents).map_err(|err| CatalogueError::DataFileDecode {
                file: file.to_path_buf(),
                format: "json",
                err: err.to_string(),
            })
        }
        None => Err(CatalogueError::DataFileType {
            file: file.to_path_buf(),
            valid: DATA_FILE_TYPES_COMMA_SEPARATED.clone(),
        }),
    }
}
