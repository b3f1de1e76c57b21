// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
FITS catalogues: a primary header and a single binary table.

Templates and populated catalogues share the same representation; a template
is a catalogue without rows. Every column keeps its format (TFORM) and the
keywords attached to it (TUNIT, TDISP, TNULL, TUCD, ...), so that deriving,
populating and re-writing a catalogue doesn't lose any of the data model.
 */

mod data;
mod error;
mod field;
mod populate;
mod stars;
mod target;
mod template;

pub use data::{read_data_file, DataFileType, DATA_FILE_TYPES_COMMA_SEPARATED};
pub use error::CatalogueError;
pub use field::FieldRecord;
pub use populate::{populate, refresh_datetime, PrimaryKeywords};
pub use stars::{ReferenceStar, StarCatalogue};
pub use target::TargetCatalogue;
pub use template::{sub_template, ColumnRename};

use std::path::Path;

use indexmap::IndexMap;
use log::{debug, trace};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::io::{
    find_card,
    read::fits::{
        fits_get_col, fits_get_table_shape, fits_open, fits_open_hdu, fits_read_header_cards,
    },
    write::{
        fits_create, fits_create_table, fits_write_cards, fits_write_checksums, fits_write_col,
        NewColumn,
    },
    HeaderCard, HeaderValue,
};

lazy_static::lazy_static! {
    /// Matches keywords attached to a table column, e.g. "TUNIT5".
    static ref COLUMN_KEYWORD: Regex = Regex::new(r"^T([A-Z]+)(\d+)$").unwrap();

    /// Matches the repeat count and type code of a TFORM.
    static ref TFORM: Regex = Regex::new(r"^(\d*)([A-Z])").unwrap();

    static ref NAXIS_KEYWORD: Regex = Regex::new(r"^NAXIS\d*$").unwrap();
}

/// Keywords that cfitsio manages itself.
const STRUCTURAL_KEYWORDS: [&str; 13] = [
    "SIMPLE", "XTENSION", "BITPIX", "EXTEND", "PCOUNT", "GCOUNT", "TFIELDS", "EXTNAME", "CHECKSUM",
    "DATASUM", "LONGSTRN", "END", "GROUPS",
];

fn is_structural(key: &str) -> bool {
    STRUCTURAL_KEYWORDS.contains(&key) || NAXIS_KEYWORD.is_match(key)
}

/// The type of the values in a column, derived from its TFORM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Str,
    Int,
    Float,
}

impl ColumnKind {
    fn from_tform(column: &str, tform: &str) -> Result<ColumnKind, CatalogueError> {
        let code = TFORM
            .captures(tform.trim())
            .and_then(|c| c.get(2))
            .map(|m| m.as_str());
        match code {
            Some("A") => Ok(ColumnKind::Str),
            Some("B" | "I" | "J" | "K") => Ok(ColumnKind::Int),
            Some("E" | "D") => Ok(ColumnKind::Float),
            _ => Err(CatalogueError::UnsupportedFormat {
                column: column.to_string(),
                tform: tform.to_string(),
            }),
        }
    }

    fn name(self) -> &'static str {
        match self {
            ColumnKind::Str => "string",
            ColumnKind::Int => "integer",
            ColumnKind::Float => "float",
        }
    }
}

/// The values of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValues {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Str(v) => v.len(),
            ColumnValues::Int(v) => v.len(),
            ColumnValues::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValues::Str(_) => ColumnKind::Str,
            ColumnValues::Int(_) => ColumnKind::Int,
            ColumnValues::Float(_) => ColumnKind::Float,
        }
    }

    fn empty(kind: ColumnKind) -> ColumnValues {
        match kind {
            ColumnKind::Str => ColumnValues::Str(vec![]),
            ColumnKind::Int => ColumnValues::Int(vec![]),
            ColumnKind::Float => ColumnValues::Float(vec![]),
        }
    }

    /// Convert these values so that they can be stored in a column of the
    /// given kind. Integers are promoted to floats; nothing else is converted.
    fn coerce(self, column: &str, kind: ColumnKind) -> Result<ColumnValues, CatalogueError> {
        if self.is_empty() {
            return Ok(ColumnValues::empty(kind));
        }
        match (self, kind) {
            (ColumnValues::Int(v), ColumnKind::Float) => {
                Ok(ColumnValues::Float(v.into_iter().map(|i| i as f64).collect()))
            }
            (v, k) if v.kind() == k => Ok(v),
            (v, k) => Err(CatalogueError::WrongType {
                column: column.to_string(),
                expected: k.name(),
                actual: v.kind().name(),
            }),
        }
    }
}

/// The schema of a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub tform: String,
    /// The keywords attached to this column, keyed without the column index
    /// (e.g. "TUNIT", "TNULL").
    pub keywords: Vec<HeaderCard>,
}

impl ColumnDef {
    pub fn kind(&self) -> Result<ColumnKind, CatalogueError> {
        ColumnKind::from_tform(&self.name, &self.tform)
    }

    pub fn keyword(&self, prefix: &str) -> Option<&HeaderValue> {
        find_card(&self.keywords, prefix).map(|c| &c.value)
    }

    /// Single-precision float columns are formatted with single precision.
    fn is_single_precision(&self) -> bool {
        TFORM
            .captures(self.tform.trim())
            .and_then(|c| c.get(2))
            .map(|m| m.as_str() == "E")
            .unwrap_or(false)
    }
}

/// A column's schema and its values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub def: ColumnDef,
    pub values: ColumnValues,
}

impl Column {
    /// Format a single cell as text. Non-finite floats become an empty string.
    pub fn cell_string(&self, row: usize) -> String {
        match &self.values {
            ColumnValues::Str(v) => v[row].clone(),
            ColumnValues::Int(v) => v[row].to_string(),
            ColumnValues::Float(v) => {
                let f = v[row];
                if !f.is_finite() {
                    String::new()
                } else if self.def.is_single_precision() {
                    format!("{:?}", f as f32)
                } else {
                    format!("{f:?}")
                }
            }
        }
    }
}

/// A FITS file with a primary header and one binary table.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    /// Non-structural primary header cards, in order.
    pub primary: Vec<HeaderCard>,
    /// The name of the table extension.
    pub extname: String,
    /// Non-structural cards of the table HDU that don't belong to a column.
    pub table_cards: Vec<HeaderCard>,
    pub columns: Vec<Column>,
}

impl Catalogue {
    /// Read a catalogue (or a template) from a FITS file. The first table
    /// extension is used.
    pub fn read<P: AsRef<Path>>(file: P) -> Result<Catalogue, CatalogueError> {
        let file = file.as_ref();
        debug!("Reading FITS catalogue {}", file.display());
        let mut fptr = fits_open(file)?;
        let primary_hdu = fits_open_hdu(&mut fptr, 0)?;
        let primary = fits_read_header_cards(&mut fptr, &primary_hdu)?
            .into_iter()
            .filter(|c| !is_structural(&c.key))
            .collect();

        let table_hdu = fits_open_hdu(&mut fptr, 1)?;
        let (col_names, num_rows) = fits_get_table_shape(&fptr, &table_hdu)?;
        let table_header = fits_read_header_cards(&mut fptr, &table_hdu)?;
        let extname = find_card(&table_header, "EXTNAME")
            .and_then(|c| c.value.as_str())
            .unwrap_or_default()
            .to_string();

        let mut tforms: Vec<Option<String>> = vec![None; col_names.len()];
        let mut col_keywords: Vec<Vec<HeaderCard>> = vec![vec![]; col_names.len()];
        let mut table_cards = vec![];
        for card in table_header {
            if is_structural(&card.key) {
                continue;
            }
            let captures = COLUMN_KEYWORD.captures(&card.key).and_then(|c| {
                let prefix = c.get(1)?.as_str().to_string();
                let index: usize = c.get(2)?.as_str().parse().ok()?;
                Some((prefix, index))
            });
            match captures {
                Some((prefix, index)) if index >= 1 && index <= col_names.len() => {
                    match prefix.as_str() {
                        "TYPE" => (),
                        "FORM" => tforms[index - 1] = card.value.as_str().map(|s| s.to_string()),
                        _ => col_keywords[index - 1].push(HeaderCard {
                            key: format!("T{prefix}"),
                            ..card
                        }),
                    }
                }
                _ => table_cards.push(card),
            }
        }

        let mut columns = Vec::with_capacity(col_names.len());
        for ((name, tform), keywords) in col_names.into_iter().zip(tforms).zip(col_keywords) {
            let tform = tform.unwrap_or_default();
            let def = ColumnDef {
                tform,
                keywords,
                name,
            };
            let values = match (def.kind()?, num_rows) {
                (kind, 0) => ColumnValues::empty(kind),
                (ColumnKind::Str, _) => {
                    ColumnValues::Str(fits_get_col(&mut fptr, &table_hdu, &def.name)?)
                }
                (ColumnKind::Int, _) => {
                    ColumnValues::Int(fits_get_col(&mut fptr, &table_hdu, &def.name)?)
                }
                (ColumnKind::Float, _) => {
                    ColumnValues::Float(fits_get_col(&mut fptr, &table_hdu, &def.name)?)
                }
            };
            trace!("Column {} ({}): {} rows", def.name, def.tform, values.len());
            columns.push(Column { def, values });
        }

        Ok(Catalogue {
            primary,
            extname,
            table_cards,
            columns,
        })
    }

    /// Write this catalogue to a new FITS file, including checksums. The file
    /// must not exist.
    pub fn write<P: AsRef<Path>>(&self, file: P) -> Result<(), CatalogueError> {
        let file = file.as_ref();
        debug!("Writing FITS catalogue {}", file.display());
        let mut fptr = fits_create(file)?;
        let primary_hdu = fits_open_hdu(&mut fptr, 0)?;
        fits_write_cards(&mut fptr, &primary_hdu, &self.primary)?;

        let new_columns = self
            .columns
            .iter()
            .map(|c| NewColumn {
                name: &c.def.name,
                tform: &c.def.tform,
            })
            .collect::<Vec<_>>();
        let table_hdu = fits_create_table(&mut fptr, &self.extname, &new_columns)?;
        let column_cards = self
            .columns
            .iter()
            .enumerate()
            .flat_map(|(i, c)| {
                c.def.keywords.iter().map(move |k| HeaderCard {
                    key: format!("{}{}", k.key, i + 1),
                    value: k.value.clone(),
                    comment: k.comment.clone(),
                })
            })
            .collect::<Vec<_>>();
        fits_write_cards(&mut fptr, &table_hdu, &column_cards)?;
        fits_write_cards(&mut fptr, &table_hdu, &self.table_cards)?;

        if self.num_rows() > 0 {
            for column in &self.columns {
                let name = &column.def.name;
                match &column.values {
                    ColumnValues::Str(v) => fits_write_col(&mut fptr, &table_hdu, name, v)?,
                    ColumnValues::Int(v) => fits_write_col(&mut fptr, &table_hdu, name, v)?,
                    ColumnValues::Float(v) => fits_write_col(&mut fptr, &table_hdu, name, v)?,
                }
            }
        }

        fits_write_checksums(&mut fptr)?;
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.def.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.def.name == name)
    }

    fn required_column(&self, name: &str) -> Result<&Column, CatalogueError> {
        self.column(name).ok_or_else(|| CatalogueError::MissingColumn {
            column: name.to_string(),
            catalogue: if self.extname.is_empty() {
                "the catalogue".to_string()
            } else {
                format!("'{}'", self.extname)
            },
        })
    }

    pub fn str_column(&self, name: &str) -> Result<&[String], CatalogueError> {
        match &self.required_column(name)?.values {
            ColumnValues::Str(v) => Ok(v),
            v => Err(CatalogueError::WrongType {
                column: name.to_string(),
                expected: ColumnKind::Str.name(),
                actual: v.kind().name(),
            }),
        }
    }

    pub fn float_column(&self, name: &str) -> Result<&[f64], CatalogueError> {
        match &self.required_column(name)?.values {
            ColumnValues::Float(v) => Ok(v),
            v => Err(CatalogueError::WrongType {
                column: name.to_string(),
                expected: ColumnKind::Float.name(),
                actual: v.kind().name(),
            }),
        }
    }

    /// Integer columns, or float columns converted to integers.
    pub fn int_column(&self, name: &str) -> Result<Vec<i64>, CatalogueError> {
        match &self.required_column(name)?.values {
            ColumnValues::Int(v) => Ok(v.clone()),
            ColumnValues::Float(v) => Ok(v.iter().map(|f| *f as i64).collect()),
            v => Err(CatalogueError::WrongType {
                column: name.to_string(),
                expected: ColumnKind::Int.name(),
                actual: v.kind().name(),
            }),
        }
    }

    /// A float column that may be absent; absent columns give `None`.
    pub fn optional_float_column(&self, name: &str) -> Result<Option<&[f64]>, CatalogueError> {
        match self.column(name) {
            None => Ok(None),
            Some(_) => self.float_column(name).map(Some),
        }
    }

    pub fn primary_value(&self, key: &str) -> Option<&HeaderValue> {
        find_card(&self.primary, key).map(|c| &c.value)
    }

    /// The data-model version of this catalogue, if it has one.
    pub fn datamver(&self) -> Option<String> {
        self.primary_value("DATAMVER").map(|v| v.to_string())
    }

    /// The catalogue's columns as a name -> values map.
    pub fn to_column_map(&self) -> IndexMap<String, ColumnValues> {
        self.columns
            .iter()
            .map(|c| (c.def.name.clone(), c.values.clone()))
            .collect()
    }

    /// A copy of this catalogue keeping only the given rows (in the given
    /// order).
    pub fn select_rows(&self, rows: &[usize]) -> Catalogue {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                def: c.def.clone(),
                values: match &c.values {
                    ColumnValues::Str(v) => {
                        ColumnValues::Str(rows.iter().map(|&i| v[i].clone()).collect())
                    }
                    ColumnValues::Int(v) => ColumnValues::Int(rows.iter().map(|&i| v[i]).collect()),
                    ColumnValues::Float(v) => {
                        ColumnValues::Float(rows.iter().map(|&i| v[i]).collect())
                    }
                },
            })
            .collect();
        Catalogue {
            primary: self.primary.clone(),
            extname: self.extname.clone(),
            table_cards: self.table_cards.clone(),
            columns,
        }
    }
}
