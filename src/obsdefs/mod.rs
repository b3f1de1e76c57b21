// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
PROGTEMP and OBSTEMP definition tables.

Both tables share a simple text format: `#` starts a comment, one line gives
the data-model version (`DATAMVER <version>`), and every other non-empty line
is `<field> <code> <value...>`, e.g.

```text
# PROGTEMP definitions
DATAMVER 8.00
mode 1 MOS LR
red_vph 1 VPH1
```
 */

mod error;
mod obstemp;
mod progtemp;

pub use error::DefinitionError;
pub use obstemp::{ObstempInfo, ObstempTable, OBSTEMP_FIELDS};
pub use progtemp::{ProgtempInfo, ProgtempTable};

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;

/// A parsed definition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionTable {
    pub file: PathBuf,
    pub datamver: String,
    /// (field, code) -> values.
    entries: IndexMap<(String, String), Vec<String>>,
}

impl DefinitionTable {
    pub fn read<P: AsRef<Path>>(file: P) -> Result<DefinitionTable, DefinitionError> {
        let file = file.as_ref();
        debug!("Reading definition table {}", file.display());
        let contents = std::fs::read_to_string(file).map_err(|err| DefinitionError::IO {
            file: file.to_path_buf(),
            err,
        })?;
        DefinitionTable::parse(file, &contents)
    }

    pub fn parse(file: &Path, contents: &str) -> Result<DefinitionTable, DefinitionError> {
        let mut datamver = None;
        let mut entries = IndexMap::new();
        for (i, line) in contents.lines().enumerate() {
            let line = match line.split_once('#') {
                Some((before, _)) => before,
                None => line,
            }
            .trim();
            if line.is_empty() {
                continue;
            }

            let mut words = line.split_whitespace();
            match (words.next(), words.next()) {
                (Some("DATAMVER"), Some(version)) => datamver = Some(version.to_string()),
                (Some(field), Some(code)) => {
                    let values = words.map(|w| w.to_string()).collect::<Vec<_>>();
                    if values.is_empty() {
                        return Err(DefinitionError::Malformed {
                            file: file.to_path_buf(),
                            line_num: i + 1,
                            line: line.to_string(),
                        });
                    }
                    entries.insert((field.to_string(), code.to_string()), values);
                }
                _ => {
                    return Err(DefinitionError::Malformed {
                        file: file.to_path_buf(),
                        line_num: i + 1,
                        line: line.to_string(),
                    })
                }
            }
        }

        Ok(DefinitionTable {
            file: file.to_path_buf(),
            datamver: datamver.ok_or_else(|| DefinitionError::MissingDatamver {
                file: file.to_path_buf(),
            })?,
            entries,
        })
    }

    /// Get the values defined for a code of a field.
    pub fn lookup(&self, field: &str, code: &str) -> Result<&[String], DefinitionError> {
        self.entries
            .get(&(field.to_string(), code.to_string()))
            .map(|v| v.as_slice())
            .ok_or_else(|| DefinitionError::UnknownCode {
                field: field.to_string(),
                code: code.to_string(),
                file: self.file.clone(),
            })
    }

    /// The same as `lookup`, but undefined codes give `None`.
    pub fn get(&self, field: &str, code: &str) -> Option<&[String]> {
        self.lookup(field, code).ok()
    }
}
