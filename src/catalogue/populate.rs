// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Filling templates with rows.

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;

use super::{Catalogue, CatalogueError, Column, ColumnValues};
use crate::{
    constants::DATETIME_FORMAT,
    io::{set_card, HeaderCard},
};

/// The primary keywords set on every populated catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeywords {
    /// The trimester of the catalogue, e.g. "2020A1".
    pub trimester: String,
    /// The email address of the author.
    pub author: String,
    /// Becomes the "report_verbosity" attribute of the OB XMLs; 0 or 1.
    pub report_verbosity: i64,
    /// A comma-separated list of email addresses.
    pub cc_report: String,
}

impl PrimaryKeywords {
    fn to_cards(&self) -> Result<Vec<HeaderCard>, CatalogueError> {
        if !matches!(self.report_verbosity, 0 | 1) {
            return Err(CatalogueError::InvalidVerbosity(self.report_verbosity));
        }
        Ok(vec![
            HeaderCard::new("TRIMESTE", self.trimester.as_str(), ""),
            HeaderCard::new("VERBOSE", self.report_verbosity, ""),
            HeaderCard::new("AUTHOR", self.author.as_str(), ""),
            HeaderCard::new("CCREPORT", self.cc_report.as_str(), ""),
        ])
    }
}

/// Set DATETIME to the current UTC time.
pub fn refresh_datetime(primary: &mut Vec<HeaderCard>) {
    let now = chrono::Utc::now().format(DATETIME_FORMAT).to_string();
    set_card(primary, "DATETIME", now, "");
}

/// Populate `template` with `data` (column name -> values).
///
/// Every template column must be given, no other columns may be given, and
/// all columns must have the same length. The primary keywords are set (with
/// existing comments kept) and DATETIME is refreshed.
pub fn populate(
    template: &Catalogue,
    mut data: IndexMap<String, ColumnValues>,
    keywords: &PrimaryKeywords,
) -> Result<Catalogue, CatalogueError> {
    let mut primary = template.primary.clone();
    for card in keywords.to_cards()? {
        set_card(&mut primary, &card.key, card.value, &card.comment);
    }
    refresh_datetime(&mut primary);

    let missing = template
        .column_names()
        .filter(|name| !data.contains_key(*name))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(CatalogueError::MissingData {
            columns: missing.join(", "),
        });
    }
    let unknown = data
        .keys()
        .filter(|name| template.column(name).is_none())
        .collect::<Vec<_>>();
    if !unknown.is_empty() {
        return Err(CatalogueError::UnknownColumns {
            columns: unknown.into_iter().join(", "),
        });
    }

    let mut columns = Vec::with_capacity(template.columns.len());
    let mut expected: Option<(String, usize)> = None;
    for column in &template.columns {
        let name = &column.def.name;
        // Every template column was checked to be present above.
        let values = match data.swap_remove(name) {
            Some(v) => v.coerce(name, column.def.kind()?)?,
            None => continue,
        };
        match &expected {
            None => expected = Some((name.clone(), values.len())),
            Some((first_column, len)) if *len != values.len() => {
                return Err(CatalogueError::LengthMismatch {
                    column: name.clone(),
                    len: values.len(),
                    first_column: first_column.clone(),
                    expected: *len,
                })
            }
            Some(_) => (),
        }
        columns.push(Column {
            def: column.def.clone(),
            values,
        });
    }
    debug!(
        "Populated '{}' with {} rows",
        template.extname,
        expected.map(|(_, len)| len).unwrap_or(0)
    );

    Ok(Catalogue {
        primary,
        extname: template.extname.clone(),
        table_cards: template.table_cards.clone(),
        columns,
    })
}
