// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Deriving templates from other templates.

use std::collections::HashSet;

use log::debug;

use super::{Catalogue, CatalogueError, Column, ColumnValues};
use crate::io::HeaderCard;

/// A column to be taken from a source template, possibly under a new name.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRename<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

impl<'a> ColumnRename<'a> {
    pub fn keep(name: &'a str) -> ColumnRename<'a> {
        ColumnRename {
            from: name,
            to: name,
        }
    }
}

/// Derive an empty template from `source`.
///
/// Only the `inherited` primary keywords are taken from `source` (those that
/// are present), followed by `new_primary`. The table gets the named columns
/// in the given order with their formats and attached keywords, and the
/// extension name `extname`.
pub fn sub_template(
    source: &Catalogue,
    columns: &[ColumnRename],
    extname: &str,
    inherited: &[&str],
    new_primary: Vec<HeaderCard>,
) -> Result<Catalogue, CatalogueError> {
    let mut seen = HashSet::new();
    for c in columns {
        if !seen.insert(c.to) {
            return Err(CatalogueError::DuplicateColumn(c.to.to_string()));
        }
    }

    let mut primary: Vec<HeaderCard> = inherited
        .iter()
        .filter_map(|key| source.primary.iter().find(|c| c.key == *key).cloned())
        .collect();
    primary.extend(new_primary);

    let mut new_columns = Vec::with_capacity(columns.len());
    for rename in columns {
        let column = source.required_column(rename.from)?;
        let mut def = column.def.clone();
        def.name = rename.to.to_string();
        debug!("Template column {} -> {} ({})", rename.from, rename.to, def.tform);
        new_columns.push(Column {
            values: ColumnValues::empty(def.kind()?),
            def,
        });
    }

    Ok(Catalogue {
        primary,
        extname: extname.to_string(),
        table_cards: vec![],
        columns: new_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalogue::{tests::master_template, ColumnDef},
        io::HeaderValue,
    };

    #[test]
    fn test_sub_template_keeps_formats_and_keywords() {
        let master = master_template();
        let template = sub_template(
            &master,
            &[
                ColumnRename::keep("TARGSRVY"),
                ColumnRename {
                    from: "GAIA_RA",
                    to: "FIELD_RA",
                },
            ],
            "SUB",
            &["DATAMVER", "NOT_THERE"],
            vec![HeaderCard::new("AUTHOR", "", "")],
        )
        .unwrap();

        assert_eq!(template.extname, "SUB");
        assert_eq!(template.num_rows(), 0);
        let keys: Vec<_> = template.primary.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["DATAMVER", "AUTHOR"]);

        let ra = template.column("FIELD_RA").unwrap();
        let master_ra: &ColumnDef = &master.column("GAIA_RA").unwrap().def;
        assert_eq!(ra.def.tform, master_ra.tform);
        assert_eq!(ra.def.keywords, master_ra.keywords);
        assert_eq!(
            ra.def.keyword("TUNIT"),
            Some(&HeaderValue::Str("deg".to_string()))
        );
        assert!(template.column("GAIA_RA").is_none());
    }

    #[test]
    fn test_sub_template_missing_column() {
        let master = master_template();
        let result = sub_template(&master, &[ColumnRename::keep("SPAM")], "SUB", &[], vec![]);
        assert!(matches!(result, Err(CatalogueError::MissingColumn { .. })));
    }

    #[test]
    fn test_sub_template_duplicate_column() {
        let master = master_template();
        let result = sub_template(
            &master,
            &[
                ColumnRename::keep("TARGSRVY"),
                ColumnRename {
                    from: "TARGNAME",
                    to: "TARGSRVY",
                },
            ],
            "SUB",
            &[],
            vec![],
        );
        assert!(matches!(result, Err(CatalogueError::DuplicateColumn(_))));
    }
}
