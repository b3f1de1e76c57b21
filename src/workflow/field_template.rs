// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Deriving the MOS field template from the master catalogue template.

use std::path::Path;

use log::info;

use super::{check_input, OutputState, StageOutput, WorkflowError};
use crate::{
    catalogue::{
        refresh_datetime, sub_template, Catalogue, CatalogueError, Column, ColumnDef,
        ColumnRename, ColumnValues,
    },
    constants::FIELD_TEMPLATE_EXTNAME,
    io::{find_card, HeaderCard},
};

/// The master template columns of the field template, and their new names.
const FIELD_COLUMNS: [ColumnRename<'static>; 6] = [
    ColumnRename {
        from: "TARGSRVY",
        to: "TARGSRVY",
    },
    ColumnRename {
        from: "TARGNAME",
        to: "FIELD_NAME",
    },
    ColumnRename {
        from: "PROGTEMP",
        to: "PROGTEMP",
    },
    ColumnRename {
        from: "OBSTEMP",
        to: "OBSTEMP",
    },
    ColumnRename {
        from: "GAIA_RA",
        to: "FIELD_RA",
    },
    ColumnRename {
        from: "GAIA_DEC",
        to: "FIELD_DEC",
    },
];

const INHERITED_KEYWORDS: [&str; 3] = ["DATAMVER", "TRIMESTE", "DATETIME"];

fn new_primary_cards() -> Vec<HeaderCard> {
    vec![
        HeaderCard::new("VERBOSE", 1_i64, "Attribute \"report_verbosity\" of the XML files"),
        HeaderCard::new("AUTHOR", "", ""),
        HeaderCard::new("CCREPORT", "", ""),
    ]
}

/// The column holding the number of fibres available to a survey in a field.
/// Surveys sharing a field may be given different numbers, so this isn't a
/// master template column.
fn max_fibres_column() -> Column {
    Column {
        def: ColumnDef {
            name: "MAX_FIBRES".to_string(),
            tform: "I".to_string(),
            keywords: vec![HeaderCard::new("TNULL", 0_i64, ""), HeaderCard::new("TDISP", "I3", "")],
        },
        values: ColumnValues::Int(vec![]),
    }
}

/// Derive the (empty) MOS field template from the master catalogue template.
/// DATETIME is refreshed if asked for and the master template has it.
pub fn derive_field_template(
    master: &Catalogue,
    update_datetime: bool,
) -> Result<Catalogue, CatalogueError> {
    let mut template = sub_template(
        master,
        &FIELD_COLUMNS,
        FIELD_TEMPLATE_EXTNAME,
        &INHERITED_KEYWORDS,
        new_primary_cards(),
    )?;
    template.columns.push(max_fibres_column());
    if update_datetime && find_card(&template.primary, "DATETIME").is_some() {
        refresh_datetime(&mut template.primary);
    }
    Ok(template)
}

/// Read the master template `input` and write the MOS field template to
/// `output`.
pub fn create_field_template(
    input: &Path,
    output: &Path,
    update_datetime: bool,
    overwrite: bool,
) -> Result<OutputState, WorkflowError> {
    check_input(input)?;
    StageOutput::new(output).run(input, overwrite, |out| {
        let master = Catalogue::read(input)?;
        let template = derive_field_template(&master, update_datetime)?;
        template.write(out)?;
        info!("Wrote MOS field template {}", out.display());
        Ok::<(), WorkflowError>(())
    })
}
