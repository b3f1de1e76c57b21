// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;

use super::{create_parent_dir, printers::InfoPrinter, MosflowError};
use crate::workflow::field_template::create_field_template;

/// Create a template for MOS field catalogues from the master catalogue
/// template.
#[derive(Parser, Debug, Clone)]
pub(super) struct FieldTemplateArgs {
    /// The master catalogue template.
    #[clap(long = "in", parse(from_os_str), default_value = "aux/Master_CatalogueTemplate.fits")]
    input: PathBuf,

    /// The new MOS field template.
    #[clap(long = "out", parse(from_os_str), default_value = "aux/mos_field_template.fits")]
    output: PathBuf,

    /// Set DATETIME to the current time instead of the time in the master
    /// template.
    #[clap(long = "update_datetime")]
    update_datetime: bool,

    /// Overwrite the output file.
    #[clap(long)]
    overwrite: bool,
}

impl FieldTemplateArgs {
    pub(super) fn run(self) -> Result<(), MosflowError> {
        let mut printer = InfoPrinter::new("MOS field template".into());
        printer.push_file("Master template", &self.input);
        printer.push_file("Output", &self.output);
        if self.update_datetime {
            printer.push_line("Updating DATETIME".into());
        }
        printer.display();

        create_parent_dir(&self.output)?;
        let state = create_field_template(
            &self.input,
            &self.output,
            self.update_datetime,
            self.overwrite,
        )?;
        super::printers::display_outputs(&[(self.output, state)]);
        Ok(())
    }
}
