// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;

use super::{printers::InfoPrinter, MosflowError};
use crate::{
    constants::{DEFAULT_MAX_RADIUS, DEFAULT_OUTPUT_DIR},
    io::{resolve_inputs, resolve_single_input},
    workflow::{add_targets::add_targets, create_output_dir},
};

/// Add the targets of a target catalogue to OB XMLs.
#[derive(Parser, Debug, Clone)]
pub(super) struct AddTargetsArgs {
    /// The target catalogue.
    #[clap(name = "TARGET_CAT")]
    target_cat: String,

    /// OB XMLs made by xml-files. Glob patterns are expanded.
    #[clap(name = "XML", required = true)]
    xml_files: Vec<String>,

    /// The directory for the output XMLs.
    #[clap(long, parse(from_os_str), default_value = DEFAULT_OUTPUT_DIR)]
    outdir: PathBuf,

    /// Only targets within this many degrees of the field centre are added.
    #[clap(long = "max_radius", default_value_t = DEFAULT_MAX_RADIUS)]
    max_radius: f64,

    /// Remove the placeholder targets of the XML template.
    #[clap(long)]
    clean: bool,

    /// Overwrite the output files.
    #[clap(long)]
    overwrite: bool,
}

impl AddTargetsArgs {
    pub(super) fn run(self) -> Result<(), MosflowError> {
        let target_cat = resolve_single_input(&self.target_cat)?;
        let xml_files = resolve_inputs(&self.xml_files)?;

        let mut printer = InfoPrinter::new("Adding targets to OB XMLs".into());
        printer.push_file("Target catalogue", &target_cat);
        printer.push_block(
            xml_files
                .iter()
                .map(|f| format!("{}", f.display()).into())
                .collect(),
        );
        printer.push_line(format!("Maximum radius: {}°", self.max_radius).into());
        if self.clean {
            printer.push_line("Removing placeholder targets".into());
        }
        printer.display();

        create_output_dir(&self.outdir)?;
        let outputs = add_targets(
            &target_cat,
            &xml_files,
            &self.outdir,
            self.max_radius,
            self.clean,
            self.overwrite,
        )?;
        super::printers::display_outputs(&outputs);
        Ok(())
    }
}
