// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;

use super::{printers::InfoPrinter, MosflowError};
use crate::{
    constants::DEFAULT_OUTPUT_DIR,
    io::resolve_single_input,
    workflow::{
        create_output_dir,
        xml_files::{create_xml_files, XmlFilesParams},
    },
};

/// Create one OB XML for each MOS field in a field catalogue.
#[derive(Parser, Debug, Clone)]
pub(super) struct XmlFilesArgs {
    /// The MOS field catalogue.
    #[clap(name = "MOS_FIELD_CAT")]
    pub(super) field_cat: String,

    /// A blank OB XML to be filled for each field.
    #[clap(long = "xml_template", parse(from_os_str), default_value = "aux/BlankXMLTemplate.xml")]
    pub(super) xml_template: PathBuf,

    /// The definitions of the PROGTEMP codes.
    #[clap(long = "progtemp_file", parse(from_os_str), default_value = "aux/progtemp.dat")]
    pub(super) progtemp_file: PathBuf,

    /// The definitions of the OBSTEMP codes.
    #[clap(long = "obstemp_file", parse(from_os_str), default_value = "aux/obstemp.dat")]
    pub(super) obstemp_file: PathBuf,

    /// The directory for the output XMLs.
    #[clap(long, parse(from_os_str), default_value = DEFAULT_OUTPUT_DIR)]
    pub(super) outdir: PathBuf,

    /// Put "PREFIX_" at the start of each output file name.
    #[clap(long)]
    pub(super) prefix: Option<String>,

    /// Put this at the end of each output file name (before ".xml").
    #[clap(long, default_value = "")]
    pub(super) suffix: String,

    /// Continue (with a warning) even if the DATAMVER values of the inputs
    /// don't match.
    #[clap(long = "pass_datamver")]
    pub(super) pass_datamver: bool,

    /// Overwrite the output files.
    #[clap(long)]
    pub(super) overwrite: bool,
}

impl XmlFilesArgs {
    pub(super) fn run(self) -> Result<(), MosflowError> {
        let field_cat = resolve_single_input(&self.field_cat)?;

        let mut printer = InfoPrinter::new("OB XMLs from MOS fields".into());
        printer.push_file("Field catalogue", &field_cat);
        printer.push_block(vec![
            format!("XML template: {}", self.xml_template.display()).into(),
            format!("PROGTEMP definitions: {}", self.progtemp_file.display()).into(),
            format!("OBSTEMP definitions: {}", self.obstemp_file.display()).into(),
        ]);
        printer.push_file("Output directory", &self.outdir);
        printer.display();

        create_output_dir(&self.outdir)?;
        let outputs = create_xml_files(&XmlFilesParams {
            field_cat: &field_cat,
            xml_template: &self.xml_template,
            progtemp_file: &self.progtemp_file,
            obstemp_file: &self.obstemp_file,
            outdir: &self.outdir,
            prefix: self.prefix.as_deref(),
            suffix: &self.suffix,
            pass_datamver: self.pass_datamver,
            overwrite: self.overwrite,
        })?;
        super::printers::display_outputs(&outputs);
        Ok(())
    }
}
