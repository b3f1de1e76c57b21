// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Arguments for the catalogue populators.

use std::path::{Path, PathBuf};

use clap::{Args, Parser};

use super::{printers::InfoPrinter, MosflowError};
use crate::{
    catalogue::DATA_FILE_TYPES_COMMA_SEPARATED,
    constants::DEFAULT_OUTPUT_DIR,
    workflow::{
        catalogue::{populate_field_catalogue, populate_target_catalogue, KeywordOverrides},
        create_output_dir, OutputState, WorkflowError,
    },
};

lazy_static::lazy_static! {
    static ref DATA_HELP: String = format!(
        "A file mapping each template column to its values. Supported formats: {}. Without one, example data is used.",
        *DATA_FILE_TYPES_COMMA_SEPARATED
    );
}

/// Arguments shared by `field-cat` and `target-cat`.
#[derive(Args, Debug, Clone)]
struct PopulateArgs {
    /// The output catalogue. A relative path is put in the output directory.
    #[clap(long = "out", parse(from_os_str))]
    output: Option<PathBuf>,

    #[clap(long, parse(from_os_str), help = DATA_HELP.as_str())]
    data: Option<PathBuf>,

    /// The directory for the output catalogue.
    #[clap(long, parse(from_os_str), default_value = DEFAULT_OUTPUT_DIR)]
    outdir: PathBuf,

    /// Value of the TRIMESTE keyword.
    #[clap(long)]
    trimester: Option<String>,

    /// Value of the AUTHOR keyword.
    #[clap(long)]
    author: Option<String>,

    /// Value of the VERBOSE keyword (0 or 1).
    #[clap(long = "report_verbosity")]
    report_verbosity: Option<i64>,

    /// Value of the CCREPORT keyword.
    #[clap(long = "cc_report")]
    cc_report: Option<String>,

    /// Overwrite the output file.
    #[clap(long)]
    overwrite: bool,
}

impl PopulateArgs {
    fn keywords(&self) -> KeywordOverrides {
        KeywordOverrides {
            trimester: self.trimester.clone(),
            author: self.author.clone(),
            report_verbosity: self.report_verbosity,
            cc_report: self.cc_report.clone(),
        }
    }

    fn run<F>(
        self,
        title: &'static str,
        template: &Path,
        default_output: &str,
        populate: F,
    ) -> Result<(), MosflowError>
    where
        F: FnOnce(
            &Path,
            &Path,
            Option<&Path>,
            KeywordOverrides,
            bool,
        ) -> Result<OutputState, WorkflowError>,
    {
        let output = self
            .outdir
            .join(self.output.as_deref().unwrap_or_else(|| Path::new(default_output)));

        let mut printer = InfoPrinter::new(title.into());
        printer.push_file("Template", template);
        match &self.data {
            Some(d) => printer.push_file("Data", d),
            None => printer.push_line("Data: example".into()),
        }
        printer.push_file("Output", &output);
        printer.display();

        create_output_dir(&self.outdir)?;
        if let Some(parent) = output.parent() {
            create_output_dir(parent)?;
        }
        let keywords = self.keywords();
        let state = populate(
            template,
            &output,
            self.data.as_deref(),
            keywords,
            self.overwrite,
        )?;
        super::printers::display_outputs(&[(output, state)]);
        Ok(())
    }
}

/// Populate the MOS field template with the fields to observe.
#[derive(Parser, Debug, Clone)]
pub(super) struct FieldCatArgs {
    /// The MOS field template.
    #[clap(long, parse(from_os_str), default_value = "aux/mos_field_template.fits")]
    template: PathBuf,

    #[clap(flatten)]
    populate: PopulateArgs,
}

impl FieldCatArgs {
    pub(super) fn run(self) -> Result<(), MosflowError> {
        self.populate.run(
            "MOS field catalogue",
            &self.template,
            "mos_field_cat.fits",
            populate_field_catalogue,
        )
    }
}

/// Populate the master catalogue template with targets.
#[derive(Parser, Debug, Clone)]
pub(super) struct TargetCatArgs {
    /// The master catalogue template.
    #[clap(long, parse(from_os_str), default_value = "aux/Master_CatalogueTemplate.fits")]
    template: PathBuf,

    #[clap(flatten)]
    populate: PopulateArgs,
}

impl TargetCatArgs {
    pub(super) fn run(self) -> Result<(), MosflowError> {
        self.populate.run(
            "MOS target catalogue",
            &self.template,
            "mos_target_cat.fits",
            populate_target_catalogue,
        )
    }
}
