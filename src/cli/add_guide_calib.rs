// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;

use super::{printers::InfoPrinter, MosflowError};
use crate::{
    constants::{DEFAULT_MAX_RADIUS, DEFAULT_OUTPUT_DIR},
    io::{resolve_inputs, resolve_single_input},
    workflow::{
        create_output_dir,
        guide_calib::{add_guide_and_calib_stars, GuideCalibParams},
    },
};

/// Add guide and calibration stars to OB XMLs.
#[derive(Parser, Debug, Clone)]
pub(super) struct AddGuideCalibArgs {
    /// OB XMLs (usually made by add-targets). Glob patterns are expanded.
    #[clap(name = "XML", required = true)]
    pub(super) xml_files: Vec<String>,

    /// A FITS table of reference stars (GAIA_ID, GAIA_RA, GAIA_DEC, MAG_G
    /// and optionally MAG_BP, MAG_RP and astrometry columns).
    #[clap(long = "star_cat", required = true)]
    pub(super) star_cat: String,

    /// The directory for the output XMLs, plots and tables.
    #[clap(long, parse(from_os_str), default_value = DEFAULT_OUTPUT_DIR)]
    pub(super) outdir: PathBuf,

    /// Only stars within this many degrees of the field centre are used.
    #[clap(long = "max_radius", default_value_t = DEFAULT_MAX_RADIUS)]
    pub(super) max_radius: f64,

    /// The maximum number of calibration stars per OB; -1 means no limit.
    #[clap(long = "num_calib_stars_request", default_value_t = -1, allow_hyphen_values = true)]
    pub(super) num_calib_stars_request: i64,

    /// Write FITS tables of the candidate guide and calibration stars.
    #[clap(long = "write_useful_tables")]
    pub(super) write_useful_tables: bool,

    /// Overwrite the output files.
    #[clap(long)]
    pub(super) overwrite: bool,
}

impl AddGuideCalibArgs {
    pub(super) fn run(self) -> Result<(), MosflowError> {
        let star_cat = resolve_single_input(&self.star_cat)?;
        let xml_files = resolve_inputs(&self.xml_files)?;

        let mut printer = InfoPrinter::new("Adding guide and calibration stars to OB XMLs".into());
        printer.push_file("Star catalogue", &star_cat);
        printer.push_block(
            xml_files
                .iter()
                .map(|f| format!("{}", f.display()).into())
                .collect(),
        );
        printer.push_line(format!("Maximum radius: {}°", self.max_radius).into());
        printer.push_line(
            match self.num_calib_stars_request {
                -1 => "Calibration stars: no limit".to_string(),
                n => format!("Calibration stars: at most {n}"),
            }
            .into(),
        );
        printer.display();

        create_output_dir(&self.outdir)?;
        let outputs = add_guide_and_calib_stars(
            &xml_files,
            &GuideCalibParams {
                star_cat: &star_cat,
                outdir: &self.outdir,
                max_radius: self.max_radius,
                num_calib_stars_request: self.num_calib_stars_request,
                write_useful_tables: self.write_useful_tables,
                overwrite: self.overwrite,
            },
        )?;
        super::printers::display_outputs(&outputs);
        Ok(())
    }
}
