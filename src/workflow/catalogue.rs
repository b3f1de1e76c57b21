// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Populating the MOS field template and target catalogue templates.

use std::path::Path;

use indexmap::IndexMap;
use log::info;

use super::{check_input, demo, OutputState, StageOutput, WorkflowError};
use crate::catalogue::{populate, read_data_file, Catalogue, ColumnValues, PrimaryKeywords};

/// Primary keywords given by the user. Anything not given comes from the
/// example keywords if the example data is used, otherwise it is empty (and
/// `report_verbosity` is 1).
#[derive(Debug, Clone, Default)]
pub struct KeywordOverrides {
    pub trimester: Option<String>,
    pub author: Option<String>,
    pub report_verbosity: Option<i64>,
    pub cc_report: Option<String>,
}

impl KeywordOverrides {
    pub fn resolve(self, use_example: bool) -> PrimaryKeywords {
        let defaults = if use_example {
            demo::example_keywords()
        } else {
            PrimaryKeywords {
                trimester: String::new(),
                author: String::new(),
                report_verbosity: 1,
                cc_report: String::new(),
            }
        };
        PrimaryKeywords {
            trimester: self.trimester.unwrap_or(defaults.trimester),
            author: self.author.unwrap_or(defaults.author),
            report_verbosity: self.report_verbosity.unwrap_or(defaults.report_verbosity),
            cc_report: self.cc_report.unwrap_or(defaults.cc_report),
        }
    }
}

fn populate_catalogue<F>(
    template_file: &Path,
    output: &Path,
    data_file: Option<&Path>,
    keywords: KeywordOverrides,
    overwrite: bool,
    example: F,
) -> Result<OutputState, WorkflowError>
where
    F: FnOnce(&Catalogue) -> IndexMap<String, ColumnValues>,
{
    check_input(template_file)?;
    if let Some(data_file) = data_file {
        check_input(data_file)?;
    }

    StageOutput::new(output).run(template_file, overwrite, |out| {
        let template = Catalogue::read(template_file)?;
        let data = match data_file {
            Some(f) => {
                info!("Reading catalogue data from {}", f.display());
                read_data_file(f)?
            }
            None => {
                info!("No data file given; using example data");
                example(&template)
            }
        };
        let keywords = keywords.resolve(data_file.is_none());
        let catalogue = populate(&template, data, &keywords)?;
        catalogue.write(out)?;
        info!(
            "Wrote {} rows to {}",
            catalogue.num_rows(),
            out.display()
        );
        Ok::<(), WorkflowError>(())
    })
}

/// Fill the MOS field template with field centres.
pub fn populate_field_catalogue(
    template_file: &Path,
    output: &Path,
    data_file: Option<&Path>,
    keywords: KeywordOverrides,
    overwrite: bool,
) -> Result<OutputState, WorkflowError> {
    populate_catalogue(template_file, output, data_file, keywords, overwrite, |_| {
        demo::example_field_data()
    })
}

/// Fill a catalogue template with targets.
pub fn populate_target_catalogue(
    template_file: &Path,
    output: &Path,
    data_file: Option<&Path>,
    keywords: KeywordOverrides,
    overwrite: bool,
) -> Result<OutputState, WorkflowError> {
    populate_catalogue(
        template_file,
        output,
        data_file,
        keywords,
        overwrite,
        demo::example_target_data,
    )
}
