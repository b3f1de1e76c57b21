// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Adding the targets of a target catalogue to OB XMLs.

use std::path::{Path, PathBuf};

use log::info;

use super::{check_input, output_stem, OutputState, StageOutput, WorkflowError};
use crate::{
    catalogue::TargetCatalogue,
    obxml::{table_row_target, ObXml},
};

/// Add the targets that belong to an OB to a copy of it. Returns the number
/// of targets added.
pub fn add_targets_to_ob(
    ob: &mut ObXml,
    catalogue: &TargetCatalogue,
    max_radius: f64,
    clean: bool,
) -> Result<usize, WorkflowError> {
    let surveys = ob.surveys()?;
    let obstemp = ob.obstemp()?.to_string();
    let centre = ob.field_centre()?;
    let rows = catalogue.select(&surveys, &obstemp, centre, max_radius);
    info!(
        "Catalogue: {} Found {} targets for {}",
        catalogue.path.display(),
        rows.len(),
        ob.source
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    );

    let added = ob.add_targets(
        rows.iter()
            .map(|&i| table_row_target(&catalogue.catalogue, i)),
    )?;
    if clean {
        ob.remove_placeholder_targets()?;
    }
    Ok(added)
}

/// Add targets to each OB XML, writing the results to `outdir`. The inputs
/// are processed in sorted order. The paths of all outputs are returned,
/// including those that were skipped because they already exist.
pub fn add_targets(
    target_cat: &Path,
    xml_files: &[PathBuf],
    outdir: &Path,
    max_radius: f64,
    clean: bool,
    overwrite: bool,
) -> Result<Vec<(PathBuf, OutputState)>, WorkflowError> {
    if !(max_radius.is_finite() && max_radius >= 0.0) {
        return Err(WorkflowError::BadMaxRadius(max_radius));
    }
    check_input(target_cat)?;
    // Read once for all OBs.
    let catalogue = TargetCatalogue::read(target_cat)?;

    let mut xml_files = xml_files.to_vec();
    xml_files.sort();
    let mut outputs = Vec::with_capacity(xml_files.len());
    for xml_file in &xml_files {
        check_input(xml_file)?;
        let output = outdir.join(format!("{}.xml", output_stem(xml_file, "t")?));
        let state = StageOutput::new(&output).run(xml_file, overwrite, |out| {
            let mut ob = ObXml::read(xml_file)?;
            add_targets_to_ob(&mut ob, &catalogue, max_radius, clean)?;
            ob.write(out)?;
            Ok::<(), WorkflowError>(())
        })?;
        outputs.push((output, state));
    }
    Ok(outputs)
}
