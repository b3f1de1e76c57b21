// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Adding guide and calibration stars to OB XMLs.
//!
//! Guide stars are picked so that they surround the field: the field is cut
//! into equal position-angle sectors (one per guide star the OB may have) and
//! the brightest candidate of each sector is used. Calibration stars are the
//! brightest candidates with a suitable colour.

use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{check_input, output_stem, OutputState, StageOutput, WorkflowError};
use crate::{
    catalogue::{ReferenceStar, StarCatalogue},
    constants::{
        CALIB_COLOUR_MAX, CALIB_COLOUR_MIN, CALIB_MAG_MAX, CALIB_MAG_MIN, DEFAULT_MAX_GUIDE,
        GUIDE_MAG_MAX, GUIDE_MAG_MIN,
    },
    coord::RADec,
    obxml::{star_target, ObXml},
};

/// The inputs and options of [`add_guide_and_calib_stars`].
#[derive(Debug, Clone)]
pub struct GuideCalibParams<'a> {
    pub star_cat: &'a Path,
    pub outdir: &'a Path,
    /// [degrees]
    pub max_radius: f64,
    /// -1 means no limit.
    pub num_calib_stars_request: i64,
    pub write_useful_tables: bool,
    pub overwrite: bool,
}

/// The files written for one OB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideCalibFiles {
    pub xml: PathBuf,
    pub guide_plot: PathBuf,
    pub calib_plot: PathBuf,
    pub useful_guide_table: Option<PathBuf>,
    pub useful_calib_table: Option<PathBuf>,
}

impl GuideCalibFiles {
    pub fn new(input: &Path, outdir: &Path, write_useful_tables: bool) -> Result<Self, WorkflowError> {
        let stem = output_stem(input, "gc")?;
        let file = |suffix: &str| outdir.join(format!("{stem}{suffix}"));
        Ok(GuideCalibFiles {
            xml: file(".xml"),
            guide_plot: file("-guide_stars.png"),
            calib_plot: file("-calib_stars.png"),
            useful_guide_table: write_useful_tables.then(|| file("-useful_guide_stars.fits")),
            useful_calib_table: write_useful_tables.then(|| file("-useful_calib_stars.fits")),
        })
    }

    fn companions(&self) -> Vec<PathBuf> {
        [
            Some(&self.guide_plot),
            Some(&self.calib_plot),
            self.useful_guide_table.as_ref(),
            self.useful_calib_table.as_ref(),
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}

/// Indices of the stars chosen for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarSelection {
    pub guide_candidates: Vec<usize>,
    pub guide: Vec<usize>,
    pub calib_candidates: Vec<usize>,
    pub calib: Vec<usize>,
}

fn within(star: &ReferenceStar, centre: RADec, max_radius: f64) -> bool {
    centre.separation(&star.radec()).to_degrees() <= max_radius
}

/// Stars within `max_radius` degrees of `centre` that are bright enough, but
/// not too bright, to guide on.
pub fn guide_candidates(stars: &[ReferenceStar], centre: RADec, max_radius: f64) -> Vec<usize> {
    stars
        .iter()
        .enumerate()
        .filter(|(_, s)| (GUIDE_MAG_MIN..=GUIDE_MAG_MAX).contains(&s.mag_g))
        .filter(|(_, s)| within(s, centre, max_radius))
        .map(|(i, _)| i)
        .collect()
}

/// Keep the brightest candidate in each of `num_sectors` position-angle
/// sectors around `centre`. The result is ordered brightest first.
pub fn select_guide_stars(
    stars: &[ReferenceStar],
    candidates: &[usize],
    centre: RADec,
    num_sectors: usize,
) -> Vec<usize> {
    if num_sectors == 0 {
        return vec![];
    }
    let sector_width = 360.0 / num_sectors as f64;
    let mut brightest: Vec<Option<usize>> = vec![None; num_sectors];
    for &i in candidates {
        let pa = centre
            .position_angle(&stars[i].radec())
            .to_degrees()
            .rem_euclid(360.0);
        let sector = ((pa / sector_width) as usize).min(num_sectors - 1);
        match brightest[sector] {
            Some(b) if stars[b].mag_g <= stars[i].mag_g => (),
            _ => brightest[sector] = Some(i),
        }
    }
    let mut selected: Vec<usize> = brightest.into_iter().flatten().collect();
    selected.sort_by(|&a, &b| stars[a].mag_g.total_cmp(&stars[b].mag_g));
    selected
}

/// Stars within `max_radius` degrees of `centre` with a G magnitude in the
/// calibration range and, if their colour is known, a BP-RP colour in the
/// calibration range.
pub fn calib_candidates(stars: &[ReferenceStar], centre: RADec, max_radius: f64) -> Vec<usize> {
    stars
        .iter()
        .enumerate()
        .filter(|(_, s)| (CALIB_MAG_MIN..=CALIB_MAG_MAX).contains(&s.mag_g))
        .filter(|(_, s)| match s.colour() {
            Some(c) => (CALIB_COLOUR_MIN..=CALIB_COLOUR_MAX).contains(&c),
            None => true,
        })
        .filter(|(_, s)| within(s, centre, max_radius))
        .map(|(i, _)| i)
        .collect()
}

/// The brightest `limit` candidates (all of them without a limit), brightest
/// first.
pub fn select_calib_stars(
    stars: &[ReferenceStar],
    candidates: &[usize],
    limit: Option<usize>,
) -> Vec<usize> {
    let mut selected = candidates.to_vec();
    selected.sort_by(|&a, &b| stars[a].mag_g.total_cmp(&stars[b].mag_g));
    if let Some(limit) = limit {
        selected.truncate(limit);
    }
    selected
}

pub fn select_stars(
    stars: &[ReferenceStar],
    centre: RADec,
    max_radius: f64,
    max_guide: usize,
    calib_limit: Option<usize>,
) -> StarSelection {
    let guide_candidates = guide_candidates(stars, centre, max_radius);
    let guide = select_guide_stars(stars, &guide_candidates, centre, max_guide);
    let calib_candidates = calib_candidates(stars, centre, max_radius);
    let calib = select_calib_stars(stars, &calib_candidates, calib_limit);
    debug!(
        "{} guide candidates, {} guide stars, {} calib candidates, {} calib stars",
        guide_candidates.len(),
        guide.len(),
        calib_candidates.len(),
        calib.len()
    );
    StarSelection {
        guide_candidates,
        guide,
        calib_candidates,
        calib,
    }
}

fn calib_limit(request: i64) -> Result<Option<usize>, WorkflowError> {
    match request {
        -1 => Ok(None),
        n if n >= 0 => Ok(Some(n as usize)),
        n => Err(WorkflowError::BadCalibRequest(n)),
    }
}

/// Write the tables of candidate stars, if they were asked for.
fn write_useful_tables(
    files: &GuideCalibFiles,
    stars: &StarCatalogue,
    selection: &StarSelection,
) -> Result<(), WorkflowError> {
    if let Some(table) = &files.useful_guide_table {
        stars
            .catalogue
            .select_rows(&selection.guide_candidates)
            .write(table)?;
    }
    if let Some(table) = &files.useful_calib_table {
        stars
            .catalogue
            .select_rows(&selection.calib_candidates)
            .write(table)?;
    }
    Ok(())
}

#[cfg(feature = "plotting")]
fn plot_selection(
    files: &GuideCalibFiles,
    stars: &StarCatalogue,
    selection: &StarSelection,
    centre: RADec,
    max_radius: f64,
) -> Result<(), WorkflowError> {
    let pick = |rows: &[usize]| rows.iter().map(|&i| &stars.stars[i]).collect::<Vec<_>>();
    super::plotting::plot_stars(
        &files.guide_plot,
        "Guide stars",
        centre,
        max_radius,
        &pick(&selection.guide_candidates),
        &pick(&selection.guide),
    )?;
    super::plotting::plot_stars(
        &files.calib_plot,
        "Calibration stars",
        centre,
        max_radius,
        &pick(&selection.calib_candidates),
        &pick(&selection.calib),
    )?;
    Ok(())
}

/// Add guide and calibration stars to each OB XML, writing the results (and
/// plots and tables of the candidate stars) to `outdir`. The inputs are
/// processed in sorted order.
pub fn add_guide_and_calib_stars(
    xml_files: &[PathBuf],
    params: &GuideCalibParams,
) -> Result<Vec<(PathBuf, OutputState)>, WorkflowError> {
    if !(params.max_radius.is_finite() && params.max_radius >= 0.0) {
        return Err(WorkflowError::BadMaxRadius(params.max_radius));
    }
    let limit = calib_limit(params.num_calib_stars_request)?;
    check_input(params.star_cat)?;
    let stars = StarCatalogue::read(params.star_cat)?;

    let mut xml_files = xml_files.to_vec();
    xml_files.sort();
    let mut outputs = Vec::with_capacity(xml_files.len());
    for xml_file in &xml_files {
        check_input(xml_file)?;
        let files = GuideCalibFiles::new(xml_file, params.outdir, params.write_useful_tables)?;
        let output = StageOutput::new(&files.xml).with_companions(files.companions());
        let state = output.run(xml_file, params.overwrite, |out| {
            let mut ob = ObXml::read(xml_file)?;
            let centre = ob.field_centre()?;
            let max_guide = ob.max_guide().unwrap_or(DEFAULT_MAX_GUIDE);
            let selection = select_stars(&stars.stars, centre, params.max_radius, max_guide, limit);
            info!(
                "{}: {} guide stars and {} calibration stars",
                xml_file.display(),
                selection.guide.len(),
                selection.calib.len()
            );

            let targets = selection
                .guide
                .iter()
                .map(|&i| star_target(&stars.stars[i], true))
                .chain(
                    selection
                        .calib
                        .iter()
                        .map(|&i| star_target(&stars.stars[i], false)),
                );
            ob.add_targets(targets)?;
            write_useful_tables(&files, &stars, &selection)?;
            #[cfg(feature = "plotting")]
            plot_selection(&files, &stars, &selection, centre, params.max_radius)?;
            #[cfg(not(feature = "plotting"))]
            debug!("Not compiled with the \"plotting\" feature; no star plots are made");
            ob.write(out)?;
            Ok::<(), WorkflowError>(())
        })?;
        outputs.push((files.xml, state));
    }
    Ok(outputs)
}
