// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Target catalogues and their cross-matching against observing blocks.

use std::path::{Path, PathBuf};

use log::trace;

use super::{Catalogue, CatalogueError};
use crate::coord::RADec;

/// A target catalogue, with the coordinates of its targets computed once.
#[derive(Debug, Clone)]
pub struct TargetCatalogue {
    pub path: PathBuf,
    pub catalogue: Catalogue,
    surveys: Vec<String>,
    obstemps: Vec<String>,
    coords: Vec<RADec>,
}

impl TargetCatalogue {
    pub fn read<P: AsRef<Path>>(file: P) -> Result<TargetCatalogue, CatalogueError> {
        let catalogue = Catalogue::read(file.as_ref())?;
        TargetCatalogue::new(file.as_ref().to_path_buf(), catalogue)
    }

    pub fn new(path: PathBuf, catalogue: Catalogue) -> Result<TargetCatalogue, CatalogueError> {
        let surveys = catalogue.str_column("TARGSRVY")?.to_vec();
        let obstemps = catalogue.str_column("OBSTEMP")?.to_vec();
        let coords = catalogue
            .float_column("GAIA_RA")?
            .iter()
            .zip(catalogue.float_column("GAIA_DEC")?)
            .map(|(&ra, &dec)| RADec::from_degrees(ra, dec))
            .collect();
        Ok(TargetCatalogue {
            path,
            catalogue,
            surveys,
            obstemps,
            coords,
        })
    }

    /// Get the indices of the targets that belong to an observing block: the
    /// target's survey is one of `surveys`, its OBSTEMP is `obstemp`, and it
    /// is no further than `max_radius` degrees from `centre` (inclusive).
    ///
    /// PROGTEMP is not compared.
    pub fn select(
        &self,
        surveys: &[String],
        obstemp: &str,
        centre: RADec,
        max_radius: f64,
    ) -> Vec<usize> {
        let mut selected = vec![];
        for (i, coord) in self.coords.iter().enumerate() {
            if !surveys.contains(&self.surveys[i]) || self.obstemps[i] != obstemp {
                continue;
            }
            let separation = centre.separation(coord).to_degrees();
            trace!("Target {i}: {separation}° from {centre}");
            if separation <= max_radius {
                selected.push(i);
            }
        }
        selected
    }
}
