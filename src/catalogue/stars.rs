// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reference-star catalogues, used to find guide and calibration stars.

use std::path::Path;

use log::debug;

use super::{Catalogue, CatalogueError};
use crate::{constants::DEFAULT_STAR_EPOCH, coord::RADec};

/// A Gaia star.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceStar {
    pub gaia_id: i64,
    /// [degrees]
    pub ra: f64,
    /// [degrees]
    pub dec: f64,
    pub mag_g: f64,
    pub mag_bp: Option<f64>,
    pub mag_rp: Option<f64>,
    /// [mas/yr]
    pub pmra: Option<f64>,
    /// [mas/yr]
    pub pmdec: Option<f64>,
    /// [mas]
    pub parallax: Option<f64>,
    pub epoch: f64,
}

impl ReferenceStar {
    pub fn radec(&self) -> RADec {
        RADec::from_degrees(self.ra, self.dec)
    }

    /// BP - RP, if both magnitudes are known.
    pub fn colour(&self) -> Option<f64> {
        match (self.mag_bp, self.mag_rp) {
            (Some(bp), Some(rp)) => Some(bp - rp),
            _ => None,
        }
    }
}

/// A reference-star catalogue. GAIA_ID, GAIA_RA, GAIA_DEC and MAG_G columns
/// are required; MAG_BP, MAG_RP, GAIA_PMRA, GAIA_PMDEC, GAIA_PARAL and
/// GAIA_EPOCH are used if present.
#[derive(Debug, Clone)]
pub struct StarCatalogue {
    pub catalogue: Catalogue,
    pub stars: Vec<ReferenceStar>,
}

fn finite(v: Option<&[f64]>, i: usize) -> Option<f64> {
    v.map(|v| v[i]).filter(|f| f.is_finite())
}

impl StarCatalogue {
    pub fn read<P: AsRef<Path>>(file: P) -> Result<StarCatalogue, CatalogueError> {
        let catalogue = Catalogue::read(file)?;
        StarCatalogue::new(catalogue)
    }

    pub fn new(catalogue: Catalogue) -> Result<StarCatalogue, CatalogueError> {
        let ids = catalogue.int_column("GAIA_ID")?;
        let ras = catalogue.float_column("GAIA_RA")?;
        let decs = catalogue.float_column("GAIA_DEC")?;
        let mag_g = catalogue.float_column("MAG_G")?;
        let mag_bp = catalogue.optional_float_column("MAG_BP")?;
        let mag_rp = catalogue.optional_float_column("MAG_RP")?;
        let pmra = catalogue.optional_float_column("GAIA_PMRA")?;
        let pmdec = catalogue.optional_float_column("GAIA_PMDEC")?;
        let parallax = catalogue.optional_float_column("GAIA_PARAL")?;
        let epoch = catalogue.optional_float_column("GAIA_EPOCH")?;

        let stars = (0..catalogue.num_rows())
            .map(|i| ReferenceStar {
                gaia_id: ids[i],
                ra: ras[i],
                dec: decs[i],
                mag_g: mag_g[i],
                mag_bp: finite(mag_bp, i),
                mag_rp: finite(mag_rp, i),
                pmra: finite(pmra, i),
                pmdec: finite(pmdec, i),
                parallax: finite(parallax, i),
                epoch: finite(epoch, i).unwrap_or(DEFAULT_STAR_EPOCH),
            })
            .collect::<Vec<_>>();
        debug!("Read {} reference stars", stars.len());

        Ok(StarCatalogue { catalogue, stars })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::tests::star_catalogue;

    #[test]
    fn test_optional_columns() {
        let stars = StarCatalogue::new(star_catalogue()).unwrap();
        assert_eq!(stars.stars.len(), star_catalogue().num_rows());
        let star = &stars.stars[0];
        assert_eq!(star.epoch, DEFAULT_STAR_EPOCH);
        assert!(star.pmra.is_none());
        // The last star has no BP photometry.
        let last = stars.stars.last().unwrap();
        assert!(last.mag_bp.is_none());
        assert!(last.colour().is_none());
    }

    #[test]
    fn test_required_columns() {
        let mut cat = star_catalogue();
        cat.columns.retain(|c| c.def.name != "MAG_G");
        assert!(matches!(
            StarCatalogue::new(cat),
            Err(CatalogueError::MissingColumn { .. })
        ));
    }
}
