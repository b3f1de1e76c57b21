// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Building `<target>` elements from catalogue rows and reference stars.

use super::Element;
use crate::{
    catalogue::{Catalogue, ReferenceStar},
    constants::{CALIB_SURVEY, GUIDE_SURVEY},
};

/// Catalogue columns and the `<target>` attributes they are written to.
pub const TARGET_ATTRIBUTES: [(&str, &str); 15] = [
    ("TARGSRVY", "targsrvy"),
    ("TARGCAT", "targcat"),
    ("TARGPROG", "targprog"),
    ("TARGID", "targid"),
    ("TARGNAME", "targname"),
    ("TARGUSE", "targuse"),
    ("TARGCLASS", "targclass"),
    ("TARGPRIO", "targprio"),
    ("GAIA_RA", "targra"),
    ("GAIA_DEC", "targdec"),
    ("GAIA_EPOCH", "targepoch"),
    ("GAIA_PMRA", "targpmra"),
    ("GAIA_PMDEC", "targpmdec"),
    ("GAIA_PARAL", "targparal"),
    ("GAIA_ID", "gaia_id"),
];

/// The `<photometry>` attribute for a photometry column, e.g. `MAG_G` ->
/// `mag_g` and `MAG_G_ERR` -> `emag_g`.
pub(super) fn photometry_attribute(column: &str) -> Option<String> {
    let band = column.strip_prefix("MAG_")?;
    match band.strip_suffix("_ERR") {
        Some(band) if !band.is_empty() => Some(format!("emag_{}", band.to_lowercase())),
        Some(_) => None,
        None if !band.is_empty() => Some(format!("mag_{}", band.to_lowercase())),
        None => None,
    }
}

/// A `<target>` for one row of a target catalogue. Columns that the catalogue
/// doesn't have are not written.
pub fn table_row_target(catalogue: &Catalogue, row: usize) -> Element {
    let mut target = Element::new("target");
    for (column, attribute) in TARGET_ATTRIBUTES {
        if let Some(c) = catalogue.column(column) {
            target.set_attr(attribute, c.cell_string(row));
        }
    }

    let mut photometry = Element::new("photometry");
    for c in &catalogue.columns {
        if let Some(attribute) = photometry_attribute(&c.def.name) {
            photometry.set_attr(&attribute, c.cell_string(row));
        }
    }
    if !photometry.attributes.is_empty() {
        target.push_child(photometry);
    }
    target
}

fn optional(v: Option<f64>) -> String {
    v.map(|f| format!("{f:?}")).unwrap_or_default()
}

/// A `<target>` for a guide (`targuse = "G"`) or calibration
/// (`targuse = "C"`) star.
pub fn star_target(star: &ReferenceStar, guide: bool) -> Element {
    let (survey, targuse) = if guide {
        (GUIDE_SURVEY, "G")
    } else {
        (CALIB_SURVEY, "C")
    };
    let mut target = Element::new("target");
    target.set_attr("targsrvy", survey);
    target.set_attr("targid", star.gaia_id.to_string());
    target.set_attr("targuse", targuse);
    target.set_attr("targra", format!("{:?}", star.ra));
    target.set_attr("targdec", format!("{:?}", star.dec));
    target.set_attr("targepoch", format!("{:?}", star.epoch));
    target.set_attr("targpmra", optional(star.pmra));
    target.set_attr("targpmdec", optional(star.pmdec));
    target.set_attr("targparal", optional(star.parallax));
    target.set_attr("gaia_id", star.gaia_id.to_string());

    let mut photometry = Element::new("photometry");
    photometry.set_attr("mag_g", format!("{:?}", star.mag_g));
    photometry.set_attr("mag_bp", optional(star.mag_bp));
    photometry.set_attr("mag_rp", optional(star.mag_rp));
    target.push_child(photometry);
    target
}
