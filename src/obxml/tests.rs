// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use tempfile::tempdir;

use super::{targets::photometry_attribute, *};
use crate::catalogue::{tests::target_catalogue, StarCatalogue};

pub(crate) const BLANK_TEMPLATE: &str = include_str!("../../test_files/BlankXMLTemplate.xml");

fn filled_ob() -> ObXml {
    let mut ob = ObXml::parse(BLANK_TEMPLATE).unwrap();
    ob.set_element_attrs(
        "observation",
        &[("progtemp", "11331".to_string()), ("obstemp", "DACEB".to_string())],
    )
    .unwrap();
    ob.set_surveys(&[("GA-LRHIGHLAT".to_string(), 100), ("WL-WIDE".to_string(), 50)])
        .unwrap();
    ob.set_field_centre(100.0, 50.0).unwrap();
    ob
}

#[test]
fn test_getters() {
    let ob = filled_ob();
    assert_eq!(ob.datamver(), Some("8.00"));
    assert_eq!(ob.progtemp().unwrap(), "11331");
    assert_eq!(ob.obstemp().unwrap(), "DACEB");
    assert_eq!(ob.surveys().unwrap(), ["GA-LRHIGHLAT", "WL-WIDE"]);
    assert_eq!(ob.max_guide(), Some(8));
    let centre = ob.field_centre().unwrap();
    assert_abs_diff_eq!(centre.ra.to_degrees(), 100.0, epsilon = 1e-10);
    assert_abs_diff_eq!(centre.dec.to_degrees(), 50.0, epsilon = 1e-10);
}

#[test]
fn test_unfilled_field_centre_is_an_error() {
    let ob = ObXml::parse(BLANK_TEMPLATE).unwrap();
    assert!(matches!(
        ob.field_centre(),
        Err(ObXmlError::NotANumber { attribute: "RA_d", .. })
    ));
}

#[test]
fn test_set_surveys_clones_template() {
    let ob = filled_ob();
    let mut surveys = vec![];
    ob.root.find_all("survey", &mut surveys);
    assert_eq!(surveys.len(), 2);
    // Attributes not touched keep their template values.
    assert_eq!(surveys[1].attr("priority"), Some("1.0"));
    assert_eq!(surveys[1].attr("max_fibres"), Some("50"));
}

#[test]
fn test_set_exposures() {
    let mut ob = filled_ob();
    ob.set_exposures(3, Some("1200")).unwrap();
    let mut exposures = vec![];
    ob.root.find_all("exposure", &mut exposures);
    let orders: Vec<_> = exposures.iter().filter_map(|e| e.attr("order")).collect();
    assert_eq!(orders, ["1", "2", "3"]);
    assert!(exposures.iter().all(|e| e.attr("exp_time") == Some("1200")));
    assert!(exposures.iter().all(|e| e.attr("arm") == Some("both")));
}

#[test]
fn test_add_and_clean_targets() {
    let mut ob = filled_ob();
    let cat = target_catalogue();
    let added = ob
        .add_targets([0, 2].iter().map(|&i| table_row_target(&cat, i)))
        .unwrap();
    assert_eq!(added, 2);
    assert_eq!(ob.targets().unwrap().len(), 3);

    assert_eq!(ob.remove_placeholder_targets().unwrap(), 1);
    let targets = ob.targets().unwrap();
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].attr("targsrvy"), Some("GA-LRHIGHLAT"));
    assert_eq!(targets[1].attr("targsrvy"), Some("WL-WIDE"));
}

#[test]
fn test_table_row_target() {
    let cat = target_catalogue();
    let target = table_row_target(&cat, 0);
    assert_eq!(target.attr("targsrvy"), Some("GA-LRHIGHLAT"));
    assert_eq!(target.attr("targra"), Some("100.0"));
    assert_eq!(target.attr("targdec"), Some("50.01"));
    // PROGTEMP isn't a target attribute.
    assert_eq!(target.attr("progtemp"), None);
    let photometry = target.find("photometry").unwrap();
    assert!(photometry.attr("mag_g").is_some());
    assert!(photometry.attr("emag_g").is_some());
    assert!(photometry.attr("mag_r").is_some());

    // Non-finite values are written as empty strings.
    let target = table_row_target(&cat, 1);
    assert_eq!(target.attr("targpmra"), Some(""));
    let target = table_row_target(&cat, 3);
    assert_eq!(
        target.find("photometry").unwrap().attr("emag_g"),
        Some("")
    );
}

#[test]
fn test_photometry_attribute() {
    assert_eq!(photometry_attribute("MAG_G").as_deref(), Some("mag_g"));
    assert_eq!(photometry_attribute("MAG_BP_ERR").as_deref(), Some("emag_bp"));
    assert_eq!(photometry_attribute("MAG_"), None);
    assert_eq!(photometry_attribute("MAG__ERR"), None);
    assert_eq!(photometry_attribute("GAIA_RA"), None);
}

#[test]
fn test_star_target() {
    let stars = StarCatalogue::new(crate::catalogue::tests::star_catalogue()).unwrap();
    let guide = star_target(&stars.stars[0], true);
    assert_eq!(guide.attr("targuse"), Some("G"));
    assert_eq!(guide.attr("targsrvy"), Some("GUIDE"));
    assert_eq!(guide.attr("targpmra"), Some(""));
    let calib = star_target(stars.stars.last().unwrap(), false);
    assert_eq!(calib.attr("targuse"), Some("C"));
    assert_eq!(calib.find("photometry").unwrap().attr("mag_bp"), Some(""));
}

#[test]
fn test_write_and_read() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("ob.xml");
    let ob = filled_ob();
    ob.write(&file).unwrap();
    let read = ObXml::read(&file).unwrap();
    assert_eq!(read.root, ob.root);
    assert_eq!(read.source.as_deref(), Some(file.as_path()));
    assert_eq!(std::fs::read(&file).unwrap(), read.to_bytes().unwrap());
}

#[test]
fn test_read_missing_file() {
    let result = ObXml::read("/does/not/exist.xml");
    assert!(matches!(result, Err(ObXmlError::Read { .. })));
}
