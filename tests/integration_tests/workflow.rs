// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Run every stage of the workflow, one after the other.

use tempfile::TempDir;

use mos_workflow::{catalogue::Catalogue, obxml::ObXml};

use crate::{
    make_field_catalogue, path_str, run_ok, test_files, write_master_template,
    write_star_catalogue, TARGET_DATA,
};

fn attrs(ob: &ObXml, attribute: &str) -> Vec<String> {
    ob.targets()
        .unwrap()
        .iter()
        .map(|t| t.attr(attribute).unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_whole_workflow() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let dir = tmp_dir.path();
    let (xml_template, progtemp, obstemp) = test_files();

    // Stage 1.
    let field_cat = make_field_catalogue(dir);
    let fields = Catalogue::read(&field_cat).unwrap();
    assert_eq!(fields.num_rows(), 2);

    // Stage 2.
    let xml_dir = dir.join("xml");
    let stdout = run_ok(&[
        "xml-files",
        &path_str(&field_cat),
        "--xml_template",
        &xml_template,
        "--progtemp_file",
        &progtemp,
        "--obstemp_file",
        &obstemp,
        "--outdir",
        &path_str(&xml_dir),
    ]);
    assert!(stdout.contains("Processing 2 MOS fields"), "{stdout}");
    let spam = ObXml::read(xml_dir.join("Spam.xml")).unwrap();
    assert_eq!(spam.progtemp().unwrap(), "13331");
    assert_eq!(spam.surveys().unwrap(), ["GA-LRHIGHLAT"]);
    assert!(xml_dir.join("Eggs.xml").exists());

    // Stage 3.
    let master = write_master_template(dir);
    let data = dir.join("targets.toml");
    std::fs::write(&data, TARGET_DATA).unwrap();
    let target_cat = dir.join("targets.fits");
    run_ok(&[
        "target-cat",
        "--template",
        &path_str(&master),
        "--data",
        &path_str(&data),
        "--out",
        &path_str(&target_cat),
        "--outdir",
        &path_str(dir),
    ]);

    let t_dir = dir.join("t");
    let stdout = run_ok(&[
        "add-targets",
        &path_str(&target_cat),
        &format!("{}/*.xml", xml_dir.display()),
        "--outdir",
        &path_str(&t_dir),
        "--clean",
    ]);
    assert!(stdout.contains("Found 1 targets for"), "{stdout}");
    // Only the target 0.01° from the centre is within 1°.
    let spam = ObXml::read(t_dir.join("Spam-t.xml")).unwrap();
    assert_eq!(attrs(&spam, "targid"), ["near"]);
    let eggs = ObXml::read(t_dir.join("Eggs-t.xml")).unwrap();
    assert!(eggs.targets().unwrap().is_empty());

    // Stage 4.
    let gaia = write_star_catalogue(dir);
    let gc_dir = dir.join("gc");
    run_ok(&[
        "add-guide-calib",
        &path_str(&t_dir.join("Spam-t.xml")),
        "--star_cat",
        &path_str(&gaia),
        "--outdir",
        &path_str(&gc_dir),
        "--write_useful_tables",
    ]);
    let spam = ObXml::read(gc_dir.join("Spam-tgc.xml")).unwrap();
    assert_eq!(
        attrs(&spam, "targsrvy"),
        ["GA-LRHIGHLAT", "GUIDE", "GUIDE", "CALIB"]
    );
    assert_eq!(attrs(&spam, "targid"), ["near", "1", "2", "3"]);
    assert!(gc_dir.join("Spam-tgc-useful_guide_stars.fits").exists());
    assert!(gc_dir.join("Spam-tgc-useful_calib_stars.fits").exists());
    #[cfg(feature = "plotting")]
    {
        assert!(gc_dir.join("Spam-tgc-guide_stars.png").exists());
        assert!(gc_dir.join("Spam-tgc-calib_stars.png").exists());
    }
}

#[test]
fn test_missing_input_fails() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let missing = tmp_dir.path().join("nope.fits");
    let cmd = crate::mosflow()
        .args([
            "field-template",
            "--in",
            &path_str(&missing),
            "--out",
            &path_str(&tmp_dir.path().join("out.fits")),
        ])
        .ok();
    assert!(cmd.is_err());
    let output = cmd.err().unwrap().as_output().unwrap().clone();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(stderr.contains("nope.fits"), "{stderr}");
}
