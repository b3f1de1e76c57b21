// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Running stages again over their own outputs.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use mos_workflow::{catalogue::Catalogue, obxml::ObXml};

use crate::{
    path_str, run_ok, test_files, write_master_template, write_star_catalogue, TARGET_DATA,
};

/// A catalogue as read back, without the DATETIME keyword (refreshed on every
/// write).
fn without_datetime(file: &Path) -> Catalogue {
    let mut cat = Catalogue::read(file).unwrap();
    cat.primary.retain(|card| card.key != "DATETIME");
    cat
}

/// The contents of all XMLs in `dir`, sorted by name.
fn xml_contents(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "xml"))
        .collect();
    files.sort();
    files
        .into_iter()
        .map(|file| {
            let contents = std::fs::read(&file).unwrap();
            (file, contents)
        })
        .collect()
}

fn run_with_overwrite(args: &[&str]) -> String {
    let mut args = args.to_vec();
    args.push("--overwrite");
    run_ok(&args)
}

/// An OB at (100, 50), the centre of the stars of `write_star_catalogue`.
fn write_ob(file: &Path) {
    let (xml_template, _, _) = test_files();
    let mut ob = ObXml::read(xml_template).unwrap();
    ob.set_field_centre(100.0, 50.0).unwrap();
    ob.write(file).unwrap();
}

#[test]
fn test_overwrite_reproduces_every_stage() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let dir = tmp_dir.path();
    let (xml_template, progtemp, obstemp) = test_files();
    let master = write_master_template(dir);

    // field-template
    let template = dir.join("mos_field_template.fits");
    let args = [
        "field-template",
        "--in",
        &path_str(&master),
        "--out",
        &path_str(&template),
    ];
    run_ok(&args);
    let first = without_datetime(&template);
    run_with_overwrite(&args);
    assert_eq!(without_datetime(&template), first);

    // field-cat
    let field_cat = dir.join("mos_field_cat.fits");
    let args = [
        "field-cat",
        "--template",
        &path_str(&template),
        "--out",
        &path_str(&field_cat),
        "--outdir",
        &path_str(dir),
    ];
    run_ok(&args);
    let first = without_datetime(&field_cat);
    run_with_overwrite(&args);
    assert_eq!(without_datetime(&field_cat), first);

    // xml-files
    let xml_dir = dir.join("xml");
    let args = [
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
    ];
    run_ok(&args);
    let first = xml_contents(&xml_dir);
    assert_eq!(first.len(), 2);
    let stdout = run_with_overwrite(&args);
    assert!(stdout.contains("Removing previous file"), "{stdout}");
    assert_eq!(xml_contents(&xml_dir), first);

    // target-cat
    let data = dir.join("targets.toml");
    std::fs::write(&data, TARGET_DATA).unwrap();
    let target_cat = dir.join("targets.fits");
    let args = [
        "target-cat",
        "--template",
        &path_str(&master),
        "--data",
        &path_str(&data),
        "--out",
        &path_str(&target_cat),
        "--outdir",
        &path_str(dir),
    ];
    run_ok(&args);
    let first = without_datetime(&target_cat);
    run_with_overwrite(&args);
    assert_eq!(without_datetime(&target_cat), first);

    // add-targets
    let t_dir = dir.join("t");
    let xml_glob = format!("{}/*.xml", xml_dir.display());
    let args = [
        "add-targets",
        &path_str(&target_cat),
        &xml_glob,
        "--outdir",
        &path_str(&t_dir),
        "--clean",
    ];
    run_ok(&args);
    let first = xml_contents(&t_dir);
    assert_eq!(first.len(), 2);
    run_with_overwrite(&args);
    assert_eq!(xml_contents(&t_dir), first);

    // add-guide-calib, with its tables
    let gaia = write_star_catalogue(dir);
    let gc_dir = dir.join("gc");
    let args = [
        "add-guide-calib",
        &path_str(&t_dir.join("Spam-t.xml")),
        "--star_cat",
        &path_str(&gaia),
        "--outdir",
        &path_str(&gc_dir),
        "--write_useful_tables",
    ];
    let guide_table = gc_dir.join("Spam-tgc-useful_guide_stars.fits");
    let calib_table = gc_dir.join("Spam-tgc-useful_calib_stars.fits");
    run_ok(&args);
    let first = xml_contents(&gc_dir);
    let first_guide = Catalogue::read(&guide_table).unwrap();
    let first_calib = Catalogue::read(&calib_table).unwrap();
    run_with_overwrite(&args);
    assert_eq!(xml_contents(&gc_dir), first);
    assert_eq!(Catalogue::read(&guide_table).unwrap(), first_guide);
    assert_eq!(Catalogue::read(&calib_table).unwrap(), first_calib);
}

#[test]
fn test_stale_companions_do_not_block_reruns() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let dir = tmp_dir.path();
    let ob = dir.join("Spam-t.xml");
    write_ob(&ob);
    let gaia = write_star_catalogue(dir);
    let gc_dir = dir.join("gc");
    let args = [
        "add-guide-calib",
        &path_str(&ob),
        "--star_cat",
        &path_str(&gaia),
        "--outdir",
        &path_str(&gc_dir),
        "--write_useful_tables",
    ];
    let output = gc_dir.join("Spam-tgc.xml");
    run_ok(&args);
    let first = std::fs::read(&output).unwrap();

    // The tables are left behind, but the XML is gone (e.g. an interrupted
    // run). Both plain and overwriting reruns must write the XML again.
    std::fs::remove_file(&output).unwrap();
    run_ok(&args);
    assert_eq!(std::fs::read(&output).unwrap(), first);

    std::fs::remove_file(&output).unwrap();
    run_with_overwrite(&args);
    assert_eq!(std::fs::read(&output).unwrap(), first);
    assert!(gc_dir.join("Spam-tgc-useful_guide_stars.fits").exists());
    assert!(gc_dir.join("Spam-tgc-useful_calib_stars.fits").exists());
}

#[test]
fn test_fields_sharing_a_name_get_their_own_obs() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let dir = tmp_dir.path();
    let (xml_template, progtemp, obstemp) = test_files();
    let master = write_master_template(dir);
    let template = dir.join("mos_field_template.fits");
    run_ok(&[
        "field-template",
        "--in",
        &path_str(&master),
        "--out",
        &path_str(&template),
    ]);

    let data = dir.join("fields.toml");
    std::fs::write(
        &data,
        r#"
TARGSRVY = ["GA-LRHIGHLAT", "GA-LRHIGHLAT"]
FIELD_NAME = ["Spam", "Spam"]
PROGTEMP = ["13331", "13331"]
OBSTEMP = ["DACEB", "DACEB"]
FIELD_RA = [100.0, 150.0]
FIELD_DEC = [50.0, 50.0]
MAX_FIBRES = [500, 500]
"#,
    )
    .unwrap();
    let field_cat = dir.join("fields.fits");
    run_ok(&[
        "field-cat",
        "--template",
        &path_str(&template),
        "--data",
        &path_str(&data),
        "--out",
        &path_str(&field_cat),
        "--outdir",
        &path_str(dir),
    ]);

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
    assert!(!stdout.contains("Skipping file"), "{stdout}");

    let files = xml_contents(&xml_dir);
    assert_eq!(files.len(), 2);
    for (name, ra) in [("Spam_1.xml", "100.0"), ("Spam_2.xml", "150.0")] {
        let ob = ObXml::read(xml_dir.join(name)).unwrap();
        assert_eq!(ob.first_field().unwrap().attr("RA_d"), Some(ra), "{name}");
    }
}
