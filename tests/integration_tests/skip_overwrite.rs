// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Existing outputs are only replaced when asked for.

use tempfile::TempDir;

use crate::{make_field_catalogue, path_str, run_ok, test_files};

#[test]
fn test_existing_outputs_are_skipped() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let dir = tmp_dir.path();
    let (xml_template, progtemp, obstemp) = test_files();
    let field_cat = make_field_catalogue(dir);
    let xml_dir = dir.join("xml");
    let field_cat = path_str(&field_cat);
    let xml_dir_str = path_str(&xml_dir);
    let args = [
        "xml-files",
        field_cat.as_str(),
        "--xml_template",
        &xml_template,
        "--progtemp_file",
        &progtemp,
        "--obstemp_file",
        &obstemp,
        "--outdir",
        &xml_dir_str,
    ];

    run_ok(&args);
    let spam = xml_dir.join("Spam.xml");
    std::fs::write(&spam, "not an OB").unwrap();

    let stdout = run_ok(&args);
    assert!(stdout.contains("Skipping file"), "{stdout}");
    assert_eq!(std::fs::read_to_string(&spam).unwrap(), "not an OB");

    let mut args = args.to_vec();
    args.push("--overwrite");
    let stdout = run_ok(&args);
    assert!(stdout.contains("Removing previous file"), "{stdout}");
    assert_ne!(std::fs::read_to_string(&spam).unwrap(), "not an OB");
}
