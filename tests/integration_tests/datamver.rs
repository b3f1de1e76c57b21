// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Inputs from different data model versions.

use tempfile::TempDir;

use crate::{get_cmd_output, make_field_catalogue, mosflow, path_str, run_ok, test_files};

#[test]
fn test_datamver_mismatch_exits_with_2() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let dir = tmp_dir.path();
    let (xml_template, progtemp, obstemp) = test_files();
    let field_cat = make_field_catalogue(dir);

    // An OBSTEMP file from another version.
    let old_obstemp = dir.join("obstemp.dat");
    let contents = std::fs::read_to_string(&obstemp)
        .unwrap()
        .replace("DATAMVER 8.00", "DATAMVER 7.00");
    std::fs::write(&old_obstemp, contents).unwrap();

    let xml_dir = dir.join("xml");
    let args = [
        "xml-files",
        &path_str(&field_cat),
        "--xml_template",
        &xml_template,
        "--progtemp_file",
        &progtemp,
        "--obstemp_file",
        &path_str(&old_obstemp),
        "--outdir",
        &path_str(&xml_dir),
    ];
    let cmd = mosflow().args(args).ok();
    assert!(cmd.is_err());
    let output = cmd.as_ref().err().unwrap().as_output().unwrap().clone();
    assert_eq!(output.status.code(), Some(2));
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("DATAMVER mismatch"), "{stderr}");
    assert!(stderr.contains("7.00"), "{stderr}");
    assert!(!xml_dir.join("Spam.xml").exists());

    // The override turns the mismatch into a warning.
    let mut args = args.to_vec();
    args.push("--pass_datamver");
    let stdout = run_ok(&args);
    assert!(stdout.contains("continuing anyway"), "{stdout}");
    assert!(xml_dir.join("Spam.xml").exists());
}
