// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod datamver;
mod rerun;
mod skip_overwrite;
mod workflow;

use std::{
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};

use mos_workflow::{
    catalogue::{Catalogue, Column, ColumnDef, ColumnValues},
    HeaderCard,
};

fn mosflow() -> Command {
    Command::cargo_bin("mosflow").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn column(name: &str, tform: &str, keywords: Vec<HeaderCard>, values: ColumnValues) -> Column {
    Column {
        def: ColumnDef {
            name: name.to_string(),
            tform: tform.to_string(),
            keywords,
        },
        values,
    }
}

fn strs(v: &[&str]) -> ColumnValues {
    ColumnValues::Str(v.iter().map(|s| s.to_string()).collect())
}

/// Write a small master catalogue template (no rows).
fn write_master_template(dir: &Path) -> PathBuf {
    let empty_str = || strs(&[]);
    let empty_float = || ColumnValues::Float(vec![]);
    let deg = || vec![HeaderCard::new("TUNIT", "deg", "")];
    let cat = Catalogue {
        primary: vec![
            HeaderCard::new("DATAMVER", "8.00", "WEAVE Data Model Version"),
            HeaderCard::new("TRIMESTE", "", "Observing trimester"),
            HeaderCard::new("DATETIME", "2020-01-01 00:00:00.000000", "Last update"),
        ],
        extname: "CATALOGUE".to_string(),
        table_cards: vec![],
        columns: vec![
            column("TARGSRVY", "20A", vec![], empty_str()),
            column("TARGID", "30A", vec![], empty_str()),
            column("TARGNAME", "30A", vec![], empty_str()),
            column("PROGTEMP", "8A", vec![], empty_str()),
            column("OBSTEMP", "5A", vec![], empty_str()),
            column("GAIA_RA", "D", deg(), empty_float()),
            column("GAIA_DEC", "D", deg(), empty_float()),
            column(
                "MAG_G",
                "E",
                vec![HeaderCard::new("TUNIT", "mag", "")],
                empty_float(),
            ),
        ],
    };
    let file = dir.join("Master_CatalogueTemplate.fits");
    cat.write(&file).unwrap();
    file
}

/// Two targets near "Spam" at (100, 50): one 0.01° away and one 1.01° away.
const TARGET_DATA: &str = r#"
TARGSRVY = ["GA-LRHIGHLAT", "GA-LRHIGHLAT"]
TARGID = ["near", "far"]
TARGNAME = ["", ""]
PROGTEMP = ["13331", "13331"]
OBSTEMP = ["DACEB", "DACEB"]
GAIA_RA = [100.0, 100.0]
GAIA_DEC = [50.01, 51.01]
MAG_G = [18.0, 18.5]
"#;

/// Reference stars around (100, 50): two guide stars and one calibration
/// star.
fn write_star_catalogue(dir: &Path) -> PathBuf {
    let cat = Catalogue {
        primary: vec![],
        extname: "GAIA".to_string(),
        table_cards: vec![],
        columns: vec![
            column("GAIA_ID", "K", vec![], ColumnValues::Int(vec![1, 2, 3])),
            column(
                "GAIA_RA",
                "D",
                vec![],
                ColumnValues::Float(vec![100.0, 100.0, 100.3]),
            ),
            column(
                "GAIA_DEC",
                "D",
                vec![],
                ColumnValues::Float(vec![50.4, 49.6, 50.0]),
            ),
            column(
                "MAG_G",
                "E",
                vec![],
                ColumnValues::Float(vec![13.0, 14.0, 17.0]),
            ),
            column(
                "MAG_BP",
                "E",
                vec![],
                ColumnValues::Float(vec![13.5, 14.5, 17.3]),
            ),
            column(
                "MAG_RP",
                "E",
                vec![],
                ColumnValues::Float(vec![12.5, 13.5, 16.8]),
            ),
        ],
    };
    let file = dir.join("gaia.fits");
    cat.write(&file).unwrap();
    file
}

/// The definition files and blank XML template shipped with the tests.
fn test_files() -> (String, String, String) {
    let dir = PathBuf::from("test_files").canonicalize().unwrap();
    (
        dir.join("BlankXMLTemplate.xml").display().to_string(),
        dir.join("progtemp.dat").display().to_string(),
        dir.join("obstemp.dat").display().to_string(),
    )
}

/// Run mosflow, asserting success, and return its stdout.
fn run_ok(args: &[&str]) -> String {
    let cmd = mosflow().args(args).ok();
    assert!(
        cmd.is_ok(),
        "mosflow {} failed: {}",
        args.join(" "),
        cmd.err().unwrap()
    );
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    stdout
}

fn path_str(p: &Path) -> String {
    p.display().to_string()
}

/// Run field-template and field-cat (with the example fields "Spam" and
/// "Eggs") in `dir`, returning the field catalogue.
fn make_field_catalogue(dir: &Path) -> PathBuf {
    let master = write_master_template(dir);
    let template = dir.join("mos_field_template.fits");
    let field_cat = dir.join("mos_field_cat.fits");

    run_ok(&[
        "field-template",
        "--in",
        &path_str(&master),
        "--out",
        &path_str(&template),
    ]);
    run_ok(&[
        "field-cat",
        "--template",
        &path_str(&template),
        "--out",
        &path_str(&field_cat),
        "--outdir",
        &path_str(dir),
    ]);
    assert!(field_cat.exists());
    field_cat
}
