// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Example data for the catalogue populators, used when no data file is
//! given. There are two fields, "Spam" at (100, 50) and "Eggs" at (200, 50),
//! each with 10 targets along a line of constant declination.

use indexmap::IndexMap;

use crate::{
    catalogue::{Catalogue, ColumnKind, ColumnValues, PrimaryKeywords},
    io::HeaderValue,
};

const NUM_FIELDS: usize = 2;
const TARGETS_PER_FIELD: usize = 10;
const FIELD_RAS: [f64; NUM_FIELDS] = [100.0, 200.0];
const FIELD_DEC: f64 = 50.0;
const PROGTEMPS: [&str; NUM_FIELDS] = ["13331", "11222.1+"];
const SURVEY: &str = "GA-LRHIGHLAT";
const OBSTEMP: &str = "DACEB";

pub(super) fn example_keywords() -> PrimaryKeywords {
    PrimaryKeywords {
        trimester: "2020A1".to_string(),
        author: "a@domain.com".to_string(),
        report_verbosity: 1,
        cc_report: "b@domain.com,c@domain.com".to_string(),
    }
}

fn strs<S: AsRef<str>>(v: impl IntoIterator<Item = S>) -> ColumnValues {
    ColumnValues::Str(v.into_iter().map(|s| s.as_ref().to_string()).collect())
}

pub(super) fn example_field_data() -> IndexMap<String, ColumnValues> {
    let mut data = IndexMap::new();
    data.insert("TARGSRVY".to_string(), strs([SURVEY; NUM_FIELDS]));
    data.insert("FIELD_NAME".to_string(), strs(["Spam", "Eggs"]));
    data.insert("PROGTEMP".to_string(), strs(PROGTEMPS));
    data.insert("OBSTEMP".to_string(), strs([OBSTEMP; NUM_FIELDS]));
    data.insert("FIELD_RA".to_string(), ColumnValues::Float(FIELD_RAS.to_vec()));
    data.insert(
        "FIELD_DEC".to_string(),
        ColumnValues::Float(vec![FIELD_DEC; NUM_FIELDS]),
    );
    data.insert(
        "MAX_FIBRES".to_string(),
        ColumnValues::Int(vec![1000; NUM_FIELDS]),
    );
    data
}

/// `n` evenly spaced values from `start` to `end` (inclusive).
fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(move |i| start + step * i as f64)
}

/// Example targets for `template`. Columns the example doesn't set (or that
/// `template` doesn't have) are filled with their TNULL, or an empty string,
/// zero or 0.0.
pub(super) fn example_target_data(template: &Catalogue) -> IndexMap<String, ColumnValues> {
    let n = NUM_FIELDS * TARGETS_PER_FIELD;
    let per_field = |values: [&str; NUM_FIELDS]| {
        strs(values.iter().flat_map(|v| std::iter::repeat(*v).take(TARGETS_PER_FIELD)))
    };

    let mut example = IndexMap::new();
    example.insert("TARGSRVY", strs(vec![SURVEY; n]));
    example.insert("TARGCAT", strs(vec!["GA-LRHIGHLAT_2020A1"; n]));
    example.insert("TARGPROG", per_field(["POI|EMP", "POI|BHB"]));
    example.insert("TARGID", strs((0..n).map(|i| i.to_string())));
    example.insert("TARGNAME", strs(vec![""; n]));
    example.insert(
        "TARGUSE",
        strs((0..n).map(|i| if i % TARGETS_PER_FIELD == TARGETS_PER_FIELD - 1 { "S" } else { "T" })),
    );
    example.insert("TARGCLASS", strs(vec!["STAR"; n]));
    example.insert(
        "TARGPRIO",
        ColumnValues::Float(
            (0..n)
                .map(|i| if i % TARGETS_PER_FIELD < 2 { 10.0 } else { 1.0 })
                .collect(),
        ),
    );
    example.insert("PROGTEMP", per_field(PROGTEMPS));
    example.insert("OBSTEMP", strs(vec![OBSTEMP; n]));
    example.insert(
        "GAIA_RA",
        ColumnValues::Float(
            FIELD_RAS
                .iter()
                .flat_map(|ra| linspace(-0.55, 0.45, TARGETS_PER_FIELD).map(move |d| ra + d))
                .collect(),
        ),
    );
    example.insert("GAIA_DEC", ColumnValues::Float(vec![FIELD_DEC; n]));
    example.insert("GAIA_EPOCH", ColumnValues::Float(vec![2015.5; n]));
    for zero in [
        "GAIA_PMRA",
        "GAIA_PMRA_ERR",
        "GAIA_PMDEC",
        "GAIA_PMDEC_ERR",
        "GAIA_PARAL",
        "GAIA_PARAL_ERR",
    ] {
        example.insert(zero, ColumnValues::Float(vec![0.0; n]));
    }
    example.insert(
        "MAG_G",
        ColumnValues::Float((0..n).map(|i| 10.0 + 0.5 * i as f64).collect()),
    );
    example.insert("MAG_G_ERR", ColumnValues::Float(vec![0.1; n]));
    example.insert(
        "MAG_R",
        ColumnValues::Float((0..n).map(|i| 11.0 + 0.5 * i as f64).collect()),
    );
    example.insert("MAG_R_ERR", ColumnValues::Float(vec![0.1; n]));

    let mut data = IndexMap::new();
    for column in &template.columns {
        let name = column.def.name.as_str();
        let values = match example.swap_remove(name) {
            Some(v) => v,
            None => match (column.def.kind(), column.def.keyword("TNULL")) {
                (Ok(ColumnKind::Int), Some(HeaderValue::Int(null))) => {
                    ColumnValues::Int(vec![*null; n])
                }
                (Ok(ColumnKind::Int), _) => ColumnValues::Int(vec![0; n]),
                (Ok(ColumnKind::Float), _) => ColumnValues::Float(vec![0.0; n]),
                // Unsupported formats are reported when populating.
                (Ok(ColumnKind::Str), _) | (Err(_), _) => strs(vec![""; n]),
            },
        };
        data.insert(name.to_string(), values);
    }
    data
}
