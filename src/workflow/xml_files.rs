// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Creating one OB XML per MOS field of a field catalogue.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, error, info, warn};
use vec1::Vec1;

use super::{check_input, OutputState, StageOutput, WorkflowError};
use crate::{
    catalogue::{Catalogue, FieldRecord},
    constants::MOS_OBSMODE,
    obsdefs::{ObstempInfo, ObstempTable, ProgtempInfo, ProgtempTable},
    obxml::{ObXml, ObXmlError},
};

/// The inputs and options of [`create_xml_files`].
#[derive(Debug, Clone)]
pub struct XmlFilesParams<'a> {
    pub field_cat: &'a Path,
    pub xml_template: &'a Path,
    pub progtemp_file: &'a Path,
    pub obstemp_file: &'a Path,
    pub outdir: &'a Path,
    pub prefix: Option<&'a str>,
    pub suffix: &'a str,
    pub pass_datamver: bool,
    pub overwrite: bool,
}

/// Root attributes of every OB, taken from the field catalogue's primary
/// header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObHeader {
    pub author: String,
    pub cc_report: String,
    pub report_verbosity: String,
    pub trimester: String,
}

impl ObHeader {
    fn from_catalogue(cat: &Catalogue) -> ObHeader {
        let get = |key: &str| {
            cat.primary_value(key)
                .map(|v| v.to_string())
                .unwrap_or_default()
        };
        ObHeader {
            author: get("AUTHOR"),
            cc_report: get("CCREPORT"),
            report_verbosity: get("VERBOSE"),
            trimester: get("TRIMESTE"),
        }
    }
}

/// A field-catalogue row that is going into an OB.
#[derive(Debug, Clone)]
pub struct MosField {
    pub record: FieldRecord,
    pub progtemp: ProgtempInfo,
    pub obstemp: ObstempInfo,
}

/// The rows that make one OB share a field name, PROGTEMP, OBSTEMP and
/// centre. Coordinates are compared exactly.
type GroupKey = (String, String, String, u64, u64);

fn group_key(r: &FieldRecord) -> GroupKey {
    (
        r.field_name.clone(),
        r.progtemp.clone(),
        r.obstemp.clone(),
        r.ra.to_bits(),
        r.dec.to_bits(),
    )
}

/// Check that all DATAMVERs agree. A mismatch is an error unless
/// `pass_datamver` is set.
pub fn check_datamver(
    catalogue: Option<&str>,
    xml_template: Option<&str>,
    progtemp: &str,
    obstemp: &str,
    pass_datamver: bool,
) -> Result<(), WorkflowError> {
    let catalogue = catalogue.unwrap_or("<none>");
    let xml_template = xml_template.unwrap_or("<none>");
    if catalogue == xml_template && catalogue == progtemp && catalogue == obstemp {
        debug!("DATAMVER {catalogue} is consistent");
        return Ok(());
    }

    let err = WorkflowError::DatamverMismatch {
        catalogue: catalogue.to_string(),
        xml_template: xml_template.to_string(),
        progtemp: progtemp.to_string(),
        obstemp: obstemp.to_string(),
    };
    if pass_datamver {
        warn!("{err}; continuing anyway");
        Ok(())
    } else {
        error!("{err}. Stop unless you are sure!");
        Err(err)
    }
}

/// Keep the rows whose PROGTEMP is a MOS PROGTEMP and whose OBSTEMP can be
/// decoded. Other rows are reported and dropped.
pub fn select_mos_fields(
    records: Vec<FieldRecord>,
    progtemps: &ProgtempTable,
    obstemps: &ObstempTable,
) -> Vec<MosField> {
    let mut fields = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        let progtemp = match progtemps.decode(&record.progtemp) {
            Ok(p) if p.obsmode == MOS_OBSMODE => p,
            _ => {
                warn!("unexpected PROGTEMP in row {}: {}", i + 1, record.progtemp);
                continue;
            }
        };
        let obstemp = match obstemps.decode(&record.obstemp) {
            Ok(o) => o,
            Err(e) => {
                warn!("unexpected OBSTEMP in row {}: {} ({e})", i + 1, record.obstemp);
                continue;
            }
        };
        fields.push(MosField {
            record,
            progtemp,
            obstemp,
        });
    }
    fields
}

/// Group fields into OBs, keeping the order in which each OB is first seen.
pub fn group_fields(fields: Vec<MosField>) -> Vec<Vec1<MosField>> {
    let mut groups: IndexMap<GroupKey, Vec1<MosField>> = IndexMap::new();
    for field in fields {
        match groups.entry(group_key(&field.record)) {
            indexmap::map::Entry::Occupied(mut e) => e.get_mut().push(field),
            indexmap::map::Entry::Vacant(e) => {
                e.insert(Vec1::new(field));
            }
        }
    }
    groups.into_values().collect()
}

/// Fill a copy of the blank template for one group of fields.
pub fn build_ob(
    template: &ObXml,
    group: &Vec1<MosField>,
    header: &ObHeader,
) -> Result<ObXml, ObXmlError> {
    let first = group.first();
    let record = &first.record;
    let progtemp = &first.progtemp;

    let mut ob = template.clone();
    ob.source = None;
    ob.set_root_attrs(&[
        ("author", header.author.clone()),
        ("cc_report", header.cc_report.clone()),
        ("report_verbosity", header.report_verbosity.clone()),
    ]);
    ob.set_element_attrs(
        "observation",
        &[
            ("name", record.field_name.clone()),
            ("progtemp", record.progtemp.clone()),
            ("obstemp", record.obstemp.clone()),
            ("obs_type", MOS_OBSMODE.to_string()),
            ("trimester", header.trimester.clone()),
        ],
    )?;
    let constraints = first
        .obstemp
        .constraints
        .iter()
        .map(|(k, v)| (*k, v.clone()))
        .collect::<Vec<_>>();
    ob.set_element_attrs("obsconstraints", &constraints)?;
    ob.set_element_attrs(
        "spectrograph",
        &[
            ("resolution", progtemp.resolution.clone()),
            ("red_vph", progtemp.red_vph.clone()),
            ("blue_vph", progtemp.blue_vph.clone()),
            ("binning_Y", progtemp.binning.clone()),
        ],
    )?;
    ob.set_exposures(progtemp.num_exposures, progtemp.exp_time.as_deref())?;

    let mut surveys: IndexMap<String, i64> = IndexMap::new();
    for f in group {
        surveys
            .entry(f.record.survey.clone())
            .or_insert(f.record.max_fibres);
    }
    ob.set_surveys(&surveys.into_iter().collect::<Vec<_>>())?;
    ob.set_field_centre(record.ra, record.dec)?;
    Ok(ob)
}

/// `[prefix_]FIELD_NAME[suffix].xml`
pub fn xml_file_name(field_name: &str, prefix: Option<&str>, suffix: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}_{field_name}{suffix}.xml"),
        _ => format!("{field_name}{suffix}.xml"),
    }
}

/// The output file name of each group. Groups that share a field name (but
/// differ in PROGTEMP, OBSTEMP or centre) are numbered in the order they were
/// first seen, e.g. `Spam_1.xml` and `Spam_2.xml`, so that every group gets
/// its own OB. A name that still clashes is an error.
pub fn xml_file_names(
    groups: &[Vec1<MosField>],
    prefix: Option<&str>,
    suffix: &str,
) -> Result<Vec<String>, WorkflowError> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for group in groups {
        *counts
            .entry(group.first().record.field_name.as_str())
            .or_default() += 1;
    }

    let mut numbers: IndexMap<&str, usize> = IndexMap::new();
    let mut used = HashSet::with_capacity(groups.len());
    let mut names = Vec::with_capacity(groups.len());
    for group in groups {
        let field_name = group.first().record.field_name.as_str();
        let count = counts.get(field_name).copied().unwrap_or_default();
        let name = if count > 1 {
            let n = numbers.entry(field_name).or_default();
            *n += 1;
            let numbered = format!("{field_name}_{n}");
            warn!("{count} OBs are named '{field_name}'; this one is written as '{numbered}'");
            numbered
        } else {
            field_name.to_string()
        };
        let file_name = xml_file_name(&name, prefix, suffix);
        if !used.insert(file_name.clone()) {
            return Err(WorkflowError::OutputClash(file_name));
        }
        names.push(file_name);
    }
    Ok(names)
}

/// Create one OB XML per MOS field in the field catalogue. The paths of all
/// outputs are returned, including those that were skipped because they
/// already exist.
pub fn create_xml_files(
    params: &XmlFilesParams,
) -> Result<Vec<(PathBuf, OutputState)>, WorkflowError> {
    for file in [
        params.field_cat,
        params.xml_template,
        params.progtemp_file,
        params.obstemp_file,
    ] {
        check_input(file)?;
    }

    let catalogue = Catalogue::read(params.field_cat)?;
    let template = ObXml::read(params.xml_template)?;
    let progtemps = ProgtempTable::read(params.progtemp_file)?;
    let obstemps = ObstempTable::read(params.obstemp_file)?;
    check_datamver(
        catalogue.datamver().as_deref(),
        template.datamver(),
        progtemps.datamver(),
        obstemps.datamver(),
        params.pass_datamver,
    )?;

    let header = ObHeader::from_catalogue(&catalogue);
    let fields = select_mos_fields(catalogue.field_records()?, &progtemps, &obstemps);
    let groups = group_fields(fields);
    info!("Processing {} MOS fields", groups.len());

    let file_names = xml_file_names(&groups, params.prefix, params.suffix)?;
    let mut outputs = Vec::with_capacity(groups.len());
    for (group, file_name) in groups.iter().zip(file_names) {
        let ob = build_ob(&template, group, &header)?;
        let output = params.outdir.join(file_name);
        let state = StageOutput::new(&output).run(params.field_cat, params.overwrite, |out| {
            ob.write(out)?;
            info!("Wrote {}", out.display());
            Ok::<(), WorkflowError>(())
        })?;
        outputs.push((output, state));
    }
    Ok(outputs)
}
