// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Observing block (OB) XML documents.

An OB has a root element carrying `datamver`, an `<observation>` element with
`progtemp` and `obstemp` attributes, a `<surveys>` element listing the surveys
that may place targets in the OB, and a `<fields>` element whose first
`<field>` has the field centre (`RA_d`, `Dec_d`) and holds `<target>`
elements.

An [`ObXml`] is loaded, mutated in memory and written to a new file; nothing
is written until [`ObXml::write`] is called.
 */

mod element;
mod error;
mod targets;
#[cfg(test)]
mod tests;

pub use element::{Element, Node};
pub use error::ObXmlError;
pub use targets::{star_target, table_row_target, TARGET_ATTRIBUTES};

use std::path::{Path, PathBuf};

use log::debug;

use crate::{constants::PLACEHOLDER, coord::RADec};

#[derive(Debug, Clone, PartialEq)]
pub struct ObXml {
    /// Where this document was read from, if anywhere.
    pub source: Option<PathBuf>,
    pub root: Element,
}

impl ObXml {
    pub fn read<P: AsRef<Path>>(file: P) -> Result<ObXml, ObXmlError> {
        let file = file.as_ref();
        debug!("Reading OB XML {}", file.display());
        let contents = std::fs::read_to_string(file).map_err(|err| ObXmlError::Read {
            file: file.to_path_buf(),
            err,
        })?;
        let root = element::parse_document(&contents).map_err(|err| ObXmlError::InFile {
            file: file.to_path_buf(),
            err: Box::new(err),
        })?;
        Ok(ObXml {
            source: Some(file.to_path_buf()),
            root,
        })
    }

    pub fn parse(contents: &str) -> Result<ObXml, ObXmlError> {
        Ok(ObXml {
            source: None,
            root: element::parse_document(contents)?,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ObXmlError> {
        element::write_document(&self.root)
    }

    /// Serialise this document to `file`. An existing file is replaced.
    pub fn write<P: AsRef<Path>>(&self, file: P) -> Result<(), ObXmlError> {
        let file = file.as_ref();
        debug!("Writing OB XML {}", file.display());
        let bytes = self.to_bytes()?;
        std::fs::write(file, bytes).map_err(|err| ObXmlError::Write {
            file: file.to_path_buf(),
            err,
        })
    }

    pub fn datamver(&self) -> Option<&str> {
        self.root.attr("datamver")
    }

    fn element(&self, name: &'static str) -> Result<&Element, ObXmlError> {
        self.root
            .find(name)
            .ok_or(ObXmlError::MissingElement(name))
    }

    fn element_mut(&mut self, name: &'static str) -> Result<&mut Element, ObXmlError> {
        self.root
            .find_mut(name)
            .ok_or(ObXmlError::MissingElement(name))
    }

    fn observation_attr(&self, attribute: &'static str) -> Result<&str, ObXmlError> {
        self.element("observation")?
            .attr(attribute)
            .ok_or(ObXmlError::MissingAttribute {
                element: "observation",
                attribute,
            })
    }

    pub fn progtemp(&self) -> Result<&str, ObXmlError> {
        self.observation_attr("progtemp")
    }

    pub fn obstemp(&self) -> Result<&str, ObXmlError> {
        self.observation_attr("obstemp")
    }

    /// The names of the surveys of this OB.
    pub fn surveys(&self) -> Result<Vec<String>, ObXmlError> {
        let mut surveys = vec![];
        self.element("surveys")?.find_all("survey", &mut surveys);
        Ok(surveys
            .into_iter()
            .filter_map(|s| s.attr("name"))
            .map(|s| s.to_string())
            .collect())
    }

    /// The first `<field>` of the OB.
    pub fn first_field(&self) -> Result<&Element, ObXmlError> {
        self.element("fields")?
            .child_elements()
            .find(|e| e.name == "field")
            .ok_or(ObXmlError::MissingElement("field"))
    }

    pub fn first_field_mut(&mut self) -> Result<&mut Element, ObXmlError> {
        self.element_mut("fields")?
            .child_elements_mut()
            .find(|e| e.name == "field")
            .ok_or(ObXmlError::MissingElement("field"))
    }

    /// The centre of the first field.
    pub fn field_centre(&self) -> Result<RADec, ObXmlError> {
        let field = self.first_field()?;
        let get = |attribute: &'static str| -> Result<f64, ObXmlError> {
            let value = field.attr(attribute).ok_or(ObXmlError::MissingAttribute {
                element: "field",
                attribute,
            })?;
            value.trim().parse().map_err(|_| ObXmlError::NotANumber {
                element: "field",
                attribute,
                value: value.to_string(),
            })
        };
        Ok(RADec::from_degrees(get("RA_d")?, get("Dec_d")?))
    }

    /// The `max_guide` attribute of `<configure>`, if it is set to a number.
    pub fn max_guide(&self) -> Option<usize> {
        self.root
            .find("configure")
            .and_then(|c| c.attr("max_guide"))
            .and_then(|v| v.trim().parse().ok())
    }

    /// Append targets to the first field.
    pub fn add_targets<I: IntoIterator<Item = Element>>(
        &mut self,
        targets: I,
    ) -> Result<usize, ObXmlError> {
        let field = self.first_field_mut()?;
        let mut count = 0;
        for target in targets {
            field.push_child(target);
            count += 1;
        }
        Ok(count)
    }

    /// Remove template targets (those with a placeholder survey) from every
    /// field.
    pub fn remove_placeholder_targets(&mut self) -> Result<usize, ObXmlError> {
        Ok(self.element_mut("fields")?.remove_descendants(|e| {
            e.name == "target" && e.attr("targsrvy") == Some(PLACEHOLDER)
        }))
    }

    pub fn set_root_attrs(&mut self, attrs: &[(&str, String)]) {
        for (k, v) in attrs {
            self.root.set_attr(k, v.as_str());
        }
    }

    /// Set attributes of the first element with the given name.
    pub fn set_element_attrs(
        &mut self,
        name: &'static str,
        attrs: &[(&str, String)],
    ) -> Result<(), ObXmlError> {
        let element = self.element_mut(name)?;
        for (k, v) in attrs {
            element.set_attr(k, v.as_str());
        }
        Ok(())
    }

    /// Replace the children of `<exposures>` with `num` copies of its first
    /// `<exposure>`, numbered with `order` from 1. `exp_time` is set if given.
    pub fn set_exposures(&mut self, num: u32, exp_time: Option<&str>) -> Result<(), ObXmlError> {
        let exposures = self.element_mut("exposures")?;
        let template = exposures
            .child_elements()
            .find(|e| e.name == "exposure")
            .cloned()
            .ok_or(ObXmlError::MissingElement("exposure"))?;
        exposures.children.clear();
        for i in 0..num {
            let mut exposure = template.clone();
            exposure.set_attr("order", (i + 1).to_string());
            if let Some(t) = exp_time {
                exposure.set_attr("exp_time", t);
            }
            exposures.push_child(exposure);
        }
        Ok(())
    }

    /// Replace the children of `<surveys>` with one copy of its first
    /// `<survey>` per (name, max_fibres).
    pub fn set_surveys(&mut self, surveys: &[(String, i64)]) -> Result<(), ObXmlError> {
        let element = self.element_mut("surveys")?;
        let template = element
            .child_elements()
            .find(|e| e.name == "survey")
            .cloned()
            .ok_or(ObXmlError::MissingElement("survey"))?;
        element.children.clear();
        for (name, max_fibres) in surveys {
            let mut survey = template.clone();
            survey.set_attr("name", name.as_str());
            survey.set_attr("max_fibres", max_fibres.to_string());
            element.push_child(survey);
        }
        Ok(())
    }

    /// Set the centre of the first field [degrees].
    pub fn set_field_centre(&mut self, ra: f64, dec: f64) -> Result<(), ObXmlError> {
        let field = self.first_field_mut()?;
        field.set_attr("RA_d", format!("{ra:?}"));
        field.set_attr("Dec_d", format!("{dec:?}"));
        Ok(())
    }

    /// All targets of the first field.
    pub fn targets(&self) -> Result<Vec<&Element>, ObXmlError> {
        Ok(self
            .first_field()?
            .child_elements()
            .filter(|e| e.name == "target")
            .collect())
    }
}
