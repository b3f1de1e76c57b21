// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The stages of the MOS workflow.

Each stage reads the output of the previous one:

1. [`field_template`]: master catalogue template -> MOS field template
2. [`catalogue::populate_field_catalogue`]: field template -> field catalogue
3. [`xml_files`]: field catalogue -> one OB XML per field
4. [`catalogue::populate_target_catalogue`]: master template -> target
   catalogue
5. [`add_targets`]: OB XMLs + target catalogue -> OB XMLs with targets
6. [`guide_calib`]: OB XMLs + reference stars -> OB XMLs with guide and
   calibration stars

Every output is handled by a [`StageOutput`]; an existing output is never
overwritten unless asked for.
 */

pub mod add_targets;
pub mod catalogue;
mod demo;
mod error;
pub mod field_template;
pub mod guide_calib;
#[cfg(feature = "plotting")]
mod plotting;
pub mod xml_files;

pub use error::WorkflowError;

use std::path::{Path, PathBuf};

use log::info;

/// What happened to a stage's output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    /// The output was written (replacing any earlier output).
    Written,
    /// The output already existed and was left alone.
    Skipped,
}

/// The output file of one unit of work, and any files written alongside it
/// (e.g. plots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub path: PathBuf,
    pub companions: Vec<PathBuf>,
}

impl StageOutput {
    pub fn new<P: Into<PathBuf>>(path: P) -> StageOutput {
        StageOutput {
            path: path.into(),
            companions: vec![],
        }
    }

    pub fn with_companions(mut self, companions: Vec<PathBuf>) -> StageOutput {
        self.companions = companions;
        self
    }

    /// Write this output with `write`, unless it already exists and
    /// `overwrite` is false. Before writing, any old output and companions
    /// are removed; companions left by an unfinished run are removed even
    /// when the output itself is missing.
    pub fn run<F, E>(&self, input: &Path, overwrite: bool, write: F) -> Result<OutputState, E>
    where
        F: FnOnce(&Path) -> Result<(), E>,
        E: From<std::io::Error>,
    {
        if self.path.exists() && !overwrite {
            info!(
                "Skipping file {} as its output already exists: {}",
                input.display(),
                self.path.display()
            );
            return Ok(OutputState::Skipped);
        }
        for file in std::iter::once(&self.path).chain(self.companions.iter()) {
            if file.exists() {
                info!("Removing previous file: {}", file.display());
                std::fs::remove_file(file)?;
            }
        }
        write(&self.path)?;
        Ok(OutputState::Written)
    }
}

/// The stem of an output file made from `input` by a stage marked with
/// `marker`. `X.xml` gives `X-marker`, but inputs whose stems end in `-t` or
/// `-` (the outputs of an earlier stage) give `X-tmarker` and `X-marker`.
pub fn output_stem(input: &Path, marker: &str) -> Result<String, WorkflowError> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| WorkflowError::BadFileName(input.to_path_buf()))?;
    if stem.ends_with("-t") || stem.ends_with('-') {
        Ok(format!("{stem}{marker}"))
    } else {
        Ok(format!("{stem}-{marker}"))
    }
}

/// Make the output directory if it doesn't exist.
pub fn create_output_dir(dir: &Path) -> Result<(), std::io::Error> {
    if !dir.exists() {
        info!("Creating the output directory {}", dir.display());
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Check that an input file exists.
pub(crate) fn check_input(file: &Path) -> Result<(), WorkflowError> {
    if file.is_file() {
        Ok(())
    } else {
        Err(WorkflowError::MissingInput(file.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem(Path::new("a/Spam.xml"), "t").unwrap(), "Spam-t");
        assert_eq!(output_stem(Path::new("Spam-t.xml"), "gc").unwrap(), "Spam-tgc");
        assert_eq!(output_stem(Path::new("Spam-.xml"), "t").unwrap(), "Spam-t");
        assert_eq!(output_stem(Path::new("Spam-t.xml"), "t").unwrap(), "Spam-tt");
        assert!(output_stem(Path::new(""), "t").is_err());
    }

    #[test]
    fn test_stage_output_skip_and_overwrite() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("out.xml");
        let companion = tmp.path().join("out.png");
        let stage = StageOutput::new(&out).with_companions(vec![companion.clone()]);

        let write = |p: &Path| std::fs::write(p, "first");
        assert_eq!(
            stage.run(Path::new("in.xml"), false, write).unwrap(),
            OutputState::Written
        );
        std::fs::write(&companion, "plot").unwrap();

        // Existing output is kept.
        let state = stage
            .run(Path::new("in.xml"), false, |p: &Path| std::fs::write(p, "second"))
            .unwrap();
        assert_eq!(state, OutputState::Skipped);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "first");
        assert!(companion.exists());

        // Overwriting removes companions too.
        let state = stage
            .run(Path::new("in.xml"), true, |p: &Path| std::fs::write(p, "third"))
            .unwrap();
        assert_eq!(state, OutputState::Written);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "third");
        assert!(!companion.exists());
    }

    #[test]
    fn test_stage_output_removes_stale_companions() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("out.xml");
        let companion = tmp.path().join("out.fits");
        std::fs::write(&companion, "stale").unwrap();
        let stage = StageOutput::new(&out).with_companions(vec![companion.clone()]);

        // The output is missing, so the stale companion must be gone before
        // the writer runs, with or without overwrite.
        for overwrite in [false, true] {
            let state = stage
                .run(Path::new("in.xml"), overwrite, |p: &Path| {
                    assert!(!companion.exists());
                    std::fs::write(&companion, "fresh")?;
                    std::fs::write(p, "ob")
                })
                .unwrap();
            assert_eq!(state, OutputState::Written);
            std::fs::remove_file(&out).unwrap();
        }
        assert_eq!(std::fs::read_to_string(&companion).unwrap(), "fresh");
    }
}
