// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code. More specific options for `mosflow`
//! subcommands are contained in modules.
//!
//! Only 3 things should be public in this module: `Mosflow`, `Mosflow::run`,
//! and `MosflowError`.

mod add_guide_calib;
mod add_targets;
mod catalogues;
mod error;
mod field_template;
mod printers;
mod xml_files;

pub use error::MosflowError;

use std::path::Path;

use clap::{AppSettings, ArgEnum, Args, Parser, Subcommand};
use log::{debug, info};

use crate::workflow::create_output_dir;

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    about = r#"Prepare MOS observing blocks: field catalogues, OB XMLs, targets,
and guide and calibration stars"#
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_subcommands = true)]
#[clap(propagate_version = true)]
#[clap(infer_long_args = true)]
pub struct Mosflow {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ArgEnum)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// The level of the log messages.
    #[clap(long = "log_level", arg_enum, default_value = "info")]
    #[clap(global = true)]
    log_level: LogLevel,
}

#[derive(Debug, Subcommand)]
#[clap(arg_required_else_help = true)]
enum Command {
    #[clap(about = "Stage 1: create a MOS field template from the master catalogue template.")]
    FieldTemplate(field_template::FieldTemplateArgs),

    #[clap(about = "Stage 1: populate the MOS field template with fields.")]
    FieldCat(catalogues::FieldCatArgs),

    #[clap(alias = "create-xml-files")]
    #[clap(about = "Stage 2: create one OB XML per MOS field.")]
    XmlFiles(xml_files::XmlFilesArgs),

    #[clap(about = "Stage 3: populate the master catalogue template with targets.")]
    TargetCat(catalogues::TargetCatArgs),

    #[clap(about = "Stage 3: add targets from a target catalogue to OB XMLs.")]
    AddTargets(add_targets::AddTargetsArgs),

    #[clap(about = r#"Stage 4: add guide and calibration stars to OB XMLs. Plots are only made if compiled with the "plotting" feature."#)]
    AddGuideCalib(add_guide_calib::AddGuideCalibArgs),
}

impl Mosflow {
    pub fn run(self) -> Result<(), MosflowError> {
        let GlobalArgs { log_level } = self.global_opts;
        setup_logging(log_level).map_err(|e| MosflowError::Generic(e.to_string()))?;

        // Print the version of mosflow and its build-time information.
        let sub_command = match &self.command {
            Command::FieldTemplate(_) => "field-template",
            Command::FieldCat(_) => "field-cat",
            Command::XmlFiles(_) => "xml-files",
            Command::TargetCat(_) => "target-cat",
            Command::AddTargets(_) => "add-targets",
            Command::AddGuideCalib(_) => "add-guide-calib",
        };
        info!("mosflow {} {}", sub_command, env!("CARGO_PKG_VERSION"));
        display_build_info();

        match self.command {
            Command::FieldTemplate(args) => args.run()?,
            Command::FieldCat(args) => args.run()?,
            Command::XmlFiles(args) => args.run()?,
            Command::TargetCat(args) => args.run()?,
            Command::AddTargets(args) => args.run()?,
            Command::AddGuideCalib(args) => args.run()?,
        }

        info!("mosflow {} complete.", sub_command);
        Ok(())
    }
}

/// Make the directory that will hold `file`.
fn create_parent_dir(file: &Path) -> Result<(), MosflowError> {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(create_output_dir(dir)?),
        _ => Ok(()),
    }
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Source code lines are
/// displayed in log messages at the debug level.
fn setup_logging(level: LogLevel) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    builder.filter_level(level.filter());
    if let LogLevel::Debug = level {
        builder.format(|buf, record| {
            use std::io::Write;

            let timestamp = buf.timestamp();
            let level = record.level();
            let target = record.target();
            let line = record.line().unwrap_or(0);
            let message = record.args();

            writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
        });
    }
    builder.try_init()
}

/// Write debug-level log lines of how this executable was compiled.
fn display_build_info() {
    let dirty = match GIT_DIRTY {
        Some(true) => " (dirty)",
        _ => "",
    };
    match GIT_COMMIT_HASH_SHORT {
        Some(hash) => {
            debug!("Compiled on git commit hash: {hash}{dirty}");
        }
        None => debug!("Compiled on git commit hash: <no git info>"),
    }
    if let Some(hr) = GIT_HEAD_REF {
        debug!("            git head ref: {}", hr);
    }
    debug!("            {}", BUILT_TIME_UTC);
    debug!("         with compiler {}", RUSTC_VERSION);
    debug!("");
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_underscore_flags_parse() {
        let args = Mosflow::try_parse_from([
            "mosflow",
            "add-guide-calib",
            "a.xml",
            "b.xml",
            "--star_cat",
            "gaia.fits",
            "--num_calib_stars_request",
            "-1",
            "--write_useful_tables",
            "--log_level",
            "debug",
        ])
        .unwrap();
        assert!(matches!(args.global_opts.log_level, LogLevel::Debug));
        match args.command {
            Command::AddGuideCalib(a) => {
                assert_eq!(a.xml_files, ["a.xml", "b.xml"]);
                assert_eq!(a.num_calib_stars_request, -1);
                assert!(a.write_useful_tables);
                assert_eq!(a.max_radius, 1.0);
            }
            c => panic!("unexpected command {c:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let args = Mosflow::try_parse_from(["mosflow", "xml-files", "fields.fits"]).unwrap();
        assert!(matches!(args.global_opts.log_level, LogLevel::Info));
        match args.command {
            Command::XmlFiles(a) => {
                assert_eq!(a.outdir, Path::new("output"));
                assert_eq!(a.xml_template, Path::new("aux/BlankXMLTemplate.xml"));
                assert!(a.prefix.is_none());
                assert!(!a.pass_datamver);
            }
            c => panic!("unexpected command {c:?}"),
        }
    }

    #[test]
    fn test_bad_log_level() {
        assert!(Mosflow::try_parse_from(["mosflow", "--log_level", "loud", "field-template"]).is_err());
    }
}
