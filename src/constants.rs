// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All angles are in degrees unless the name says otherwise.
 */

/// The value given to XML attributes (and target surveys) that have not been
/// filled in yet.
pub const PLACEHOLDER: &str = "%%%";

/// The default maximum distance between a target and its field centre
/// [degrees].
pub const DEFAULT_MAX_RADIUS: f64 = 1.0;

/// The extension name of the MOS field-centre table.
pub const FIELD_TEMPLATE_EXTNAME: &str = "MOS FIELD LIST";

/// The observing mode handled by this workflow.
pub const MOS_OBSMODE: &str = "MOS";

/// The default output directory of every stage.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// The format of the DATETIME keyword (UTC).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// The number of guide stars to keep if the OB doesn't say otherwise.
pub const DEFAULT_MAX_GUIDE: usize = 8;

/// Guide stars must have a Gaia G magnitude within this range.
pub const GUIDE_MAG_MIN: f64 = 12.0;
pub const GUIDE_MAG_MAX: f64 = 16.5;

/// Calibration stars must have a Gaia G magnitude within this range.
pub const CALIB_MAG_MIN: f64 = 14.0;
pub const CALIB_MAG_MAX: f64 = 18.0;

/// Calibration stars with both BP and RP photometry must have a BP-RP colour
/// within this range.
pub const CALIB_COLOUR_MIN: f64 = 0.2;
pub const CALIB_COLOUR_MAX: f64 = 0.8;

/// The epoch assumed for reference stars without an epoch column.
pub const DEFAULT_STAR_EPOCH: f64 = 2015.5;

/// The `targsrvy` given to injected guide stars.
pub const GUIDE_SURVEY: &str = "GUIDE";

/// The `targsrvy` given to injected calibration stars.
pub const CALIB_SURVEY: &str = "CALIB";
