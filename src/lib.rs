// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Observation preparation for multi-object spectroscopy (MOS).

The workflow turns a master catalogue template into observing blocks (OBs):
a MOS field catalogue, one OB XML per field, science targets, and guide and
calibration stars. See [`workflow`] for the stages.
 */

pub mod catalogue;
mod cli;
pub mod constants;
pub mod coord;
pub(crate) mod io;
pub mod obsdefs;
pub mod obxml;
pub mod workflow;

// Re-exports.
pub use cli::{Mosflow, MosflowError};
pub use io::{HeaderCard, HeaderValue};
