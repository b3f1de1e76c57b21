// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::Parser;

fn main() {
    // Run mosflow, only performing extra steps if it returns an error.
    if let Err(e) = mos_workflow::Mosflow::parse().run() {
        // Use the Display impl of the error, not Debug.
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
