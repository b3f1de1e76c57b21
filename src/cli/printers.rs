// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// Pretty printers for reporting information.
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use crate::workflow::OutputState;

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

pub(super) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: Vec<Vec<Cow<'static, str>>>,
}

impl InfoPrinter {
    pub(super) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: vec![],
        }
    }

    pub(super) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(super) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        if !block.is_empty() {
            self.blocks.push(block);
        }
    }

    /// Push a line for a file argument.
    pub(super) fn push_file(&mut self, what: &str, file: &Path) {
        self.push_line(format!("{what}: {}", file.display()).into());
    }

    pub(super) fn display(self) {
        log::info!("{}", console::style(self.title).bold());
        let num_blocks = self.blocks.len();
        for (i_block, block) in self.blocks.into_iter().enumerate() {
            let num_lines = block.len();
            for (i_line, line) in block.into_iter().enumerate() {
                let symbol = match (i_line, i_line + 1 == num_lines, i_block + 1 == num_blocks) {
                    (0, false, _) => VERTICAL_AND_RIGHT,
                    (0, _, false) => VERTICAL_AND_RIGHT,
                    (0, true, true) => UP_AND_RIGHT,
                    _ => VERTICAL,
                };
                log::info!("{symbol} {line}");
            }
        }
        log::info!("");
    }
}

/// Report what happened to each output of a stage.
pub(super) fn display_outputs(outputs: &[(PathBuf, OutputState)]) {
    let num_written = outputs
        .iter()
        .filter(|(_, s)| *s == OutputState::Written)
        .count();
    let mut printer = InfoPrinter::new(
        format!(
            "{} outputs ({num_written} written, {} skipped)",
            outputs.len(),
            outputs.len() - num_written
        )
        .into(),
    );
    for (path, state) in outputs {
        let state = match state {
            OutputState::Written => console::style("written").green(),
            OutputState::Skipped => console::style("skipped").yellow(),
        };
        printer.push_line(format!("{} ({state})", path.display()).into());
    }
    printer.display();
}
