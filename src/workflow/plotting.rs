// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plots of guide and calibration star candidates on the tangent plane of a
//! field.

use std::path::Path;

use log::debug;
use plotters::prelude::*;
use thiserror::Error;

use crate::{catalogue::ReferenceStar, coord::RADec};

/// The number of X pixels on the plots.
const X_PIXELS: u32 = 1000;
/// The number of Y pixels on the plots.
const Y_PIXELS: u32 = 1000;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("While plotting {0}")]
    Chart(String),

    #[error("Error from the plotters library: {0}")]
    Plotters(Box<dyn std::error::Error>),
}

fn offsets<'a>(
    centre: RADec,
    stars: impl IntoIterator<Item = &'a ReferenceStar>,
) -> Vec<(f64, f64)> {
    stars
        .into_iter()
        .filter_map(|s| centre.tangent_plane_offset(&s.radec()))
        .collect()
}

/// Plot `candidates` (hollow) and `selected` stars (filled) around the field
/// centre, with a circle of `max_radius` degrees.
pub(super) fn plot_stars(
    file: &Path,
    title: &str,
    centre: RADec,
    max_radius: f64,
    candidates: &[&ReferenceStar],
    selected: &[&ReferenceStar],
) -> Result<(), DrawError> {
    debug!("Plotting {} stars to {}", candidates.len(), file.display());
    let root = BitMapBackend::new(file, (X_PIXELS, Y_PIXELS)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| DrawError::Plotters(Box::new(e)))?;

    let limit = max_radius * 1.1;
    let mut cc = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-limit..limit, -limit..limit)
        .map_err(|e| DrawError::Chart(e.to_string()))?;
    cc.configure_mesh()
        .light_line_style(WHITE)
        .x_desc("ξ (east) [deg]")
        .y_desc("η (north) [deg]")
        .draw()
        .map_err(|e| DrawError::Chart(e.to_string()))?;

    cc.draw_series(LineSeries::new(
        (0..=360).map(|d| {
            let (s, c) = (d as f64).to_radians().sin_cos();
            (max_radius * c, max_radius * s)
        }),
        &BLACK,
    ))
    .map_err(|e| DrawError::Chart(e.to_string()))?;

    cc.draw_series(PointSeries::of_element(
        offsets(centre, candidates.iter().copied()),
        4,
        ShapeStyle::from(&BLUE),
        &|coord, size, style| EmptyElement::at(coord) + Circle::new((0, 0), size, style),
    ))
    .map_err(|e| DrawError::Chart(e.to_string()))?;

    cc.draw_series(PointSeries::of_element(
        offsets(centre, selected.iter().copied()),
        6,
        ShapeStyle::from(&RED).filled(),
        &|coord, size, style| EmptyElement::at(coord) + Circle::new((0, 0), size, style),
    ))
    .map_err(|e| DrawError::Chart(e.to_string()))?;

    root.present()
        .map_err(|e| DrawError::Plotters(Box::new(e)))?;
    Ok(())
}
