// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions for writing FITS files.
//!
//! The fitsio crate doesn't give us control over table creation and header
//! card types, so a few low-level cfitsio functions are called here.

use std::{
    ffi::CString,
    os::raw::{c_char, c_int},
    path::Path,
    ptr,
};

use fitsio::{hdu::FitsHdu, FitsFile};

use crate::io::{
    read::fits::{fits_open_hdu, FitsError},
    HeaderCard, HeaderValue,
};

/// cfitsio's code for a binary table.
const BINARY_TBL: c_int = 2;

/// The longest string that fits on a single header card.
const MAX_SHORT_STRING_LEN: usize = 68;

/// The name and format of a table column to be created.
#[derive(Debug, Clone)]
pub(crate) struct NewColumn<'a> {
    pub(crate) name: &'a str,
    pub(crate) tform: &'a str,
}

#[track_caller]
fn fitsio_error(fits_fptr: &FitsFile, hdu_description: &str, e: fitsio::errors::Error) -> FitsError {
    let caller = std::panic::Location::caller();
    FitsError::Fitsio {
        fits_error: Box::new(e),
        fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
        hdu_description: hdu_description.to_string().into_boxed_str(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    }
}

#[track_caller]
fn c_string(fits_fptr: &FitsFile, hdu_description: &str, s: &str) -> Result<CString, FitsError> {
    CString::new(s).map_err(|_| {
        fitsio_error(
            fits_fptr,
            hdu_description,
            fitsio::errors::Error::Message(format!("'{s}' contains a NUL byte")),
        )
    })
}

/// Create a new fits file with an empty primary HDU. Any existing file at the
/// path is an error.
#[track_caller]
pub(crate) fn fits_create<P: AsRef<Path>>(file: P) -> Result<FitsFile, FitsError> {
    FitsFile::create(file.as_ref()).open().map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Open {
            fits_error: Box::new(e),
            fits_filename: file.as_ref().to_path_buf().into_boxed_path(),
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }
    })
}

/// Write (or update) header cards on the given HDU, keeping their value types
/// and comments.
#[track_caller]
pub(crate) fn fits_write_cards(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    cards: &[HeaderCard],
) -> Result<(), FitsError> {
    let hdu_description = format!("{}", hdu.number + 1);
    // Make sure cfitsio is looking at the right HDU.
    fits_open_hdu(fits_fptr, hdu.number)?;

    for card in cards {
        let key = c_string(fits_fptr, &hdu_description, &card.key)?;
        let comment = c_string(fits_fptr, &hdu_description, &card.comment)?;
        let mut status = 0;
        match &card.value {
            HeaderValue::Str(s) => {
                let value = c_string(fits_fptr, &hdu_description, s)?;
                unsafe {
                    if s.len() > MAX_SHORT_STRING_LEN {
                        // ffplsw = fits_write_key_longwarn
                        fitsio_sys::ffplsw(fits_fptr.as_raw(), &mut status);
                    }
                    // ffukls = fits_update_key_longstr
                    fitsio_sys::ffukls(
                        fits_fptr.as_raw(),
                        key.as_ptr(),
                        value.as_ptr(),
                        comment.as_ptr(),
                        &mut status,
                    );
                }
            }
            HeaderValue::Int(i) => unsafe {
                // ffukyj = fits_update_key_lng
                fitsio_sys::ffukyj(
                    fits_fptr.as_raw(),
                    key.as_ptr(),
                    *i,
                    comment.as_ptr(),
                    &mut status,
                );
            },
            HeaderValue::Float(f) => unsafe {
                // ffukyd = fits_update_key_dbl; a negative number of decimals
                // lets cfitsio choose the shortest exact representation.
                fitsio_sys::ffukyd(
                    fits_fptr.as_raw(),
                    key.as_ptr(),
                    *f,
                    -15,
                    comment.as_ptr(),
                    &mut status,
                );
            },
            HeaderValue::Bool(b) => unsafe {
                // ffukyl = fits_update_key_log
                fitsio_sys::ffukyl(
                    fits_fptr.as_raw(),
                    key.as_ptr(),
                    c_int::from(*b),
                    comment.as_ptr(),
                    &mut status,
                );
            },
        }
        fitsio::errors::check_status(status)
            .map_err(|e| fitsio_error(fits_fptr, &hdu_description, e))?;
    }

    Ok(())
}

/// Append an empty binary table to the file. The column formats are given to
/// cfitsio verbatim.
#[track_caller]
pub(crate) fn fits_create_table(
    fits_fptr: &mut FitsFile,
    extname: &str,
    columns: &[NewColumn],
) -> Result<FitsHdu, FitsError> {
    let names = columns
        .iter()
        .map(|c| c_string(fits_fptr, extname, c.name))
        .collect::<Result<Vec<_>, _>>()?;
    let tforms = columns
        .iter()
        .map(|c| c_string(fits_fptr, extname, c.tform))
        .collect::<Result<Vec<_>, _>>()?;
    let extname_c = c_string(fits_fptr, extname, extname)?;
    let mut name_ptrs: Vec<*mut c_char> = names.iter().map(|s| s.as_ptr() as *mut _).collect();
    let mut tform_ptrs: Vec<*mut c_char> = tforms.iter().map(|s| s.as_ptr() as *mut _).collect();

    let mut status = 0;
    unsafe {
        // ffcrtb = fits_create_tbl
        fitsio_sys::ffcrtb(
            fits_fptr.as_raw(),
            BINARY_TBL,
            0,
            columns.len() as c_int,
            name_ptrs.as_mut_ptr(),
            tform_ptrs.as_mut_ptr(),
            ptr::null_mut(),
            extname_c.as_ptr(),
            &mut status,
        );
    }
    fitsio::errors::check_status(status).map_err(|e| fitsio_error(fits_fptr, extname, e))?;

    fits_open_hdu(fits_fptr, extname)
}

/// Write a column of data into a table HDU.
#[track_caller]
pub(crate) fn fits_write_col<T: fitsio::tables::WritesCol>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    name: &str,
    data: &[T],
) -> Result<(), FitsError> {
    hdu.write_col(fits_fptr, name, data)
        .map(|_| ())
        .map_err(|e| fitsio_error(fits_fptr, &format!("{}", hdu.number + 1), e))
}

/// Write the CHECKSUM and DATASUM keywords of every HDU in the file.
#[track_caller]
pub(crate) fn fits_write_checksums(fits_fptr: &mut FitsFile) -> Result<(), FitsError> {
    let mut status = 0;
    let mut num_hdus: c_int = 0;
    unsafe {
        // ffthdu = fits_get_num_hdus
        fitsio_sys::ffthdu(fits_fptr.as_raw(), &mut num_hdus, &mut status);
    }
    fitsio::errors::check_status(status).map_err(|e| fitsio_error(fits_fptr, "all", e))?;

    for i_hdu in 0..num_hdus as usize {
        fits_open_hdu(fits_fptr, i_hdu)?;
        unsafe {
            // ffpcks = fits_write_chksum
            fitsio_sys::ffpcks(fits_fptr.as_raw(), &mut status);
        }
        fitsio::errors::check_status(status)
            .map_err(|e| fitsio_error(fits_fptr, &format!("{}", i_hdu + 1), e))?;
    }

    Ok(())
}
