// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions for reading FITS files.

mod error;

pub(crate) use error::FitsError;

use std::{
    ffi::{CStr, CString},
    fmt::Display,
    os::raw::{c_char, c_int},
    ptr,
};

use fitsio::{hdu::*, FitsFile};

use crate::io::{HeaderCard, HeaderValue};

/// cfitsio's maximum lengths (including the NUL) of a keyword, a value and a
/// comment.
const FLEN_KEYWORD: usize = 75;
const FLEN_VALUE: usize = 71;
const FLEN_COMMENT: usize = 73;

/// Keywords that are not "key = value" cards.
const COMMENTARY_KEYWORDS: [&str; 4] = ["", "COMMENT", "HISTORY", "CONTINUE"];

/// Open a fits file.
#[track_caller]
pub(crate) fn fits_open<P: AsRef<std::path::Path>>(file: P) -> Result<FitsFile, FitsError> {
    FitsFile::open(file.as_ref()).map_err(|e| {
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

/// Open a fits file's HDU.
#[track_caller]
pub(crate) fn fits_open_hdu<T: DescribesHdu + Display + Copy>(
    fits_fptr: &mut FitsFile,
    hdu_description: T,
) -> Result<FitsHdu, FitsError> {
    fits_fptr.hdu(hdu_description).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Fitsio {
            fits_error: Box::new(e),
            fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
            hdu_description: format!("{hdu_description}").into_boxed_str(),
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }
    })
}

/// Get a column from a fits file's HDU.
#[track_caller]
pub(crate) fn fits_get_col<T: fitsio::tables::ReadsCol>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    keyword: &str,
) -> Result<Vec<T>, FitsError> {
    hdu.read_col(fits_fptr, keyword).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Fitsio {
            fits_error: Box::new(e),
            fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
            hdu_description: format!("{}", hdu.number + 1).into_boxed_str(),
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }
    })
}

/// Get the names of the columns and the number of rows of a table HDU.
#[track_caller]
pub(crate) fn fits_get_table_shape(
    fits_fptr: &FitsFile,
    hdu: &FitsHdu,
) -> Result<(Vec<String>, usize), FitsError> {
    match &hdu.info {
        HduInfo::TableInfo {
            column_descriptions,
            num_rows,
        } => Ok((
            column_descriptions.iter().map(|c| c.name.clone()).collect(),
            *num_rows,
        )),
        _ => {
            let caller = std::panic::Location::caller();
            Err(FitsError::NotTable {
                fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
                hdu_num: hdu.number + 1,
                source_file: caller.file(),
                source_line: caller.line(),
                source_column: caller.column(),
            })
        }
    }
}

/// Given a FITS file pointer, and a keyword to a long string keyword that may
/// or may not exist, pull out the long string of the keyword. This deals with
/// FITSs CONTINUE mechanism by calling a low level fits function.
#[track_caller]
pub(crate) fn fits_get_optional_key_long_string(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    keyword: &str,
) -> Result<Option<String>, FitsError> {
    let caller = std::panic::Location::caller();
    let fits_filename = fits_fptr.file_path().to_path_buf();
    let long_string_error = || FitsError::LongString {
        key: keyword.to_string().into_boxed_str(),
        fits_filename: fits_filename.clone().into_boxed_path(),
        hdu_num: hdu.number + 1,
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    };

    let keyword_ffi = CString::new(keyword).map_err(|_| long_string_error())?;
    let mut status = 0;
    let mut long_string_ptr = ptr::null_mut();
    unsafe {
        // ffgkls = fits_read_key_longstr
        fitsio_sys::ffgkls(
            fits_fptr.as_raw(),
            keyword_ffi.as_ptr(),
            &mut long_string_ptr,
            ptr::null_mut(),
            &mut status,
        );
    }
    match status {
        0 => {
            let long_string = unsafe { CStr::from_ptr(long_string_ptr) }
                .to_str()
                .map(|s| s.to_string());
            // Free the cfitsio-allocated string. The status code passed
            // isn't useful.
            // fffree = fits_free_memory
            unsafe {
                fitsio_sys::fffree(long_string_ptr.cast(), &mut 0);
            }
            long_string.map(Some).map_err(|_| long_string_error())
        }
        202 | 204 => Ok(None),
        _ => Err(long_string_error()),
    }
}

/// Read every "key = value" card of a HDU, in order. Commentary cards
/// (COMMENT, HISTORY, blank) are skipped, and long strings spread over
/// CONTINUE cards are joined.
#[track_caller]
pub(crate) fn fits_read_header_cards(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
) -> Result<Vec<HeaderCard>, FitsError> {
    let caller = std::panic::Location::caller();
    let fitsio_error = |fptr: &FitsFile, e: fitsio::errors::Error| FitsError::Fitsio {
        fits_error: Box::new(e),
        fits_filename: fptr.file_path().to_path_buf().into_boxed_path(),
        hdu_description: format!("{}", hdu.number + 1).into_boxed_str(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    };

    // Make sure cfitsio is looking at the right HDU.
    if let Err(e) = fits_fptr.hdu(hdu.number) {
        return Err(fitsio_error(fits_fptr, e));
    }

    let mut status = 0;
    let mut num_cards: c_int = 0;
    unsafe {
        // ffghsp = fits_get_hdrspace
        fitsio_sys::ffghsp(
            fits_fptr.as_raw(),
            &mut num_cards,
            ptr::null_mut(),
            &mut status,
        );
    }
    fitsio::errors::check_status(status).map_err(|e| fitsio_error(fits_fptr, e))?;

    let mut cards = Vec::with_capacity(num_cards as usize);
    for i_card in 1..=num_cards {
        let mut keyword = [0 as c_char; FLEN_KEYWORD];
        let mut value = [0 as c_char; FLEN_VALUE];
        let mut comment = [0 as c_char; FLEN_COMMENT];
        unsafe {
            // ffgkyn = fits_read_keyn
            fitsio_sys::ffgkyn(
                fits_fptr.as_raw(),
                i_card,
                keyword.as_mut_ptr(),
                value.as_mut_ptr(),
                comment.as_mut_ptr(),
                &mut status,
            );
        }
        fitsio::errors::check_status(status).map_err(|e| fitsio_error(fits_fptr, e))?;

        let (keyword, value, comment) = unsafe {
            (
                CStr::from_ptr(keyword.as_ptr()).to_string_lossy().into_owned(),
                CStr::from_ptr(value.as_ptr()).to_string_lossy().into_owned(),
                CStr::from_ptr(comment.as_ptr())
                    .to_string_lossy()
                    .into_owned(),
            )
        };
        if COMMENTARY_KEYWORDS.contains(&keyword.as_str()) || value.trim().is_empty() {
            continue;
        }

        let mut value = HeaderValue::parse_raw(&value);
        if let HeaderValue::Str(s) = &value {
            if s.ends_with('&') {
                if let Some(long_string) =
                    fits_get_optional_key_long_string(fits_fptr, hdu, &keyword)?
                {
                    value = HeaderValue::Str(long_string);
                }
            }
        }
        cards.push(HeaderCard {
            key: keyword,
            value,
            comment,
        });
    }

    Ok(cards)
}
