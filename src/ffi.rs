//! FFI bindings for Synheart Motion
//!
//! This module provides C-compatible functions for calling Motion from other languages.
//! String results are null-terminated and must be freed by the caller using
//! `motion_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::slice;

use crate::config::PipelineConfig;
use crate::counter::MotionCounter;
use crate::encoder::MotionReportEncoder;
use crate::error::MotionError;
use crate::pipeline::{MotionAnalyzer, SmoothedMotionPipeline};
use crate::recording::Recording;
use crate::types::Point3;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn analyze_to_report(
    recording_json: &str,
    config_json: &str,
    landmark: usize,
    smoothed: bool,
) -> Result<String, MotionError> {
    let recording = Recording::from_json(recording_json)?;
    let config = PipelineConfig::from_json(config_json)?;
    let encoder = MotionReportEncoder::new();

    if smoothed {
        let pipeline = SmoothedMotionPipeline::new(&config)?;
        encoder.encode_to_json(&pipeline, &recording, "ffi", &[landmark])
    } else {
        let counter = MotionCounter::new(config.threshold)?;
        encoder.encode_to_json(&counter, &recording, "ffi", &[landmark])
    }
}

// ============================================================================
// Analysis API
// ============================================================================

/// Analyze one landmark of a JSON recording and return a JSON report.
///
/// `config_json` is a pipeline configuration object; only its `threshold` is
/// used when `smoothed` is 0.
///
/// # Safety
/// - `recording_json` and `config_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `motion_free_string`.
/// - Returns NULL on error; call `motion_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn motion_analyze_json(
    recording_json: *const c_char,
    config_json: *const c_char,
    landmark: i32,
    smoothed: i32,
) -> *mut c_char {
    clear_last_error();

    let recording_str = match cstr_to_string(recording_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid recording string pointer");
            return ptr::null_mut();
        }
    };

    let config_str = match cstr_to_string(config_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid config string pointer");
            return ptr::null_mut();
        }
    };

    let landmark = match usize::try_from(landmark) {
        Ok(index) => index,
        Err(_) => {
            set_last_error("Landmark index must be non-negative");
            return ptr::null_mut();
        }
    };

    match analyze_to_report(&recording_str, &config_str, landmark, smoothed != 0) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Count motion over a packed `x, y, z` buffer of `frame_count` frames.
///
/// # Safety
/// - `xyz` must point to `frame_count * 3` readable doubles.
/// - `out_count` must be a valid writable pointer.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `motion_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn motion_count_points(
    xyz: *const f64,
    frame_count: usize,
    threshold: f64,
    out_count: *mut usize,
) -> i32 {
    clear_last_error();

    if xyz.is_null() || out_count.is_null() {
        set_last_error("Null buffer pointer");
        return -1;
    }

    let len = match frame_count.checked_mul(3) {
        Some(len) => len,
        None => {
            set_last_error("Frame count overflows the coordinate buffer length");
            return -1;
        }
    };

    let values = slice::from_raw_parts(xyz, len);
    let frames: Vec<Point3> = values
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect();

    match MotionCounter::new(threshold).and_then(|counter| counter.analyze(&frames)) {
        Ok(summary) => {
            *out_count = summary.motion_count;
            0
        }
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Motion functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Motion function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn motion_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Motion function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn motion_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Motion library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn motion_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
