use std::ffi::CStr;

use crate::sys;

#[derive(Debug, thiserror::Error)]
pub enum ProjError {
    #[error("invalid CRS definition `{definition}`: {reason}")]
    InvalidDefinition { definition: String, reason: String },
    #[error("invalid derivation: {0}")]
    InvalidDerivation(String),
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(String),
    #[error("transform failed: {0}")]
    Transform(String),
    #[error("PROJ engine fault: {0}")]
    EngineFault(String),
}

/// Last error recorded on a native handle, if any.
pub(crate) fn last_error_message(crs: *const sys::PjCrs) -> Option<String> {
    // SAFETY: callers pass a live handle; FFI returns null or a NUL-terminated
    // string owned by that handle.
    let ptr = unsafe { sys::pj_crs_last_error(crs) };
    cstr_to_string(ptr)
}

pub(crate) fn engine_fault(crs: *const sys::PjCrs, what: &str) -> ProjError {
    let detail = last_error_message(crs).unwrap_or_else(|| "unknown PROJ error".to_string());
    ProjError::EngineFault(format!("{what}: {detail}"))
}

pub(crate) fn cstr_to_string(ptr: *const std::ffi::c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: FFI contract returns valid NUL-terminated strings.
    let s = unsafe { CStr::from_ptr(ptr) }.to_string_lossy();
    if s.is_empty() { None } else { Some(s.into_owned()) }
}
