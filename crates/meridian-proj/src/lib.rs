//! PROJ integration crate for Meridian.
//!
//! This crate provides a safe, move-only handle over a PROJ coordinate
//! reference system, built on a thin C ABI layer (`csrc/pj_capi.c`) on top of
//! PROJ's C API, plus batched in-place coordinate transforms between handles.
#![allow(unsafe_code)]
// FFI wrappers necessarily use unsafe externs and raw pointers.

mod crs;
mod definition;
mod error;
mod kind;
mod sys;
mod transform;

pub use crs::{Crs, Ellipsoid, proj_version};
pub use error::ProjError;
pub use kind::{AxisDirection, CrsKind};
pub use transform::{MAX_DIMENSION, MIN_DIMENSION, TupleLayout};
