//! Batched, in-place coordinate conversion between two CRSs.
//!
//! Coordinates live in a flat `f64` buffer as consecutive tuples of
//! `dimension` components. PROJ converts the first two components of each
//! tuple, plus the third when `dimension >= 3`. Any further components are
//! never read or written.
//!
//! A failed batch leaves the tuples that PROJ already visited in an
//! unspecified state. Nothing outside `offset..offset + dimension * num_pts`
//! is touched, and bounds violations are reported before anything is.

use std::ffi::c_int;

use crate::crs::Crs;
use crate::error::ProjError;
use crate::sys;

/// Smallest accepted tuple size.
pub const MIN_DIMENSION: usize = 2;
/// Largest accepted tuple size.
pub const MAX_DIMENSION: usize = 100;

/// Where the tuples sit inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupleLayout {
    pub dimension: usize,
    pub offset: usize,
    pub num_pts: usize,
}

impl TupleLayout {
    pub fn new(dimension: usize, offset: usize, num_pts: usize) -> Self {
        Self {
            dimension,
            offset,
            num_pts,
        }
    }

    /// Check the layout against a buffer of `len` values and return the index
    /// one past the last touched value.
    pub fn validate(&self, len: usize) -> Result<usize, ProjError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&self.dimension) {
            return Err(ProjError::IndexOutOfBounds(format!(
                "dimension {} outside [{MIN_DIMENSION}, {MAX_DIMENSION}]",
                self.dimension
            )));
        }

        let end = self
            .dimension
            .checked_mul(self.num_pts)
            .and_then(|n| n.checked_add(self.offset))
            .ok_or_else(|| {
                ProjError::IndexOutOfBounds(format!(
                    "{} points of dimension {} at offset {} overflow",
                    self.num_pts, self.dimension, self.offset
                ))
            })?;

        if end > len {
            return Err(ProjError::IndexOutOfBounds(format!(
                "{} points of dimension {} at offset {} need {end} values, buffer holds {len}",
                self.num_pts, self.dimension, self.offset
            )));
        }
        Ok(end)
    }
}

impl Crs {
    /// Convert `num_pts` tuples of `dimension` values, starting at `offset`,
    /// from this CRS to `target`, in place.
    ///
    /// Geographic axes are in decimal degrees and other axes in the CRS's own
    /// linear unit (see [`Crs::linear_unit_to_metre`]). Axis order is the
    /// CRS's declared order (see [`Crs::axis_directions`]).
    pub fn transform(
        &self,
        target: &Crs,
        dimension: usize,
        coords: &mut [f64],
        offset: usize,
        num_pts: usize,
    ) -> Result<(), ProjError> {
        let layout = TupleLayout::new(dimension, offset, num_pts);
        let end = layout.validate(coords.len())?;
        if num_pts == 0 {
            return Ok(());
        }

        let tuples = &mut coords[offset..end];
        // SAFETY: both handles are live for the call; `tuples` holds exactly
        // `dimension * num_pts` contiguous f64 values, checked above, and
        // `dimension` fits in c_int because it is at most MAX_DIMENSION.
        let rc = unsafe {
            sys::pj_crs_transform(
                self.as_ptr(),
                target.as_ptr(),
                dimension as c_int,
                tuples.as_mut_ptr(),
                num_pts,
            )
        };

        if rc != 0 {
            let message = self
                .last_error()
                .unwrap_or_else(|| format!("PROJ error {rc}"));
            tracing::warn!(
                source = %self.definition(),
                target = %target.definition(),
                num_pts,
                "coordinate transform failed: {message}"
            );
            return Err(ProjError::Transform(message));
        }
        Ok(())
    }

    /// Convert fixed-size tuples in place. `N` must be in [2, 100].
    pub fn transform_tuples<const N: usize>(
        &self,
        target: &Crs,
        tuples: &mut [[f64; N]],
    ) -> Result<(), ProjError> {
        let num_pts = tuples.len();
        self.transform(target, N, tuples.as_flattened_mut(), 0, num_pts)
    }
}
