use std::ffi::{CString, c_char, c_double, c_int};
use std::fmt;
use std::ptr::NonNull;

use crate::definition;
use crate::error::{ProjError, cstr_to_string, engine_fault, last_error_message};
use crate::kind::{AxisDirection, CrsKind};
use crate::sys;

const ERROR_BUF_LEN: usize = 512;
const MAX_AXES: usize = 8;

/// Sole owner of one native handle. Released exactly once, on drop.
struct RawCrs(NonNull<sys::PjCrs>);

impl Drop for RawCrs {
    fn drop(&mut self) {
        tracing::trace!("releasing PROJ CRS handle");
        // SAFETY: pointer came from an FFI constructor and is owned by this wrapper.
        unsafe { sys::pj_crs_destroy(self.0.as_ptr()) };
    }
}

/// A coordinate reference system backed by a PROJ object.
///
/// The handle is move-only: it cannot be cloned, and the native object is
/// released when the handle is dropped. Every handle carries its own PROJ
/// context, so it may be sent to another thread, but it is not `Sync`.
/// Operations that can fail record their diagnostics on the handle (see
/// [`last_error`](Self::last_error)), so shared use needs external locking.
pub struct Crs {
    raw: RawCrs,
    kind: CrsKind,
    definition: String,
}

// SAFETY: the native handle owns a private PROJ context and is never aliased,
// so moving it to another thread is sound. It is not `Sync`.
unsafe impl Send for Crs {}

/// Ellipsoid parameters of a CRS, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub semi_major_axis: f64,
    pub eccentricity_squared: f64,
}

impl Ellipsoid {
    /// `a * sqrt(1 - e²)`.
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity_squared).sqrt()
    }

    pub fn is_sphere(&self) -> bool {
        self.eccentricity_squared.abs() < f64::EPSILON
    }
}

impl Crs {
    /// Build a CRS from anything PROJ accepts: a PROJ string, `AUTH:CODE`,
    /// WKT or PROJJSON.
    ///
    /// PROJ strings without `+type=crs` are treated as CRS definitions, as the
    /// classic PROJ.4 API did.
    pub fn new(definition: &str) -> Result<Self, ProjError> {
        let invalid = |reason: String| ProjError::InvalidDefinition {
            definition: definition.to_string(),
            reason,
        };

        if definition.trim().is_empty() {
            return Err(invalid("definition is empty".to_string()));
        }
        let normalized = definition::normalize(definition);
        let c_def = CString::new(normalized.as_ref()).map_err(|e| invalid(e.to_string()))?;

        let mut err: [c_char; ERROR_BUF_LEN] = [0; ERROR_BUF_LEN];
        // SAFETY: `c_def` is NUL-terminated; `err` is writable for its full length.
        // Returns an owned handle or null.
        let ptr = unsafe { sys::pj_crs_create(c_def.as_ptr(), err.as_mut_ptr(), err.len()) };
        let Some(ptr) = NonNull::new(ptr) else {
            let reason = cstr_to_string(err.as_ptr())
                .unwrap_or_else(|| "definition rejected by PROJ".to_string());
            return Err(invalid(reason));
        };

        let crs = Self::from_raw(RawCrs(ptr)).map_err(|r| invalid(r.to_string()))?;
        tracing::debug!(kind = %crs.kind, definition = %crs.definition, "created CRS");
        Ok(crs)
    }

    /// Derive a new CRS of `kind` from this one.
    ///
    /// Only [`CrsKind::Geographic`] is supported: it yields the longitude/latitude
    /// CRS on the datum of this one, whatever its kind (a geographic CRS yields
    /// a copy). A datum shift to a hub (`+towgs84`, `+nadgrids`) and the prime
    /// meridian carry over. Any other kind is rejected before PROJ is consulted.
    pub fn derive(&self, kind: CrsKind) -> Result<Self, ProjError> {
        if kind != CrsKind::Geographic {
            return Err(ProjError::InvalidDerivation(format!(
                "only GEOGRAPHIC CRSs can be derived, not {kind}"
            )));
        }

        // SAFETY: `self.raw` is valid for the life of `self`. Returns an owned handle or null.
        let ptr = unsafe { sys::pj_crs_create_geographic(self.as_ptr()) };
        let raw = NonNull::new(ptr).map(RawCrs).ok_or_else(|| {
            ProjError::InvalidDerivation(
                self.last_error()
                    .unwrap_or_else(|| "PROJ could not derive the geographic CRS".to_string()),
            )
        })?;

        let derived =
            Self::from_raw(raw).map_err(|r| ProjError::InvalidDerivation(r.to_string()))?;
        if derived.kind != CrsKind::Geographic {
            return Err(ProjError::InvalidDerivation(format!(
                "the geodetic base of this {} CRS is {}, not GEOGRAPHIC",
                self.kind, derived.kind
            )));
        }
        tracing::debug!(definition = %derived.definition, "derived geographic CRS");
        Ok(derived)
    }

    /// Shorthand for `derive(CrsKind::Geographic)`.
    pub fn geographic(&self) -> Result<Self, ProjError> {
        self.derive(CrsKind::Geographic)
    }

    /// Finish construction. On rejection the handle is released.
    fn from_raw(raw: RawCrs) -> Result<Self, Rejection> {
        let ptr = raw.0.as_ptr();
        // SAFETY: `raw` owns a live handle; the definition string is owned by it.
        let (kind, definition) = unsafe {
            (
                sys::pj_crs_kind(ptr),
                cstr_to_string(sys::pj_crs_definition(ptr)),
            )
        };
        let (kind, definition) = accept(kind, definition)?;
        Ok(Self { raw, kind, definition })
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::PjCrs {
        self.raw.0.as_ptr()
    }

    pub fn kind(&self) -> CrsKind {
        self.kind
    }

    /// Expanded definition: a PROJ string when the CRS was built from one,
    /// WKT2 otherwise. Always accepted by [`Crs::new`].
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Human-readable CRS name, e.g. `WGS 84 / UTM zone 18N`.
    pub fn name(&self) -> Option<String> {
        // SAFETY: string is owned by the live handle and copied immediately.
        cstr_to_string(unsafe { sys::pj_crs_name(self.as_ptr()) })
    }

    pub fn to_wkt(&self) -> Result<String, ProjError> {
        // SAFETY: `self.raw` is valid; the returned string is copied before the next call.
        let ptr = unsafe { sys::pj_crs_wkt(self.as_ptr()) };
        cstr_to_string(ptr).ok_or_else(|| engine_fault(self.as_ptr(), "WKT export"))
    }

    pub fn ellipsoid(&self) -> Result<Ellipsoid, ProjError> {
        let mut a: c_double = 0.0;
        let mut es: c_double = 0.0;
        // SAFETY: out-pointers reference live locals.
        let ok = unsafe { sys::pj_crs_ellipsoid(self.as_ptr(), &mut a, &mut es) };
        if ok == 0 {
            return Err(engine_fault(self.as_ptr(), "ellipsoid query"));
        }
        Ok(Ellipsoid {
            semi_major_axis: a,
            eccentricity_squared: es,
        })
    }

    pub fn semi_major_axis(&self) -> Result<f64, ProjError> {
        self.ellipsoid().map(|e| e.semi_major_axis)
    }

    pub fn semi_minor_axis(&self) -> Result<f64, ProjError> {
        self.ellipsoid().map(|e| e.semi_minor_axis())
    }

    /// `1 - (b/a)²`; zero for a sphere.
    pub fn eccentricity_squared(&self) -> Result<f64, ProjError> {
        self.ellipsoid().map(|e| e.eccentricity_squared)
    }

    /// Axis codes with the unit-to-metre factor of each axis, in axis order.
    fn axes(&self) -> Result<Vec<(char, f64)>, ProjError> {
        let mut codes: [c_char; MAX_AXES] = [0; MAX_AXES];
        let mut factors: [c_double; MAX_AXES] = [1.0; MAX_AXES];
        // SAFETY: both arrays are writable for `MAX_AXES` elements.
        let n = unsafe {
            sys::pj_crs_axes(
                self.as_ptr(),
                codes.as_mut_ptr(),
                factors.as_mut_ptr(),
                MAX_AXES as c_int,
            )
        };
        if n < 0 {
            return Err(engine_fault(self.as_ptr(), "axis query"));
        }
        let n = (n as usize).min(MAX_AXES);
        Ok(codes[..n]
            .iter()
            .zip(&factors[..n])
            .map(|(&c, &f)| (c as u8 as char, f))
            .collect())
    }

    /// One letter per axis, in axis order (`e`, `n`, `u`, ...).
    pub fn axis_direction_codes(&self) -> Result<String, ProjError> {
        Ok(self.axes()?.into_iter().map(|(code, _)| code).collect())
    }

    pub fn axis_directions(&self) -> Result<Vec<AxisDirection>, ProjError> {
        Ok(self
            .axis_direction_codes()?
            .chars()
            .map(AxisDirection::from_code)
            .collect())
    }

    /// Number of axes.
    pub fn dimension(&self) -> Result<usize, ProjError> {
        self.axis_direction_codes().map(|codes| codes.len())
    }

    /// Prime meridian longitude east of Greenwich, in degrees.
    pub fn prime_meridian(&self) -> Result<f64, ProjError> {
        let mut degrees: c_double = 0.0;
        // SAFETY: out-pointer references a live local.
        let ok = unsafe { sys::pj_crs_prime_meridian(self.as_ptr(), &mut degrees) };
        if ok == 0 {
            return Err(engine_fault(self.as_ptr(), "prime meridian query"));
        }
        Ok(degrees)
    }

    /// Factor converting the linear unit of the horizontal (or, with
    /// `vertical`, the vertical) axes to metres.
    ///
    /// Without an up/down axis the vertical factor is the horizontal one.
    /// Geographic horizontal axes are angular, so their factor is 1.0.
    pub fn linear_unit_to_metre(&self, vertical: bool) -> Result<f64, ProjError> {
        let axes: Vec<(AxisDirection, f64)> = self
            .axes()?
            .into_iter()
            .map(|(code, factor)| (AxisDirection::from_code(code), factor))
            .collect();
        Ok(unit_factor(self.kind, &axes, vertical))
    }

    /// Most recent PROJ error recorded on this handle.
    pub fn last_error(&self) -> Option<String> {
        last_error_message(self.as_ptr())
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} CRS: {}", self.kind, self.definition)
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crs")
            .field("kind", &self.kind)
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Why a native object was not accepted as a [`Crs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    UnsupportedKind,
    NoDefinition,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedKind => f.write_str("not a geographic, geocentric or projected CRS"),
            Self::NoDefinition => f.write_str("PROJ could not export a definition for the CRS"),
        }
    }
}

fn accept(kind: c_int, definition: Option<String>) -> Result<(CrsKind, String), Rejection> {
    let kind = CrsKind::from_raw(kind).ok_or(Rejection::UnsupportedKind)?;
    let definition = definition.ok_or(Rejection::NoDefinition)?;
    Ok((kind, definition))
}

fn unit_factor(kind: CrsKind, axes: &[(AxisDirection, f64)], vertical: bool) -> f64 {
    let horizontal = match kind {
        CrsKind::Geographic => None,
        CrsKind::Geocentric | CrsKind::Projected => axes
            .iter()
            .find(|(direction, _)| !direction.is_vertical())
            .map(|&(_, factor)| factor),
    };
    let chosen = if vertical {
        axes.iter()
            .find(|(direction, _)| direction.is_vertical())
            .map(|&(_, factor)| factor)
            .or(horizontal)
    } else {
        horizontal
    };
    chosen.unwrap_or(1.0)
}

/// Release string of the linked PROJ library, e.g. `9.4.0`.
pub fn proj_version() -> String {
    // SAFETY: PROJ returns a static NUL-terminated string.
    cstr_to_string(unsafe { sys::pj_capi_version() }).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Resolves to two impls, and so fails to compile, if `Crs: Clone`.
    trait AmbiguousIfClone<A> {
        fn check() {}
    }
    impl<T: ?Sized> AmbiguousIfClone<()> for T {}
    #[allow(dead_code)]
    struct IsClone;
    impl<T: ?Sized + Clone> AmbiguousIfClone<IsClone> for T {}

    #[test]
    fn handle_cannot_be_duplicated() {
        <Crs as AmbiguousIfClone<_>>::check();
    }

    #[test]
    fn handle_can_move_between_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<Crs>();
    }

    const US_FOOT: f64 = 0.304_800_609_601_219;

    #[test]
    fn unsupported_kind_and_missing_definition_are_told_apart() {
        let def = || Some("+proj=longlat +type=crs".to_string());
        assert_eq!(accept(-1, def()), Err(Rejection::UnsupportedKind));
        assert_eq!(accept(sys::PJ_CRS_KIND_GEOGRAPHIC, None), Err(Rejection::NoDefinition));
        assert_ne!(
            Rejection::UnsupportedKind.to_string(),
            Rejection::NoDefinition.to_string()
        );
        let (kind, text) = accept(sys::PJ_CRS_KIND_PROJECTED, def()).unwrap();
        assert_eq!(kind, CrsKind::Projected);
        assert_eq!(text, "+proj=longlat +type=crs");
    }

    #[test]
    fn vertical_factor_falls_back_to_horizontal() {
        let axes = [(AxisDirection::East, US_FOOT), (AxisDirection::North, US_FOOT)];
        assert_eq!(unit_factor(CrsKind::Projected, &axes, false), US_FOOT);
        assert_eq!(unit_factor(CrsKind::Projected, &axes, true), US_FOOT);
    }

    #[test]
    fn vertical_axis_has_its_own_factor() {
        let axes = [
            (AxisDirection::East, 1.0),
            (AxisDirection::North, 1.0),
            (AxisDirection::Up, US_FOOT),
        ];
        assert_eq!(unit_factor(CrsKind::Projected, &axes, false), 1.0);
        assert_eq!(unit_factor(CrsKind::Projected, &axes, true), US_FOOT);
    }

    #[test]
    fn geographic_axes_are_angular() {
        let radians_per_degree = std::f64::consts::PI / 180.0;
        let axes = [
            (AxisDirection::East, radians_per_degree),
            (AxisDirection::North, radians_per_degree),
        ];
        assert_eq!(unit_factor(CrsKind::Geographic, &axes, false), 1.0);
        assert_eq!(unit_factor(CrsKind::Geographic, &axes, true), 1.0);

        let with_height = [
            (AxisDirection::East, radians_per_degree),
            (AxisDirection::North, radians_per_degree),
            (AxisDirection::Up, 1.0),
        ];
        assert_eq!(unit_factor(CrsKind::Geographic, &with_height, true), 1.0);
    }

    #[test]
    fn sphere_has_equal_axes() {
        let sphere = Ellipsoid {
            semi_major_axis: 6_371_000.0,
            eccentricity_squared: 0.0,
        };
        assert!(sphere.is_sphere());
        assert_eq!(sphere.semi_minor_axis(), sphere.semi_major_axis);
    }

    #[test]
    fn semi_minor_axis_follows_eccentricity() {
        let wgs84 = Ellipsoid {
            semi_major_axis: 6_378_137.0,
            eccentricity_squared: 0.006_694_379_990_141_317,
        };
        approx::assert_relative_eq!(wgs84.semi_minor_axis(), 6_356_752.314_245, epsilon = 1e-3);
        assert!(!wgs84.is_sphere());
    }
}
