use std::ffi::{c_char, c_double, c_int};

#[repr(C)]
pub struct PjCrs {
    _private: [u8; 0],
}

pub const PJ_CRS_KIND_GEOGRAPHIC: c_int = 0;
pub const PJ_CRS_KIND_GEOCENTRIC: c_int = 1;
pub const PJ_CRS_KIND_PROJECTED: c_int = 2;

unsafe extern "C" {
    pub fn pj_capi_version() -> *const c_char;

    pub fn pj_crs_create(definition: *const c_char, err: *mut c_char, err_len: usize)
    -> *mut PjCrs;
    pub fn pj_crs_create_geographic(src: *mut PjCrs) -> *mut PjCrs;
    pub fn pj_crs_destroy(crs: *mut PjCrs);

    pub fn pj_crs_kind(crs: *const PjCrs) -> c_int;
    pub fn pj_crs_definition(crs: *const PjCrs) -> *const c_char;
    pub fn pj_crs_name(crs: *const PjCrs) -> *const c_char;
    pub fn pj_crs_wkt(crs: *mut PjCrs) -> *const c_char;

    pub fn pj_crs_ellipsoid(
        crs: *mut PjCrs,
        semi_major: *mut c_double,
        eccentricity_squared: *mut c_double,
    ) -> c_int;
    pub fn pj_crs_axes(
        crs: *mut PjCrs,
        codes: *mut c_char,
        unit_to_metre: *mut c_double,
        cap: c_int,
    ) -> c_int;
    pub fn pj_crs_prime_meridian(crs: *mut PjCrs, degrees: *mut c_double) -> c_int;

    pub fn pj_crs_transform(
        src: *mut PjCrs,
        dst: *mut PjCrs,
        dimension: c_int,
        coords: *mut c_double,
        count: usize,
    ) -> c_int;

    pub fn pj_crs_last_error(crs: *const PjCrs) -> *const c_char;
}
