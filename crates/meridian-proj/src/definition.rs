use std::borrow::Cow;

/// Make a PROJ.4-style string describe a CRS rather than a bare operation.
///
/// Modern PROJ only builds a CRS from `+proj=...` and `+init=...` strings
/// carrying `+type=crs`.
/// Pipelines, WKT, PROJJSON and `AUTH:CODE` definitions pass through untouched.
pub(crate) fn normalize(definition: &str) -> Cow<'_, str> {
    let trimmed = definition.trim();
    let mut tokens = trimmed.split_whitespace();
    let is_proj_string = tokens
        .clone()
        .any(|t| t.starts_with("+proj=") || t.starts_with("+init="));
    let is_pipeline = tokens.clone().any(|t| t == "+proj=pipeline");
    let has_type = tokens.any(|t| t.starts_with("+type="));
    if is_proj_string && !is_pipeline && !has_type {
        Cow::Owned(format!("{trimmed} +type=crs"))
    } else {
        Cow::Borrowed(trimmed)
    }
}
