use std::fmt;

use meridian_proj::{Crs, ProjError};
use serde::Serialize;

/// Snapshot of everything the handle can report about a CRS.
#[derive(Debug, Clone, Serialize)]
pub struct CrsSummary {
    pub kind: String,
    pub name: Option<String>,
    pub definition: String,
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    pub eccentricity_squared: f64,
    pub sphere: bool,
    pub axes: String,
    pub prime_meridian: f64,
    pub horizontal_unit_to_metre: f64,
    pub vertical_unit_to_metre: f64,
}

impl CrsSummary {
    pub fn from_crs(crs: &Crs) -> Result<Self, ProjError> {
        let ellipsoid = crs.ellipsoid()?;
        Ok(Self {
            kind: crs.kind().to_string(),
            name: crs.name(),
            definition: crs.definition().to_string(),
            semi_major_axis: ellipsoid.semi_major_axis,
            semi_minor_axis: ellipsoid.semi_minor_axis(),
            eccentricity_squared: ellipsoid.eccentricity_squared,
            sphere: ellipsoid.is_sphere(),
            axes: crs.axis_direction_codes()?,
            prime_meridian: crs.prime_meridian()?,
            horizontal_unit_to_metre: crs.linear_unit_to_metre(false)?,
            vertical_unit_to_metre: crs.linear_unit_to_metre(true)?,
        })
    }
}

impl fmt::Display for CrsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Kind: {}", self.kind)?;
        if let Some(name) = &self.name {
            writeln!(f, "Name: {name}")?;
        }
        writeln!(f, "Definition: {}", self.definition)?;
        if self.sphere {
            writeln!(f, "Sphere: R={:.4}", self.semi_major_axis)?;
        } else {
            writeln!(
                f,
                "Ellipsoid: a={:.4} b={:.4} e2={:.12}",
                self.semi_major_axis, self.semi_minor_axis, self.eccentricity_squared
            )?;
        }
        writeln!(f, "Axes: {}", self.axes)?;
        writeln!(f, "Prime meridian: {:.9}", self.prime_meridian)?;
        write!(
            f,
            "Unit to metre: horizontal={} vertical={}",
            self.horizontal_unit_to_metre, self.vertical_unit_to_metre
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CrsSummary {
        CrsSummary {
            kind: "PROJECTED".to_string(),
            name: Some("WGS 84 / UTM zone 18N".to_string()),
            definition: "+proj=utm +zone=18 +datum=WGS84 +type=crs".to_string(),
            semi_major_axis: 6_378_137.0,
            semi_minor_axis: 6_356_752.314_245,
            eccentricity_squared: 0.006_694_379_990_14,
            sphere: false,
            axes: "en".to_string(),
            prime_meridian: 0.0,
            horizontal_unit_to_metre: 1.0,
            vertical_unit_to_metre: 1.0,
        }
    }

    #[test]
    fn text_output_lists_each_field() {
        let text = sample().to_string();
        assert!(text.starts_with("Kind: PROJECTED\n"));
        assert!(text.contains("Name: WGS 84 / UTM zone 18N"));
        assert!(text.contains("a=6378137.0000"));
        assert!(text.contains("Axes: en"));
        assert!(text.ends_with("horizontal=1 vertical=1"));
    }

    #[test]
    fn json_output_uses_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["kind"], "PROJECTED");
        assert_eq!(value["axes"], "en");
        assert_eq!(value["semi_major_axis"], 6_378_137.0);
    }

    #[test]
    fn summary_of_a_live_crs() {
        let crs = Crs::new("+proj=longlat +R=6371000").unwrap();
        let summary = CrsSummary::from_crs(&crs).unwrap();
        assert_eq!(summary.kind, "GEOGRAPHIC");
        assert_eq!(summary.axes, "en");
        assert!(summary.sphere);
        approx::assert_relative_eq!(summary.semi_minor_axis, summary.semi_major_axis);
        assert!(summary.to_string().contains("Sphere: R=6371000.0000"));
    }
}
