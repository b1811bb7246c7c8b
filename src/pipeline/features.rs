//! GeoJSON serialization of district boundaries for mapping collaborators.

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};

use crate::models::DistrictGeometry;

/// Assemble the cleaned boundaries into a feature collection, one feature
/// per district with a `SchoolDist` property carrying the district id.
pub fn feature_collection(geometries: &[DistrictGeometry]) -> FeatureCollection {
    let features = geometries
        .iter()
        .map(|district| {
            let mut properties = JsonObject::new();
            properties.insert(
                "SchoolDist".to_string(),
                serde_json::Value::from(district.district_id),
            );

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&district.geometry))),
                id: Some(Id::Number(district.district_id.into())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
