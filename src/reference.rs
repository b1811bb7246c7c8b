//! Static reference data: neighborhood text and curated label coordinates.
//!
//! These are fixed properties of the 32 NYC school districts, kept as
//! explicit tables rather than scattered through the transformation code.

/// Neighborhoods served by each district, indexed by district number - 1.
pub const NEIGHBORHOODS: [&str; 32] = [
    "East Village, Lower East Side",
    "Financial District, Tribeca, West Village, Clinton, Midtown, Gramercy, Upper East Side",
    "Lincoln Square, Upper West Side",
    "East Harlem, Randall's Island",
    "Central Harlem, Morningside Heights",
    "Inwood, Washington Heights",
    "Mott Haven, Port Morris",
    "Country Club, Edgewater Park, Soundview, Hunts Point",
    "Morris Heights, Mount Eden",
    "Riverdale, Bedford Park, Norwood",
    "Wakefield, Co-op City, Pelham Parkway",
    "East Tremont, Claremont Village",
    "Brooklyn Heights, Fort Greene, Clinton Hill",
    "Greenpoint, Williamsburg",
    "Sunset Park, Cobble Hill",
    "Bedford Stuyvesant, Weeksville",
    "Prospect Park, Wingate",
    "Canarsie, East Flatbush",
    "Cypress Hills, East New York, Starrett City",
    "Bay Ridge, Fort Hamilton, Dyker Heights",
    "Coney Island, Sheepshead Bay, Gravesend, Ocean Parkway",
    "Marine Park, Georgetown, Flatlands",
    "Brownsville, Ocean Hill",
    "Glendale, Ridgewood, Maspeth, Jackson Heights, Sunnyside",
    "College Point, Whitestone, Hillcrest",
    "Floral Park, Little Neck, Bayside, Fresh Meadows",
    "Richmond Hill, Woodhaven, Howard Beach, South Ozone Park",
    "Rego Park, Forest Hills, Kew Gardens",
    "Rosedale, Saint Albans, Cambria Heights, Queens Village",
    "Hunters Point, Long Island City, Astoria, Steinway",
    "Staten Island",
    "Bushwick",
];

/// Neighborhood text for a district, if the district number is in range.
pub fn neighborhoods(district_id: u8) -> Option<&'static str> {
    if (1..=32).contains(&district_id) {
        Some(NEIGHBORHOODS[usize::from(district_id) - 1])
    } else {
        None
    }
}

/// Hand-picked (lon, lat) label positions for districts whose centroid lands
/// somewhere illegible (inside a hole, or off the visible shape).
pub fn label_override(district_id: u8) -> Option<(f64, f64)> {
    match district_id {
        4 => Some((-73.938, 40.7925)),
        13 => Some((-73.969759, 40.687)),
        15 => Some((-73.991, 40.663772)),
        27 => Some((-73.797, 40.655)),
        _ => None,
    }
}
