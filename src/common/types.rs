use serde::Deserialize;

/// One result record from the geocoding service.
///
/// The service does not guarantee any of these keys, so every field is
/// optional and a missing key simply deserializes to `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
}

impl Candidate {
    /// Look up a response key by its name in the service's JSON.
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "class" => self.class.as_deref(),
            "type" => self.kind.as_deref(),
            "display_name" => self.display_name.as_deref(),
            "lat" => self.lat.as_deref(),
            "lon" => self.lon.as_deref(),
            _ => None,
        }
    }
}

/// An accepted candidate bound to the query variant that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoMatch {
    pub object_name: String,
    pub latitude: String,
    pub longitude: String,
    pub search_query: String,
}

impl GeoMatch {
    /// Fill every output field from its mapped response key, or from the
    /// query for `SearchQuery`. `None` if the candidate lacks any mapped key.
    pub fn from_candidate(candidate: &Candidate, search_query: &str) -> Option<Self> {
        let value = |field: OutputField| match field.response_field() {
            Some(key) => candidate.field(key).map(str::to_string),
            None => Some(search_query.to_string()),
        };
        Some(Self {
            object_name: value(OutputField::ObjectName)?,
            latitude: value(OutputField::Latitude)?,
            longitude: value(OutputField::Longitude)?,
            search_query: value(OutputField::SearchQuery)?,
        })
    }
}

/// Output columns added to the table, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputField {
    ObjectName,
    Latitude,
    Longitude,
    SearchQuery,
}

pub const OUTPUT_FIELDS: [OutputField; 4] = [
    OutputField::ObjectName,
    OutputField::Latitude,
    OutputField::Longitude,
    OutputField::SearchQuery,
];

impl OutputField {
    /// Column header written to the result table.
    pub fn column_name(&self) -> &'static str {
        match self {
            OutputField::ObjectName => "Object_name",
            OutputField::Latitude => "Latitude",
            OutputField::Longitude => "Longitude",
            OutputField::SearchQuery => "Search_query",
        }
    }

    /// Key in the service response the column is filled from.
    /// `SearchQuery` comes from the matched variant, not the response.
    pub fn response_field(&self) -> Option<&'static str> {
        match self {
            OutputField::ObjectName => Some("display_name"),
            OutputField::Latitude => Some("lat"),
            OutputField::Longitude => Some("lon"),
            OutputField::SearchQuery => None,
        }
    }

    pub fn value<'a>(&self, geo_match: &'a GeoMatch) -> &'a str {
        match self {
            OutputField::ObjectName => &geo_match.object_name,
            OutputField::Latitude => &geo_match.latitude,
            OutputField::Longitude => &geo_match.longitude,
            OutputField::SearchQuery => &geo_match.search_query,
        }
    }
}
