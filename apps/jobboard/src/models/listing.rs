use serde::{Deserialize, Deserializer, Serialize};

/// A single job posting as returned by the upstream listings API.
///
/// Field names on the wire follow the upstream schema. Listings are replaced
/// wholesale on every refetch and never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(
        rename = "candidate_required_location",
        default,
        deserialize_with = "null_as_default"
    )]
    pub required_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Missing and `null` text fields both decode as empty, so one sparse listing
/// does not fail the whole payload.
fn null_as_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope returned by the upstream API. Extra top-level keys are ignored.
#[derive(Debug, Deserialize)]
pub struct ListingPayload {
    pub jobs: Vec<Listing>,
}
