use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Payload of `GET /view/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub name: String,
    pub career: Career,
    pub movies: Movies,
    /// Pet kind → image URL, in the order the server listed them
    #[serde(default, deserialize_with = "pets_in_order", serialize_with = "pets_as_map")]
    pub pets: Vec<PetImage>,
    pub max_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Career {
    pub desired: String,
    pub suitability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movies {
    /// Recommended for the chosen career
    pub job: Movie,
    /// Recommended from the questionnaire responses
    pub psych: Movie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "Title", alias = "title")]
    pub title: String,
    #[serde(rename = "Year", alias = "year", deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(rename = "Plot", alias = "plot", default)]
    pub plot: String,
    #[serde(rename = "Rated", alias = "rating", alias = "rated", default)]
    pub rating: String,
    #[serde(rename = "local_poster", alias = "poster", default)]
    pub poster_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suitability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetImage {
    pub kind: String,
    pub url: String,
}

fn pets_in_order<'de, D>(deserializer: D) -> Result<Vec<PetImage>, D::Error>
where
    D: Deserializer<'de>,
{
    let map: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(kind, url)| PetImage {
            kind,
            url: match url {
                Value::String(s) => s,
                other => other.to_string(),
            },
        })
        .collect())
}

fn pets_as_map<S>(pets: &[PetImage], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(pets.len()))?;
    for pet in pets {
        map.serialize_entry(&pet.kind, &pet.url)?;
    }
    map.end()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Display label for the career keys the questionnaire offers.
pub fn job_label(key: &str) -> &str {
    match key {
        "ceo" => "CEO of a large mega-corporation",
        "astronaut" => "Astronaut",
        "doctor" => "Medical doctor",
        "model" => "Fashion model",
        "rockstar" => "Rock star",
        "garbage" => "Refuse collection operative",
        other => other,
    }
}

/// Adjectives handed out to pets in order of appearance; they wrap around.
pub const PET_ADJECTIVES: [&str; 3] = ["magnificent", "stunning", "beautiful"];

pub fn pet_adjective(index: usize) -> &'static str {
    PET_ADJECTIVES[index % PET_ADJECTIVES.len()]
}
