use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a pre-existing airline document. Kept as raw BSON because
/// the airlines collection is owned elsewhere and may use strings or ObjectIds.
pub type AirlineId = Bson;

/// One entry of the alliances input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllianceInput {
    pub name: String,
    /// IATA codes of the member airlines, in listed order
    pub airlines: Vec<String>,
}

/// An airline already stored in the `airlines` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    #[serde(rename = "_id")]
    pub id: AirlineId,
    pub iata: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Document written to the `alliances` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllianceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl AllianceRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            name: name.into(),
        }
    }
}

/// Document written to the `alliance_members` collection, joining one
/// alliance to one airline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllianceMembershipRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "airline")]
    pub airline_id: AirlineId,
    #[serde(rename = "alliance")]
    pub alliance_id: String,
}

impl AllianceMembershipRecord {
    pub fn new(airline_id: AirlineId, alliance_id: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            airline_id,
            alliance_id: alliance_id.into(),
        }
    }
}

/// A membership that was dropped because its airline code did not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedAirline {
    pub alliance: String,
    pub iata: String,
}

fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}
