use crate::error::Result;
use crate::types::{Airline, AllianceMembershipRecord, AllianceRecord};
use async_trait::async_trait;

/// Read side: the pre-existing airlines collection
#[async_trait]
pub trait AirlineLookupPort: Send + Sync {
    /// `Ok(None)` when no airline carries this IATA code
    async fn find_airline_by_iata(&self, iata: &str) -> Result<Option<Airline>>;
}

/// Write side: one bulk insert per batch. An error means the batch did not
/// land in full; documents ahead of the failing one may already be stored.
#[async_trait]
pub trait AllianceWriterPort: Send + Sync {
    async fn insert_alliances(&self, alliances: &[AllianceRecord]) -> Result<usize>;
    async fn insert_memberships(&self, memberships: &[AllianceMembershipRecord]) -> Result<usize>;
}
