use crate::app::ports::{AirlineLookupPort, AllianceWriterPort};
use crate::error::{ImportError, Result};
use crate::types::{Airline, AllianceMembershipRecord, AllianceRecord};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory store for development/testing. Mirrors the bulk-insert semantics
/// of the real collections: a batch with a duplicate `_id` is rejected whole.
#[derive(Default)]
pub struct InMemoryStore {
    airlines: Mutex<Vec<Airline>>,
    alliances: Mutex<Vec<AllianceRecord>>,
    memberships: Mutex<Vec<AllianceMembershipRecord>>,
    fail_alliances: AtomicBool,
    fail_memberships: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_airlines(airlines: impl IntoIterator<Item = Airline>) -> Self {
        Self {
            airlines: Mutex::new(airlines.into_iter().collect()),
            ..Self::default()
        }
    }

    pub async fn add_airline(&self, airline: Airline) {
        self.airlines.lock().await.push(airline);
    }

    pub async fn alliances(&self) -> Vec<AllianceRecord> {
        self.alliances.lock().await.clone()
    }

    pub async fn memberships(&self) -> Vec<AllianceMembershipRecord> {
        self.memberships.lock().await.clone()
    }

    /// Make every later alliance insert fail as if the store rejected it
    pub fn fail_alliance_inserts(&self) {
        self.fail_alliances.store(true, Ordering::SeqCst);
    }

    /// Make every later membership insert fail as if the store rejected it
    pub fn fail_membership_inserts(&self) {
        self.fail_memberships.store(true, Ordering::SeqCst);
    }
}

fn check_unique_ids<'a>(
    collection: &str,
    existing: impl Iterator<Item = &'a str>,
    batch: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let mut seen: HashSet<&str> = existing.collect();
    for id in batch {
        if !seen.insert(id) {
            return Err(ImportError::Store {
                message: format!("duplicate key in {collection}: _id {id}"),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl AirlineLookupPort for InMemoryStore {
    async fn find_airline_by_iata(&self, iata: &str) -> Result<Option<Airline>> {
        let airlines = self.airlines.lock().await;
        Ok(airlines.iter().find(|a| a.iata == iata).cloned())
    }
}

#[async_trait]
impl AllianceWriterPort for InMemoryStore {
    async fn insert_alliances(&self, alliances: &[AllianceRecord]) -> Result<usize> {
        if self.fail_alliances.load(Ordering::SeqCst) {
            return Err(ImportError::Store {
                message: "alliances insert rejected".to_string(),
            });
        }

        let mut stored = self.alliances.lock().await;
        check_unique_ids(
            "alliances",
            stored.iter().map(|a| a.id.as_str()),
            alliances.iter().map(|a| a.id.as_str()),
        )?;
        stored.extend_from_slice(alliances);

        debug!("Stored {} alliances", alliances.len());
        Ok(alliances.len())
    }

    async fn insert_memberships(&self, memberships: &[AllianceMembershipRecord]) -> Result<usize> {
        if self.fail_memberships.load(Ordering::SeqCst) {
            return Err(ImportError::Store {
                message: "alliance_members insert rejected".to_string(),
            });
        }

        let mut stored = self.memberships.lock().await;
        check_unique_ids(
            "alliance_members",
            stored.iter().map(|m| m.id.as_str()),
            memberships.iter().map(|m| m.id.as_str()),
        )?;
        stored.extend_from_slice(memberships);

        debug!("Stored {} memberships", memberships.len());
        Ok(memberships.len())
    }
}
