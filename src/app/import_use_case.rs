use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::app::ports::{AirlineLookupPort, AllianceWriterPort};
use crate::config::UnknownAirlinePolicy;
use crate::error::{ImportError, Result};
use crate::types::{AllianceInput, AllianceMembershipRecord, AllianceRecord, UnresolvedAirline};

/// Everything the importer intends to write, built before the first write
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    pub alliances: Vec<AllianceRecord>,
    pub memberships: Vec<AllianceMembershipRecord>,
    pub skipped: Vec<UnresolvedAirline>,
}

impl ImportPlan {
    /// Under `Fail` any unresolved code makes the plan unusable for a real import
    pub fn ensure_importable(&self, policy: UnknownAirlinePolicy) -> Result<()> {
        match policy {
            UnknownAirlinePolicy::Fail if !self.skipped.is_empty() => {
                Err(ImportError::UnresolvedAirlines {
                    count: self.skipped.len(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub alliances_inserted: usize,
    pub memberships_inserted: usize,
    pub skipped: Vec<UnresolvedAirline>,
}

/// Resolves alliance definitions against the airlines collection and writes
/// the alliance and membership batches
pub struct AllianceImporter {
    airlines: Arc<dyn AirlineLookupPort>,
    writer: Arc<dyn AllianceWriterPort>,
    policy: UnknownAirlinePolicy,
}

impl AllianceImporter {
    pub fn new(
        airlines: Arc<dyn AirlineLookupPort>,
        writer: Arc<dyn AllianceWriterPort>,
        policy: UnknownAirlinePolicy,
    ) -> Self {
        Self {
            airlines,
            writer,
            policy,
        }
    }

    /// Build an importer over a single store that serves both lookups and writes
    pub fn with_store<S>(store: Arc<S>, policy: UnknownAirlinePolicy) -> Self
    where
        S: AirlineLookupPort + AllianceWriterPort + 'static,
    {
        Self::new(store.clone(), store, policy)
    }

    pub fn policy(&self) -> UnknownAirlinePolicy {
        self.policy
    }

    /// Generate records for every input and resolve every listed IATA code.
    /// Nothing is written; under `Fail` the first unknown code aborts.
    pub async fn resolve(&self, inputs: &[AllianceInput]) -> Result<ImportPlan> {
        self.resolve_with(inputs, self.policy).await
    }

    /// Resolve every code regardless of policy, collecting each unknown one
    /// in `skipped`. Used by dry runs to report all bad codes at once.
    pub async fn resolve_all(&self, inputs: &[AllianceInput]) -> Result<ImportPlan> {
        self.resolve_with(inputs, UnknownAirlinePolicy::Skip).await
    }

    async fn resolve_with(
        &self,
        inputs: &[AllianceInput],
        policy: UnknownAirlinePolicy,
    ) -> Result<ImportPlan> {
        let mut plan = ImportPlan::default();

        for input in inputs {
            let alliance = AllianceRecord::new(input.name.clone());
            debug!(alliance = %alliance.name, id = %alliance.id, "Resolving alliance members");

            for iata in &input.airlines {
                match self.airlines.find_airline_by_iata(iata).await? {
                    Some(airline) => {
                        plan.memberships
                            .push(AllianceMembershipRecord::new(airline.id, alliance.id.clone()));
                    }
                    None => match policy {
                        UnknownAirlinePolicy::Fail => {
                            return Err(ImportError::UnknownAirline {
                                alliance: input.name.clone(),
                                iata: iata.clone(),
                            });
                        }
                        UnknownAirlinePolicy::Skip => {
                            warn!(alliance = %input.name, iata = %iata, "Skipping unknown airline code");
                            plan.skipped.push(UnresolvedAirline {
                                alliance: input.name.clone(),
                                iata: iata.clone(),
                            });
                        }
                    },
                }
            }

            plan.alliances.push(alliance);
        }

        info!(
            alliances = plan.alliances.len(),
            memberships = plan.memberships.len(),
            skipped = plan.skipped.len(),
            "Resolved import plan"
        );
        Ok(plan)
    }

    /// Write the alliance batch, then the membership batch. The two inserts are
    /// independent: a failure in the second leaves the first in place.
    pub async fn persist(&self, plan: &ImportPlan) -> Result<ImportSummary> {
        let alliances_inserted = if plan.alliances.is_empty() {
            debug!("No alliances to insert");
            0
        } else {
            self.writer.insert_alliances(&plan.alliances).await?
        };

        let memberships_inserted = if plan.memberships.is_empty() {
            debug!("No memberships to insert");
            0
        } else {
            self.writer
                .insert_memberships(&plan.memberships)
                .await
                .map_err(|e| ImportError::MembershipWrite {
                    orphaned_alliances: alliances_inserted,
                    source: Box::new(e),
                })?
        };

        info!(alliances_inserted, memberships_inserted, "Import persisted");
        Ok(ImportSummary {
            alliances_inserted,
            memberships_inserted,
            skipped: plan.skipped.clone(),
        })
    }

    pub async fn run(&self, inputs: &[AllianceInput]) -> Result<ImportSummary> {
        let plan = self.resolve(inputs).await?;
        self.persist(&plan).await
    }
}
