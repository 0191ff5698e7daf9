use crate::app::ports::{AirlineLookupPort, AllianceWriterPort};
use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::types::{Airline, AllianceMembershipRecord, AllianceRecord};
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use tracing::{debug, info};

/// MongoDB-backed store for the `flights` database
pub struct MongoStore {
    client: Client,
    airlines: Collection<Airline>,
    alliances: Collection<AllianceRecord>,
    alliance_members: Collection<AllianceMembershipRecord>,
}

impl MongoStore {
    /// Connect and ping the database so bad URLs or unreachable hosts fail
    /// before any input is processed
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(url).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(config.connect_timeout());
        options.server_selection_timeout = Some(config.connect_timeout());
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());

        let client = Client::with_options(options)?;
        let database = client.database(&config.name);

        info!(database = %config.name, "Connecting to MongoDB");
        database.run_command(doc! { "ping": 1 }, None).await?;
        info!(database = %config.name, "Connected to MongoDB");

        Ok(Self {
            airlines: database.collection(&config.collections.airlines),
            alliances: database.collection(&config.collections.alliances),
            alliance_members: database.collection(&config.collections.alliance_members),
            client,
        })
    }

    /// Delete every alliance and membership document. Returns the number of
    /// (alliances, memberships) removed.
    pub async fn clear_imported(&self) -> Result<(u64, u64)> {
        let members = self.alliance_members.delete_many(doc! {}, None).await?;
        let alliances = self.alliances.delete_many(doc! {}, None).await?;

        info!(
            alliances = alliances.deleted_count,
            memberships = members.deleted_count,
            "Cleared imported alliances"
        );
        Ok((alliances.deleted_count, members.deleted_count))
    }

    /// Close the client's connection pools and background tasks
    pub async fn shutdown(&self) {
        debug!("Shutting down MongoDB client");
        self.client.clone().shutdown().await;
    }
}

#[async_trait]
impl AirlineLookupPort for MongoStore {
    async fn find_airline_by_iata(&self, iata: &str) -> Result<Option<Airline>> {
        let airline = self.airlines.find_one(doc! { "iata": iata }, None).await?;
        debug!(iata, found = airline.is_some(), "Looked up airline");
        Ok(airline)
    }
}

#[async_trait]
impl AllianceWriterPort for MongoStore {
    async fn insert_alliances(&self, alliances: &[AllianceRecord]) -> Result<usize> {
        let result = self.alliances.insert_many(alliances, None).await?;
        info!(count = result.inserted_ids.len(), "Inserted alliances");
        Ok(result.inserted_ids.len())
    }

    async fn insert_memberships(&self, memberships: &[AllianceMembershipRecord]) -> Result<usize> {
        let result = self.alliance_members.insert_many(memberships, None).await?;
        info!(count = result.inserted_ids.len(), "Inserted alliance memberships");
        Ok(result.inserted_ids.len())
    }
}
