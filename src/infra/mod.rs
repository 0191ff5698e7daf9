pub mod in_memory_store;
pub mod mongo_store;

pub use in_memory_store::InMemoryStore;
pub use mongo_store::MongoStore;
