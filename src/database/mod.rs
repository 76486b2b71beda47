pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod resource;
pub mod store;

pub use manager::DatabaseManager;
pub use memory::InMemoryStore;
pub use postgres::PgDocumentStore;
pub use resource::{Descriptor, Record, Resource};
pub use store::{parse_id, Collection, Document, DocumentStore, Filter, StoreError};
