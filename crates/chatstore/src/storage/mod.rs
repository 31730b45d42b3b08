//! Storage backend implementations.

pub mod dynamodb;
pub mod inmemory;

pub use dynamodb::DynamoDbRepository;
pub use inmemory::InMemoryRepository;
