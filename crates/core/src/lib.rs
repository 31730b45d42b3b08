//! Core domain types and storage traits for the chatstore project.
//!
//! This crate is storage-agnostic: it defines the `Session` and `Message`
//! entities and the repository traits that backends implement. The DynamoDB
//! and in-memory implementations live in the `chatstore` crate.

pub mod chat;
pub mod storage;
