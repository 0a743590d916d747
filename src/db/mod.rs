pub mod connection;
pub mod job_repository;
#[cfg(test)]
pub mod memory_repository;
pub mod migrations;
pub mod models;
