//! Core domain concepts shared across all subdomains.
//!
//! - [`participant_id::ParticipantId`] / [`participant_id::Recipient`]: identity and addressing
//! - [`topic::Topic`]: a validated debate topic
//! - [`error::DomainError`] / [`error::GenerationError`]: domain and collaborator errors

pub mod error;
pub mod participant_id;
pub mod topic;
