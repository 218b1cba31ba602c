//! Participant construction backed by generation ports

pub mod composer;
pub mod factory;

pub use composer::PromptedComposer;
pub use factory::ParticipantFactory;
