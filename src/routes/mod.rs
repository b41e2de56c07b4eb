pub mod multimedia;
pub mod public;
