pub mod form_helpers;
pub mod multimedia_helpers;
