pub mod multimedia_db_operations;
pub mod users_db_operations;
