pub mod export;
pub mod gateway;
pub mod reconcile;
pub mod summary;
pub mod ticket;
