pub mod availability;
pub mod block;
pub mod schedule;
