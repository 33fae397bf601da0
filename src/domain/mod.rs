pub mod aggregate;
pub mod identity;
pub mod pacing;
pub mod page;
pub mod traversal;
