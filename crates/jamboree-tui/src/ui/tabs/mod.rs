pub mod items;
pub mod leaders;
pub mod scouts;
pub mod summary;
