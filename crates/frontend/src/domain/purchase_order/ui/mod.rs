pub mod bulk_grid;
pub mod details;
pub mod list;
