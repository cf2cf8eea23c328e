pub mod draft;
pub mod line_items;
pub mod mapping;
pub mod payload;
