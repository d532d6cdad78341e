pub mod reel_item;
pub mod row_model;

pub use reel_item::*;
pub use row_model::*;
