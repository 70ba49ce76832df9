//! SeaORM entity definitions and their domain conversions.

pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod user;
