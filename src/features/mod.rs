pub mod capabilities;
pub mod catalog;
pub mod cursor;
pub mod particles;
pub mod trail;
