pub mod blob;
pub mod items;
pub mod users;
