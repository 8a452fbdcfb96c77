pub mod multipart;
pub mod protected;
pub mod public;
