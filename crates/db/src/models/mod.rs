//! Row structs for the `videos` table and their conversion into domain
//! types.

pub mod video;
