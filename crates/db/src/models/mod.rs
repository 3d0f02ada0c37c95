//! Row structs and insert DTOs.

pub mod user;
