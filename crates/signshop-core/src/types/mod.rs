//! Value and record types shared by the executor and the stores.

pub mod book;
pub mod player;
pub mod value;
