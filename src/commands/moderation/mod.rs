mod transfer;

pub use transfer::*;
