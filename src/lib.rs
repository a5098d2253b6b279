pub mod collections_ext;
pub mod tally;
