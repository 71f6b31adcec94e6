pub mod generate;
pub mod move_processed;
pub mod split;
pub mod upload;
pub mod vocab;
