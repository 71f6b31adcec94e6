pub mod dictionary;
pub mod preprocess;
