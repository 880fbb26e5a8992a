pub mod add_document;
pub mod clear;
pub mod dataset;
pub mod embedding;
pub mod search;
pub mod settings;
