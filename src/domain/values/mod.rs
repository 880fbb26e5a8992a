pub mod id_strategy;
pub mod similarity;
