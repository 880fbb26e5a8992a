pub mod add_outcome;
pub mod document;
pub mod search_result;
pub mod stored_vector;
