pub mod solved_json;

pub use solved_json::{load_solved_model, parse_solved_model};
