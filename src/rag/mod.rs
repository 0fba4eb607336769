pub mod answer;
pub mod search;
