pub mod models;
pub mod scorer;

pub use models::*;
pub use scorer::{ScoreOutput, Scorer};
