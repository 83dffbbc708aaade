//! Data quality scoring.

mod scorer;

pub use scorer::{
    CONSTANT_WEIGHT, DUPLICATE_WEIGHT, MISSING_WEIGHT, QualityScorer, score,
};
