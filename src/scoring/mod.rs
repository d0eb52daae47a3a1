pub mod ensemble;

pub use ensemble::{
    combine, round_display, DecisionPolicy, EnsembleResult, Label, ProbabilityPair, ScoreError,
    FAKE_THRESHOLD,
};
