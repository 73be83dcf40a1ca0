//! Trace-driven evaluation of a predictor.

use thiserror::Error;

use crate::branch::BranchRecord;
use crate::predictor::DirectionPredictor;
use crate::trace::TraceError;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("trace contains no records")]
    EmptyTrace,
}

/// Hit statistics accumulated over one evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Number of correct predictions.
    pub hits: usize,

    /// Number of records replayed.
    pub brns: usize,
}

impl EvalStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, hit: bool) {
        self.brns += 1;
        if hit {
            self.hits += 1;
        }
    }

    pub fn misses(&self) -> usize {
        self.brns - self.hits
    }

    /// Fraction of correct predictions, in `[0, 1]`.
    pub fn hit_rate(&self) -> f64 {
        self.hits as f64 / self.brns as f64
    }
}

/// Drive `predictor` through every record of a trace, once, in order.
///
/// Each record is predicted first, then the predictor is updated with
/// the correctness of that prediction, before the next record is read.
/// A decode failure abandons the evaluation; counts accumulated up to
/// that point are discarded with it. An exhausted source that produced
/// no records at all is an [`EvalError::EmptyTrace`] rather than a 0/0
/// accuracy.
pub fn evaluate<P, I>(predictor: &mut P, records: I) -> Result<EvalStats, EvalError>
where
    P: DirectionPredictor,
    I: IntoIterator<Item = Result<BranchRecord, TraceError>>,
{
    let mut stats = EvalStats::new();
    for record in records {
        let record = record?;
        let prediction = predictor.predict(record.addr);
        let hit = prediction == record.outcome;
        predictor.update(record.addr, hit);
        stats.record(hit);
    }
    if stats.brns == 0 {
        return Err(EvalError::EmptyTrace);
    }
    Ok(stats)
}
