//! Per-bin target counts

use super::binning::BinAssignment;
use super::error::Result;
use super::target::Target;

/// Counts for one bin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinCounts {
    pub total: usize,
    pub positives: usize,
    pub negatives: usize,
}

impl BinCounts {
    /// Share of the bin labelled 1
    pub fn event_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.positives as f64 / self.total as f64
        }
    }
}

/// Counts for every bin of an assignment, plus target totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinStats {
    bins: Vec<BinCounts>,
    positives: usize,
    negatives: usize,
}

impl BinStats {
    /// Count positives and negatives per bin in a single pass.
    pub fn aggregate(assignment: &BinAssignment, target: &Target) -> Result<Self> {
        target.ensure_aligned(assignment.len())?;

        let mut bins = vec![BinCounts::default(); assignment.n_bins()];
        for (&bin, &label) in assignment.bins().iter().zip(target.labels()) {
            let counts = &mut bins[bin];
            counts.total += 1;
            if label == 1 {
                counts.positives += 1;
            } else {
                counts.negatives += 1;
            }
        }

        Ok(Self {
            bins,
            positives: target.positives(),
            negatives: target.negatives(),
        })
    }

    pub fn bins(&self) -> &[BinCounts] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Total observations across all bins
    pub fn total(&self) -> usize {
        self.positives + self.negatives
    }

    pub fn positives(&self) -> usize {
        self.positives
    }

    pub fn negatives(&self) -> usize {
        self.negatives
    }
}
