//! Bin assignment
//!
//! Every observation lands in exactly one bin. Missing observations always get
//! their own trailing bin, and bins nobody falls into are dropped so bin ids
//! stay dense.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use super::error::{QualityError, Result};
use super::feature::{distinct_sorted, Feature, FeatureKind};
use super::splits::{candidate_splits, select_splits};
use super::target::Target;

/// Default maximum bin count for supervised binning
pub const DEFAULT_BINS: usize = 20;

/// Boundary computation for unsupervised cuts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CutMethod {
    /// Equal-frequency boundaries at the `i / n_bins` quantiles
    #[default]
    Quantile,
    /// Equal-width boundaries between the minimum and maximum
    Step,
}

impl fmt::Display for CutMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutMethod::Quantile => write!(f, "quantile"),
            CutMethod::Step => write!(f, "step"),
        }
    }
}

impl std::str::FromStr for CutMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quantile" => Ok(CutMethod::Quantile),
            "step" => Ok(CutMethod::Step),
            _ => Err(format!(
                "Unknown cut method: '{}'. Use 'quantile' or 'step'.",
                s
            )),
        }
    }
}

/// Unsupervised cut of a numeric feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutConfig {
    pub n_bins: usize,
    pub method: CutMethod,
    /// Tail share trimmed on each side before boundaries are computed
    pub clip_q: f64,
    /// Accept fewer bins than requested when distinct values run out
    pub allow_degenerate: bool,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            n_bins: 10,
            method: CutMethod::Quantile,
            clip_q: 0.0,
            allow_degenerate: true,
        }
    }
}

impl CutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_bins == 0 {
            return Err(QualityError::InvalidConfig(
                "bin count must be at least 1".to_string(),
            ));
        }
        validate_clip(self.clip_q)
    }
}

pub(crate) fn validate_clip(clip_q: f64) -> Result<()> {
    if !(0.0..0.5).contains(&clip_q) {
        return Err(QualityError::InvalidConfig(format!(
            "clip_q must be in [0, 0.5), got {}",
            clip_q
        )));
    }
    Ok(())
}

/// How a feature is partitioned into bins
#[derive(Debug, Clone, PartialEq)]
pub enum BinSpec {
    /// Strictly increasing boundaries; `x` lands in bin `#{s : s <= x}`
    Splits(Vec<f64>),
    /// Explicit value groups; unlisted values share a trailing `Other` bin
    Groups(Vec<Vec<String>>),
    Cut(CutConfig),
    /// One bin per distinct value
    Distinct,
    /// Candidate splits reduced to at most `max_bins` bins
    Supervised { max_bins: usize },
}

/// Binning used by IV, conditional Gini and conditional entropy
pub fn default_spec(feature: &Feature) -> BinSpec {
    match feature.kind() {
        FeatureKind::Continuous => BinSpec::Supervised {
            max_bins: DEFAULT_BINS,
        },
        FeatureKind::Discrete | FeatureKind::Categorical => BinSpec::Distinct,
    }
}

/// What a bin holds
#[derive(Debug, Clone, PartialEq)]
pub enum BinLabel {
    /// Right-open interval `[lower, upper)`
    Interval { lower: f64, upper: f64 },
    Value(f64),
    Category(String),
    Group(Vec<String>),
    Other,
    Missing,
}

impl fmt::Display for BinLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinLabel::Interval { lower, upper } => write!(f, "[{}, {})", lower, upper),
            BinLabel::Value(v) => write!(f, "{}", v),
            BinLabel::Category(c) => write!(f, "{}", c),
            BinLabel::Group(values) => write!(f, "{}", values.join(",")),
            BinLabel::Other => write!(f, "other"),
            BinLabel::Missing => write!(f, "missing"),
        }
    }
}

/// Observation to bin mapping
#[derive(Debug, Clone, PartialEq)]
pub struct BinAssignment {
    bins: Vec<usize>,
    labels: Vec<BinLabel>,
}

impl BinAssignment {
    /// Bin id of every observation
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    pub fn labels(&self) -> &[BinLabel] {
        &self.labels
    }

    pub fn n_bins(&self) -> usize {
        self.labels.len()
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Id of the missing bin, always the last one
    pub fn missing_bin(&self) -> Option<usize> {
        match self.labels.last() {
            Some(BinLabel::Missing) => Some(self.labels.len() - 1),
            _ => None,
        }
    }

    /// Drop unoccupied bins, renumber densely and append the missing bin.
    fn compact(raw: Vec<Option<usize>>, raw_labels: Vec<BinLabel>) -> Self {
        let mut occupied = vec![false; raw_labels.len()];
        let mut has_missing = false;
        for bin in &raw {
            match bin {
                Some(b) => occupied[*b] = true,
                None => has_missing = true,
            }
        }

        let mut remap = vec![usize::MAX; raw_labels.len()];
        let mut labels = Vec::new();
        for (old, label) in raw_labels.into_iter().enumerate() {
            if occupied[old] {
                remap[old] = labels.len();
                labels.push(label);
            }
        }

        let missing_id = labels.len();
        if has_missing {
            labels.push(BinLabel::Missing);
        }

        let bins = raw
            .into_iter()
            .map(|bin| bin.map_or(missing_id, |b| remap[b]))
            .collect();
        Self { bins, labels }
    }
}

/// Linear-interpolation quantile of ascending `sorted` values.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    let position = q * (n - 1) as f64;
    let lo = position.floor() as usize;
    if lo + 1 >= n {
        return sorted[n - 1];
    }
    let t = position - lo as f64;
    let (a, b) = (sorted[lo], sorted[lo + 1]);
    if t == 0.0 || a == b {
        return a;
    }
    // an infinite end absorbs the whole interval
    if a.is_infinite() {
        return a;
    }
    if b.is_infinite() {
        return b;
    }
    let d = b - a;
    // interpolate from the nearer end
    if t < 0.5 {
        a + d * t
    } else {
        b - d * (1.0 - t)
    }
}

/// Boundaries of an unsupervised cut over the non-missing values.
pub(crate) fn cut_boundaries(values: &[Option<f64>], config: &CutConfig) -> Result<Vec<f64>> {
    config.validate()?;

    let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
    if sorted.is_empty() {
        return Ok(Vec::new());
    }
    sorted.sort_by(f64::total_cmp);

    let available = distinct_sorted(values).len();
    if config.n_bins > available {
        if !config.allow_degenerate {
            return Err(QualityError::DegenerateBinning {
                requested: config.n_bins,
                available,
            });
        }
        debug!(
            requested = config.n_bins,
            available, "fewer distinct values than requested bins"
        );
    }

    if config.clip_q > 0.0 {
        let lo = quantile(&sorted, config.clip_q);
        let hi = quantile(&sorted, 1.0 - config.clip_q);
        for v in sorted.iter_mut() {
            *v = v.clamp(lo, hi);
        }
    }

    let n = config.n_bins;
    let boundaries = match config.method {
        CutMethod::Quantile => {
            let mut qs: Vec<f64> = (0..n)
                .map(|i| quantile(&sorted, i as f64 / n as f64))
                .collect();
            qs.dedup();
            qs.into_iter().skip(1).collect()
        }
        CutMethod::Step => {
            let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
            let width = max - min;
            if width > 0.0 && width.is_finite() {
                let step = width / n as f64;
                (1..n).map(|i| min + i as f64 * step).collect()
            } else {
                debug!(min, max, "no finite range to step through");
                Vec::new()
            }
        }
    };
    Ok(boundaries)
}

fn validate_splits(splits: &[f64]) -> Result<()> {
    if splits.iter().any(|s| s.is_nan()) || !splits.windows(2).all(|w| w[0] < w[1]) {
        return Err(QualityError::InvalidConfig(
            "split boundaries must be strictly increasing".to_string(),
        ));
    }
    Ok(())
}

fn assign_by_splits(values: &[Option<f64>], splits: &[f64]) -> Result<BinAssignment> {
    validate_splits(splits)?;

    let raw = values
        .iter()
        .map(|v| v.map(|x| splits.partition_point(|&s| s <= x)))
        .collect();
    let labels = (0..=splits.len())
        .map(|i| BinLabel::Interval {
            lower: if i == 0 { f64::NEG_INFINITY } else { splits[i - 1] },
            upper: splits.get(i).copied().unwrap_or(f64::INFINITY),
        })
        .collect();
    Ok(BinAssignment::compact(raw, labels))
}

fn assign_distinct(feature: &Feature) -> BinAssignment {
    match feature {
        Feature::Numeric(values) => {
            let distinct = distinct_sorted(values);
            let raw = values
                .iter()
                .map(|v| {
                    v.and_then(|x| distinct.binary_search_by(|d| d.total_cmp(&x)).ok())
                })
                .collect();
            let labels = distinct.into_iter().map(BinLabel::Value).collect();
            BinAssignment::compact(raw, labels)
        }
        Feature::Categorical(values) => {
            let ids: BTreeMap<&str, usize> = values
                .iter()
                .flatten()
                .map(|s| (s.as_str(), 0))
                .collect::<BTreeMap<_, _>>()
                .into_keys()
                .enumerate()
                .map(|(id, s)| (s, id))
                .collect();
            let raw = values
                .iter()
                .map(|v| v.as_deref().map(|s| ids[s]))
                .collect();
            let labels = ids
                .keys()
                .map(|s| BinLabel::Category(s.to_string()))
                .collect();
            BinAssignment::compact(raw, labels)
        }
    }
}

fn assign_groups(feature: &Feature, groups: &[Vec<String>]) -> BinAssignment {
    let mut lookup: HashMap<&str, usize> = HashMap::new();
    for (id, group) in groups.iter().enumerate() {
        for value in group {
            lookup.entry(value.as_str()).or_insert(id);
        }
    }
    let other = groups.len();

    let keys: Vec<Option<String>> = match feature {
        Feature::Numeric(values) => values.iter().map(|v| v.map(|x| x.to_string())).collect(),
        Feature::Categorical(values) => values.clone(),
    };
    let raw = keys
        .iter()
        .map(|k| {
            k.as_deref()
                .map(|s| lookup.get(s).copied().unwrap_or(other))
        })
        .collect();

    let mut labels: Vec<BinLabel> = groups.iter().cloned().map(BinLabel::Group).collect();
    labels.push(BinLabel::Other);
    BinAssignment::compact(raw, labels)
}

/// Assign every observation of `feature` to a bin of an unsupervised `spec`.
///
/// `Supervised` needs the target and is rejected here; use [`bin_feature`].
pub fn assign_bins(feature: &Feature, spec: &BinSpec) -> Result<BinAssignment> {
    match spec {
        BinSpec::Splits(splits) => {
            let values = feature.numeric_values("split binning")?;
            assign_by_splits(values, splits)
        }
        BinSpec::Cut(config) => {
            let values = feature.numeric_values("cut binning")?;
            let boundaries = cut_boundaries(values, config)?;
            assign_by_splits(values, &boundaries)
        }
        BinSpec::Groups(groups) => Ok(assign_groups(feature, groups)),
        BinSpec::Distinct => Ok(assign_distinct(feature)),
        BinSpec::Supervised { .. } => Err(QualityError::InvalidConfig(
            "supervised binning needs a target".to_string(),
        )),
    }
}

/// Supervised boundaries: candidate splits reduced to at most `max_bins` bins.
pub fn supervised_splits(feature: &Feature, target: &Target, max_bins: usize) -> Result<Vec<f64>> {
    let candidates = candidate_splits(feature, target)?;
    select_splits(feature, target, &candidates, max_bins)
}

/// Assign bins for any spec, using `target` where the spec is supervised.
pub fn bin_feature(feature: &Feature, target: &Target, spec: &BinSpec) -> Result<BinAssignment> {
    target.ensure_aligned(feature.len())?;
    match spec {
        BinSpec::Supervised { max_bins } => {
            let splits = supervised_splits(feature, target, *max_bins)?;
            let values = feature.numeric_values("supervised binning")?;
            assign_by_splits(values, &splits)
        }
        other => assign_bins(feature, other),
    }
}
