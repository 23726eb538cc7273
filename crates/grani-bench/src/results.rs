//! Trial aggregation and the result container.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregated trial values for one (metric, circuit, transpiler) cell.
#[derive(Debug, Clone)]
pub struct Aggregate {
    values: Vec<f64>,
    use_geometric_mean: bool,
    lower_is_better: bool,
}

impl Aggregate {
    /// Create an empty aggregate with the metric's averaging policy.
    pub fn new(use_geometric_mean: bool, lower_is_better: bool) -> Self {
        Self {
            values: vec![],
            use_geometric_mean,
            lower_is_better,
        }
    }

    /// Record one trial value.
    pub fn add(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Number of recorded trials.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Check if no trials have been recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw trial values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Average of the trials: geometric mean when the metric asks for
    /// it and every value is positive, arithmetic otherwise. Empty
    /// aggregates average to 0.
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        if self.use_geometric_mean && self.values.iter().all(|&v| v > 0.0) {
            let log_sum: f64 = self.values.iter().map(|v| v.ln()).sum();
            (log_sum / self.values.len() as f64).exp()
        } else {
            self.values.iter().sum::<f64>() / self.values.len() as f64
        }
    }

    /// The best trial under the metric's ordering.
    pub fn best(&self) -> Option<f64> {
        self.extreme(self.lower_is_better)
    }

    /// The worst trial under the metric's ordering.
    pub fn worst(&self) -> Option<f64> {
        self.extreme(!self.lower_is_better)
    }

    fn extreme(&self, take_min: bool) -> Option<f64> {
        let iter = self.values.iter().copied();
        if take_min {
            iter.fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.min(v)))
            })
        } else {
            iter.fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.max(v)))
            })
        }
    }

    /// Standard error of the mean; 0 with fewer than two trials.
    pub fn std_error(&self) -> f64 {
        let n = self.values.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.values.iter().sum::<f64>() / n as f64;
        let variance =
            self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        (variance / n as f64).sqrt()
    }
}

/// Results of a benchmark sweep: metric → circuit → transpiler → trials.
///
/// One cell corresponds to exactly one (circuit, transpiler) pairing
/// under one metric; nothing in here outlives the sweep that produced
/// it except through the report.
#[derive(Debug, Default)]
pub struct ResultSet {
    cells: BTreeMap<String, BTreeMap<String, BTreeMap<String, Aggregate>>>,
}

impl ResultSet {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one trial value.
    pub fn add_trial(
        &mut self,
        metric: &str,
        circuit: &str,
        transpiler: &str,
        value: f64,
        use_geometric_mean: bool,
        lower_is_better: bool,
    ) {
        self.cells
            .entry(metric.to_string())
            .or_default()
            .entry(circuit.to_string())
            .or_default()
            .entry(transpiler.to_string())
            .or_insert_with(|| Aggregate::new(use_geometric_mean, lower_is_better))
            .add(value);
    }

    /// Get one cell.
    pub fn get(&self, metric: &str, circuit: &str, transpiler: &str) -> Option<&Aggregate> {
        self.cells.get(metric)?.get(circuit)?.get(transpiler)
    }

    /// Metric names present in the results.
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Circuit names recorded under a metric.
    pub fn circuits(&self, metric: &str) -> Vec<&str> {
        self.cells
            .get(metric)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Transpiler names recorded under a metric (union over circuits).
    pub fn transpilers(&self, metric: &str) -> Vec<&str> {
        let mut names: Vec<&str> = vec![];
        if let Some(circuits) = self.cells.get(metric) {
            for row in circuits.values() {
                for name in row.keys() {
                    if !names.contains(&name.as_str()) {
                        names.push(name);
                    }
                }
            }
        }
        names.sort_unstable();
        names
    }

    /// Iterate over every cell as (metric, circuit, transpiler, aggregate).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str, &Aggregate)> {
        self.cells.iter().flat_map(|(metric, circuits)| {
            circuits.iter().flat_map(move |(circuit, transpilers)| {
                transpilers.iter().map(move |(transpiler, aggregate)| {
                    (
                        metric.as_str(),
                        circuit.as_str(),
                        transpiler.as_str(),
                        aggregate,
                    )
                })
            })
        })
    }

    /// Drop circuits that lack results for any of the given transpilers.
    ///
    /// A transpiler that failed on a circuit leaves a partial row; the
    /// charts compare complete rows only.
    pub fn retain_complete(&mut self, transpilers: &[&str]) {
        for circuits in self.cells.values_mut() {
            circuits.retain(|_, row| transpilers.iter().all(|t| row.contains_key(*t)));
        }
    }

    /// Check if the result set holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() || self.cells.values().all(BTreeMap::is_empty)
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (metric, circuit, transpiler, aggregate) in self.iter() {
            writeln!(
                f,
                "Metric: {metric}, Circuit: {circuit}, Transpiler: {transpiler}"
            )?;
            if let (Some(best), Some(worst)) = (aggregate.best(), aggregate.worst()) {
                writeln!(f, "  Best result: {best}")?;
                writeln!(f, "  Worst result: {worst}")?;
            }
            writeln!(f, "  Average result: {:.2}", aggregate.average())?;
            writeln!(f, "  Standard error: {:.2}", aggregate.std_error())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_arithmetic_mean() {
        let mut agg = Aggregate::new(false, true);
        agg.add(2.0);
        agg.add(4.0);
        assert_eq!(agg.average(), 3.0);
        assert_eq!(agg.best(), Some(2.0));
        assert_eq!(agg.worst(), Some(4.0));
    }

    #[test]
    fn test_aggregate_geometric_mean() {
        let mut agg = Aggregate::new(true, true);
        agg.add(2.0);
        agg.add(8.0);
        assert!((agg.average() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_geometric_mean_with_zero_falls_back() {
        let mut agg = Aggregate::new(true, true);
        agg.add(0.0);
        agg.add(8.0);
        assert_eq!(agg.average(), 4.0);
    }

    #[test]
    fn test_empty_aggregate() {
        let agg = Aggregate::new(false, true);
        assert_eq!(agg.average(), 0.0);
        assert_eq!(agg.best(), None);
        assert_eq!(agg.std_error(), 0.0);
    }

    #[test]
    fn test_std_error() {
        let mut agg = Aggregate::new(false, true);
        agg.add(1.0);
        agg.add(3.0);
        // variance = 2, sem = sqrt(2/2) = 1
        assert!((agg.std_error() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_higher_is_better_ordering() {
        let mut agg = Aggregate::new(false, false);
        agg.add(2.0);
        agg.add(4.0);
        assert_eq!(agg.best(), Some(4.0));
        assert_eq!(agg.worst(), Some(2.0));
    }

    #[test]
    fn test_result_set_cells() {
        let mut results = ResultSet::new();
        results.add_trial("depth", "ghz_n4", "fast", 3.0, false, true);
        results.add_trial("depth", "ghz_n4", "fast", 5.0, false, true);
        results.add_trial("depth", "ghz_n4", "slow", 7.0, false, true);

        let cell = results.get("depth", "ghz_n4", "fast").unwrap();
        assert_eq!(cell.count(), 2);
        assert_eq!(cell.average(), 4.0);

        assert_eq!(results.transpilers("depth"), vec!["fast", "slow"]);
        assert_eq!(results.iter().count(), 2);
    }

    #[test]
    fn test_retain_complete() {
        let mut results = ResultSet::new();
        results.add_trial("depth", "a_n2", "t1", 1.0, false, true);
        results.add_trial("depth", "a_n2", "t2", 2.0, false, true);
        results.add_trial("depth", "b_n2", "t1", 3.0, false, true);

        results.retain_complete(&["t1", "t2"]);
        assert!(results.get("depth", "a_n2", "t1").is_some());
        assert!(results.get("depth", "b_n2", "t1").is_none());
    }
}
