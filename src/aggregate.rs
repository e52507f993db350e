//! Merge accepted records from every source and compute age statistics.

use crate::types::{AggregateStatistics, Record, SourceResult};

/// Compute statistics over the accepted records of every source.
///
/// Records are concatenated in source order, then line order, and stably
/// sorted by age, so equal ages keep that concatenation order. With no
/// records at all, every statistic is zero and there is no median record.
pub fn aggregate(results: &[SourceResult]) -> AggregateStatistics {
    let mut merged: Vec<&Record> = results
        .iter()
        .flat_map(|result| result.records.iter())
        .collect();
    merged.sort_by_key(|record| record.age);

    statistics_for_sorted(&merged)
}

/// Statistics for records already sorted by age ascending.
pub fn statistics_for_sorted(sorted: &[&Record]) -> AggregateStatistics {
    if sorted.is_empty() {
        return AggregateStatistics::default();
    }

    let count = sorted.len();
    let total: i64 = sorted.iter().map(|record| i64::from(record.age)).sum();
    let average_age = total as f64 / count as f64;

    let mid = count / 2;
    let median_age = if count % 2 == 0 {
        (i64::from(sorted[mid - 1].age) + i64::from(sorted[mid].age)) as f64 / 2.0
    } else {
        f64::from(sorted[mid].age)
    };

    // With an even count and two different middle ages the median is a
    // half-value no record carries, so this is None.
    let median_record = sorted
        .iter()
        .find(|record| f64::from(record.age) == median_age)
        .map(|record| (*record).clone());

    AggregateStatistics {
        record_count: count,
        average_age,
        median_age,
        median_record,
    }
}
