use crate::types::ProfileRecord;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Normalized outcome of one search invocation.
///
/// Holds at most the requested number of profiles in server order, and a
/// `total_count` that is never smaller than the returned list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub profiles: Vec<ProfileRecord>,
    pub total_count: u64,
    #[serde(rename = "execution_time")]
    pub execution_time_ms: u64,
}

impl SearchResult {
    /// Explicit "no results" value
    pub fn empty(elapsed: Duration) -> Self {
        Self {
            profiles: Vec::new(),
            total_count: 0,
            execution_time_ms: duration_ms(elapsed),
        }
    }

    /// Build a result from raw server fields.
    ///
    /// Missing `total_count` falls back to the number of profiles received and
    /// missing `execution_time` falls back to the locally measured `elapsed`.
    pub fn normalize(
        mut profiles: Vec<ProfileRecord>,
        total_count: Option<u64>,
        execution_time_ms: Option<u64>,
        max_results: usize,
        elapsed: Duration,
    ) -> Self {
        let received = profiles.len() as u64;
        profiles.truncate(max_results);

        let total_count = total_count.unwrap_or(received).max(profiles.len() as u64);

        Self {
            profiles,
            total_count,
            execution_time_ms: execution_time_ms.unwrap_or_else(|| duration_ms(elapsed)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the server reported more matches than were returned
    pub fn has_more(&self) -> bool {
        self.total_count > self.profiles.len() as u64
    }

    pub fn execution_time(&self) -> Duration {
        Duration::from_millis(self.execution_time_ms)
    }
}

/// Deserialize a millisecond duration reported as any JSON number.
///
/// Fractions are rounded; negative or non-finite values read as absent.
pub fn deserialize_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.and_then(|n| {
        n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|ms| ms.is_finite() && *ms >= 0.0)
                .map(|ms| ms.round() as u64)
        })
    }))
}

fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles(n: usize) -> Vec<ProfileRecord> {
        (0..n)
            .map(|i| ProfileRecord::new(format!("p-{}", i), format!("Person {}", i)))
            .collect()
    }

    #[test]
    fn test_empty_result() {
        let result = SearchResult::empty(Duration::from_millis(12));

        assert!(result.is_empty());
        assert_eq!(result.total_count, 0);
        assert_eq!(result.execution_time_ms, 12);
    }

    #[test]
    fn test_normalize_truncates_to_max_results_in_order() {
        let result = SearchResult::normalize(profiles(8), Some(40), Some(5), 3, Duration::ZERO);

        assert_eq!(result.len(), 3);
        assert_eq!(result.profiles[0].id.as_str(), "p-0");
        assert_eq!(result.profiles[2].id.as_str(), "p-2");
        assert_eq!(result.total_count, 40);
        assert!(result.has_more());
    }

    #[test]
    fn test_normalize_defaults_total_to_received() {
        let result = SearchResult::normalize(profiles(4), None, None, 10, Duration::from_millis(7));

        assert_eq!(result.total_count, 4);
        assert_eq!(result.execution_time_ms, 7);
        assert!(!result.has_more());
    }

    #[test]
    fn test_normalize_never_reports_fewer_than_returned() {
        let result = SearchResult::normalize(profiles(5), Some(2), Some(1), 10, Duration::ZERO);
        assert_eq!(result.total_count, 5);
    }

    #[test]
    fn test_invariants_hold_across_inputs() {
        for received in 0..12 {
            for max in 1..12 {
                for total in [None, Some(0), Some(3), Some(100)] {
                    let result =
                        SearchResult::normalize(profiles(received), total, None, max, Duration::ZERO);
                    assert!(result.len() <= max);
                    assert!(result.total_count >= result.len() as u64);
                }
            }
        }
    }

    #[derive(Debug, Deserialize)]
    struct Timed {
        #[serde(default, deserialize_with = "deserialize_millis")]
        execution_time: Option<u64>,
    }

    #[test]
    fn test_millis_accept_any_number() {
        let parse = |raw: &str| serde_json::from_str::<Timed>(raw).unwrap().execution_time;

        assert_eq!(parse(r#"{"execution_time": 45}"#), Some(45));
        assert_eq!(parse(r#"{"execution_time": 45.7}"#), Some(46));
        assert_eq!(parse(r#"{"execution_time": -3}"#), None);
        assert_eq!(parse(r#"{"execution_time": null}"#), None);
        assert_eq!(parse("{}"), None);
    }

    #[test]
    fn test_wire_field_name_for_execution_time() {
        let value = serde_json::to_value(SearchResult::empty(Duration::from_millis(3))).unwrap();
        assert_eq!(value["execution_time"], 3);
    }
}
