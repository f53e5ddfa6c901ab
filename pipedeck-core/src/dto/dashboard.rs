//! Dashboard DTOs

use serde::{Deserialize, Serialize};

/// Headline counters for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub repositories: i64,
    pub pipelines: i64,
    pub active_executions: i64,
    pub agents: i64,
    /// Percentage of completed executions that succeeded, rounded
    pub success_rate: u32,
}

/// Rounded percentage of `successful` among `completed`; 0 when nothing completed
pub fn success_rate(completed: i64, successful: i64) -> u32 {
    if completed <= 0 {
        return 0;
    }
    let successful = successful.clamp(0, completed);
    ((successful as f64 / completed as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_no_completions() {
        assert_eq!(success_rate(0, 0), 0);
    }

    #[test]
    fn test_success_rate_rounds() {
        assert_eq!(success_rate(3, 2), 67);
        assert_eq!(success_rate(8, 1), 13);
        assert_eq!(success_rate(4, 4), 100);
    }
}
