//! At-a-glance dashboard summary, computed from the repositories on demand.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::models::{Candidate, Requisition, RequisitionStatus};

/// A candidate whose latest CRS is at or above this is flagged high priority.
pub const HIGH_PRIORITY_CRS: u8 = 85;
const NEW_CANDIDATE_WINDOW_DAYS: i64 = 30;
const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub metrics: DashboardMetrics,
    pub open_requisitions: Vec<RequisitionOverview>,
    pub high_priority_candidates: Vec<PriorityCandidate>,
    pub recent_activity: Vec<ActivityItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub open_requisitions: usize,
    pub total_candidates: usize,
    pub new_candidates_last_30_days: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_crs: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionOverview {
    pub id: String,
    pub job_title: String,
    pub candidate_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_crs: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCandidate {
    pub id: String,
    pub name: String,
    pub requisition_title: String,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub candidate_id: String,
    pub candidate_name: String,
    pub date: DateTime<Utc>,
    pub activity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

pub fn summarize(
    requisitions: &[Requisition],
    candidates: &[Candidate],
    now: DateTime<Utc>,
) -> DashboardSummary {
    let open: Vec<&Requisition> = requisitions
        .iter()
        .filter(|r| r.status == RequisitionStatus::Open)
        .collect();

    let scored: Vec<f64> = open
        .iter()
        .filter_map(|r| r.average_crs)
        .map(f64::from)
        .collect();
    let average_crs = (!scored.is_empty())
        .then(|| (scored.iter().sum::<f64>() / scored.len() as f64).round() as u8);

    let window_start = now - Duration::days(NEW_CANDIDATE_WINDOW_DAYS);
    let new_candidates = candidates
        .iter()
        .filter(|c| c.date_added >= window_start)
        .count();

    let mut high_priority: Vec<PriorityCandidate> = candidates
        .iter()
        .filter_map(|c| {
            let latest = c.latest_crs()?;
            (latest.score >= HIGH_PRIORITY_CRS).then(|| PriorityCandidate {
                id: c.id.clone(),
                name: c.full_name(),
                requisition_title: latest.requisition_title.clone(),
                score: latest.score,
            })
        })
        .collect();
    high_priority.sort_by(|a, b| b.score.cmp(&a.score));

    let mut recent_activity: Vec<ActivityItem> = candidates
        .iter()
        .flat_map(|c| {
            c.activity_log.iter().map(move |entry| ActivityItem {
                candidate_id: c.id.clone(),
                candidate_name: c.full_name(),
                date: entry.date,
                activity: entry.activity.clone(),
                user: entry.user.clone(),
            })
        })
        .collect();
    recent_activity.sort_by(|a, b| b.date.cmp(&a.date));
    recent_activity.truncate(RECENT_ACTIVITY_LIMIT);

    DashboardSummary {
        metrics: DashboardMetrics {
            open_requisitions: open.len(),
            total_candidates: candidates.len(),
            new_candidates_last_30_days: new_candidates,
            average_crs,
        },
        open_requisitions: open
            .into_iter()
            .map(|r| RequisitionOverview {
                id: r.id.clone(),
                job_title: r.job_title.clone(),
                candidate_count: r.candidate_count,
                average_crs: r.average_crs,
            })
            .collect(),
        high_priority_candidates: high_priority,
        recent_activity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recruiting::seed::{sample_candidates, sample_requisitions};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 12, 10, 12, 0, 0).unwrap()
    }

    fn late_november() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 11, 25, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_summary_over_sample_data() {
        let summary = summarize(&sample_requisitions(), &sample_candidates(), late_november());

        assert_eq!(summary.metrics.open_requisitions, 2);
        assert_eq!(summary.metrics.total_candidates, 2);
        // (78 + 85) / 2 = 81.5, rounded half away from zero
        assert_eq!(summary.metrics.average_crs, Some(82));
        // cand1 added 2023-11-01 falls inside the window; cand2 (2023-10-15) does not
        assert_eq!(summary.metrics.new_candidates_last_30_days, 1);

        let open_ids: Vec<&str> = summary
            .open_requisitions
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(open_ids, vec!["req1", "req2"]);

        assert_eq!(summary.high_priority_candidates.len(), 1);
        assert_eq!(summary.high_priority_candidates[0].name, "Alice Smith");
        assert_eq!(summary.high_priority_candidates[0].score, 85);

        assert_eq!(summary.recent_activity.len(), 2);
        assert_eq!(
            summary.recent_activity[0].activity,
            "Moved to Interviewing for Senior Frontend Engineer"
        );
    }

    #[test]
    fn test_new_candidate_window_excludes_older_additions() {
        let summary = summarize(&[], &sample_candidates(), now());
        // the window opens 2023-11-10 12:00, after both seed candidates were added
        assert_eq!(summary.metrics.new_candidates_last_30_days, 0);
    }

    #[test]
    fn test_empty_repositories_have_no_average() {
        let summary = summarize(&[], &[], now());
        assert_eq!(summary.metrics.open_requisitions, 0);
        assert!(summary.metrics.average_crs.is_none());
        assert!(summary.recent_activity.is_empty());
    }

    #[test]
    fn test_recent_activity_is_capped() {
        let mut candidates = sample_candidates();
        let template = candidates[0].activity_log[0].clone();
        for day in 0..10 {
            let mut entry = template.clone();
            entry.date = now() - Duration::days(day);
            candidates[0].activity_log.push(entry);
        }
        let summary = summarize(&[], &candidates, now());
        assert_eq!(summary.recent_activity.len(), RECENT_ACTIVITY_LIMIT);
        assert_eq!(summary.recent_activity[0].date, now());
    }
}
