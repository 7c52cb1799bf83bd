//! Derived-field computation: pure functions over raw timestamps, applied on
//! read paths only. Nothing here mutates storage.

use chrono::{DateTime, Utc};

use crate::contract::model::{Status, Ticket, TicketStats};

/// Elapsed time a ticket has been open, formatted for the dashboard.
///
/// `"{d}d {h}h"` when at least a day has passed, `"{h}h {m}m"` when at least
/// an hour, otherwise `"{m}m"`. Every unit uses floor division; the value
/// never rounds up.
pub fn time_open(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created_at).num_minutes().max(0);
    let days = minutes / (60 * 24);
    let hours = minutes / 60;

    if days >= 1 {
        format!("{}d {}h", days, hours % 24)
    } else if hours >= 1 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Time from creation to resolution, formatted for the dashboard.
///
/// `"{h}h {m}m"` when at least an hour, otherwise `"{m}m"`. There is no day
/// unit; past 24 hours the hour count simply grows ("26h 5m").
pub fn resolution_time(created_at: DateTime<Utc>, resolved_at: DateTime<Utc>) -> String {
    let minutes = (resolved_at - created_at).num_minutes().max(0);
    let hours = minutes / 60;

    if hours >= 1 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Open tickets only, newest created first.
pub fn live_view(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.retain(|t| t.status == Status::Open);
    tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tickets
}

/// Resolved tickets only, newest resolved first. A ticket without a
/// resolution timestamp can never appear here (guaranteed by the lifecycle
/// invariant), so it is filtered rather than sorted with a placeholder.
pub fn past_view(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.retain(|t| t.status == Status::Resolved && t.resolved_at.is_some());
    tickets.sort_by(|a, b| b.resolved_at.cmp(&a.resolved_at));
    tickets
}

/// Aggregate counters over the whole ticket set.
pub fn compute_stats(tickets: &[Ticket]) -> TicketStats {
    let live = tickets.iter().filter(|t| t.status == Status::Open).count();
    let resolved: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| t.status == Status::Resolved)
        .collect();

    let durations_ms: Vec<i64> = resolved
        .iter()
        .filter_map(|t| t.resolved_at.map(|r| (r - t.created_at).num_milliseconds()))
        .collect();

    let avg_response_time_ms = if durations_ms.is_empty() {
        0.0
    } else {
        durations_ms.iter().sum::<i64>() as f64 / durations_ms.len() as f64
    };

    TicketStats {
        total_tickets: tickets.len(),
        live_tickets: live,
        resolved_tickets: resolved.len(),
        avg_response_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::Priority;
    use chrono::Duration;
    use uuid::Uuid;

    fn ticket(status: Status, created_at: DateTime<Utc>, resolved_at: Option<DateTime<Utc>>) -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            name: "A".into(),
            email: "a@x.com".into(),
            subject: "S".into(),
            description: "D".into(),
            priority: Priority::Medium,
            status,
            created_at,
            resolved_at,
        }
    }

    #[test]
    fn time_open_sub_hour() {
        let t = Utc::now();
        assert_eq!(time_open(t, t + Duration::minutes(45)), "45m");
        assert_eq!(time_open(t, t), "0m");
    }

    #[test]
    fn time_open_sub_day() {
        let t = Utc::now();
        assert_eq!(time_open(t, t + Duration::minutes(90)), "1h 30m");
        assert_eq!(time_open(t, t + Duration::hours(23) + Duration::minutes(59)), "23h 59m");
    }

    #[test]
    fn time_open_days() {
        let t = Utc::now();
        assert_eq!(time_open(t, t + Duration::hours(25)), "1d 1h");
        assert_eq!(time_open(t, t + Duration::days(3) + Duration::hours(4)), "3d 4h");
    }

    #[test]
    fn time_open_floors_every_unit() {
        let t = Utc::now();
        // 59m 59s floors to 59m, not 1h
        assert_eq!(time_open(t, t + Duration::seconds(59 * 60 + 59)), "59m");
        // 1d 1h 59m shows as "1d 1h"
        assert_eq!(
            time_open(t, t + Duration::hours(25) + Duration::minutes(59)),
            "1d 1h"
        );
    }

    #[test]
    fn time_open_clock_skew_clamps_to_zero() {
        let t = Utc::now();
        assert_eq!(time_open(t, t - Duration::minutes(5)), "0m");
    }

    #[test]
    fn resolution_time_sub_hour() {
        let t = Utc::now();
        assert_eq!(resolution_time(t, t + Duration::minutes(45)), "45m");
    }

    #[test]
    fn resolution_time_hours() {
        let t = Utc::now();
        assert_eq!(
            resolution_time(t, t + Duration::hours(2) + Duration::minutes(10)),
            "2h 10m"
        );
    }

    #[test]
    fn resolution_time_has_no_day_unit() {
        let t = Utc::now();
        assert_eq!(
            resolution_time(t, t + Duration::hours(26) + Duration::minutes(5)),
            "26h 5m"
        );
    }

    #[test]
    fn live_view_excludes_resolved_and_sorts_newest_first() {
        let base = Utc::now();
        let old_open = ticket(Status::Open, base - Duration::hours(3), None);
        let new_open = ticket(Status::Open, base - Duration::hours(1), None);
        let resolved = ticket(
            Status::Resolved,
            base - Duration::hours(2),
            Some(base - Duration::hours(1)),
        );

        let live = live_view(vec![old_open.clone(), resolved, new_open.clone()]);
        assert_eq!(live.len(), 2);
        assert_eq!(live[0].id, new_open.id);
        assert_eq!(live[1].id, old_open.id);
    }

    #[test]
    fn past_view_excludes_open_and_sorts_by_resolved_at() {
        let base = Utc::now();
        let open = ticket(Status::Open, base - Duration::hours(5), None);
        let early = ticket(
            Status::Resolved,
            base - Duration::hours(4),
            Some(base - Duration::hours(3)),
        );
        let late = ticket(
            Status::Resolved,
            base - Duration::hours(4),
            Some(base - Duration::hours(1)),
        );

        let past = past_view(vec![early.clone(), open, late.clone()]);
        assert_eq!(past.len(), 2);
        assert_eq!(past[0].id, late.id);
        assert_eq!(past[1].id, early.id);
    }

    #[test]
    fn stats_over_empty_set_is_all_zero() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total_tickets, 0);
        assert_eq!(stats.live_tickets, 0);
        assert_eq!(stats.resolved_tickets, 0);
        assert_eq!(stats.avg_response_time_ms, 0.0);
    }

    #[test]
    fn stats_avg_is_zero_without_resolved_tickets() {
        let base = Utc::now();
        let stats = compute_stats(&[ticket(Status::Open, base, None)]);
        assert_eq!(stats.total_tickets, 1);
        assert_eq!(stats.live_tickets, 1);
        assert_eq!(stats.resolved_tickets, 0);
        assert_eq!(stats.avg_response_time_ms, 0.0);
    }

    #[test]
    fn stats_averages_resolution_durations() {
        let base = Utc::now();
        let one = ticket(Status::Resolved, base, Some(base + Duration::minutes(10)));
        let two = ticket(Status::Resolved, base, Some(base + Duration::minutes(30)));
        let open = ticket(Status::Open, base, None);

        let stats = compute_stats(&[one, two, open]);
        assert_eq!(stats.total_tickets, 3);
        assert_eq!(stats.live_tickets, 1);
        assert_eq!(stats.resolved_tickets, 2);
        // mean of 10min and 30min in ms
        assert_eq!(stats.avg_response_time_ms, 20.0 * 60.0 * 1000.0);
    }
}
