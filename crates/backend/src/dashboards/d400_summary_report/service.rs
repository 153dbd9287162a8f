use contracts::dashboards::d400_summary_report::{PendingBaselineFigures, SummaryReport, TopClient};
use contracts::domain::a001_order::Order;
use contracts::domain::a002_client::Client;
use contracts::domain::a003_staff::Staff;
use contracts::domain::a004_attendance::Attendance;
use contracts::shared::period::ReportRequest;
use std::collections::HashSet;

use super::super::{orders_in_range, tally_by_client, ClientNames, ClientTally};
use crate::shared::data::DataStore;
use crate::shared::error::{ReportError, ReportSection};
use crate::shared::rates;

/// Headline figures for the range
pub async fn get_summary_report(
    store: &dyn DataStore,
    request: &ReportRequest,
) -> Result<SummaryReport, ReportError> {
    let fail = |e| ReportError::data_fetch(ReportSection::Summary, request, e);

    let (orders, clients, staff, attendance) = tokio::try_join!(
        store.query_orders(request),
        store.query_clients(),
        store.query_staff(true),
        store.query_attendance(request),
    )
    .map_err(fail)?;

    tracing::debug!(
        "Summary {}: {} orders, {} attendance records",
        request.range_label(),
        orders.len(),
        attendance.len()
    );

    Ok(compute_summary(request, &orders, &clients, &staff, &attendance))
}

pub fn compute_summary(
    request: &ReportRequest,
    orders: &[Order],
    clients: &[Client],
    staff: &[Staff],
    attendance: &[Attendance],
) -> SummaryReport {
    let orders = orders_in_range(orders, request);

    let total_revenue: f64 = orders.iter().filter(|o| o.is_settled()).map(|o| o.total).sum();
    let pending_payments: f64 = orders.iter().map(|o| o.outstanding_debt()).sum();
    let active_clients = orders.iter().map(|o| o.client_id).collect::<HashSet<_>>().len() as u32;

    let active_staff = staff.iter().filter(|s| s.is_active).count() as f64;
    let present = attendance.iter().filter(|a| request.contains_date(a.date)).count() as f64;
    let expected = active_staff * request.day_count() as f64;

    // First client wins a revenue tie
    let mut best: Option<ClientTally> = None;
    for tally in tally_by_client(orders.iter().copied().filter(|o| o.is_settled())) {
        if best.as_ref().map_or(true, |b| tally.total > b.total) {
            best = Some(tally);
        }
    }
    let names = ClientNames::new(clients);
    let top_client = best.filter(|t| t.total > 0.0).map(|t| TopClient {
        client_id: t.client_id,
        name: names.resolve(t.client_id, t.snapshot_name.as_deref()),
        revenue: t.total,
        percentage: rates::percent(t.total, total_revenue),
    });

    SummaryReport {
        start_date: request.start_date,
        end_date: request.end_date,
        total_revenue,
        total_orders: orders.len() as u32,
        active_clients,
        pending_payments,
        average_attendance: rates::percent(present, expected),
        top_client,
        collection_rate: rates::percent_signed(total_revenue - pending_payments, total_revenue),
        not_computed: PendingBaselineFigures::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::fixtures::*;
    use contracts::domain::a001_order::OrderStatus;

    #[test]
    fn test_settled_revenue_and_collection_rate() {
        let ana = client("Ana", &["Centro"], true);
        let orders = vec![
            order(&ana, at(6, 3, 10, 0), 100.0, OrderStatus::Liquidado, None),
            order(&ana, at(6, 4, 10, 0), 50.0, OrderStatus::Abono, Some(20.0)),
            order(&ana, at(6, 5, 10, 0), 80.0, OrderStatus::NoPagado, Some(80.0)),
        ];

        let report = compute_summary(&june_week(), &orders, &[ana.clone()], &[], &[]);

        assert_eq!(report.total_revenue, 100.0);
        assert_eq!(report.pending_payments, 100.0);
        assert_eq!(report.collection_rate, 0);
        assert_eq!(report.total_orders, 3);
        assert_eq!(report.active_clients, 1);
        let top = report.top_client.unwrap();
        assert_eq!(top.name, "Ana");
        assert_eq!(top.percentage, 100);
    }

    #[test]
    fn test_empty_range_has_zero_figures_and_no_top_client() {
        let report = compute_summary(&june_week(), &[], &[], &[], &[]);

        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.pending_payments, 0.0);
        assert_eq!(report.collection_rate, 0);
        assert_eq!(report.average_attendance, 0);
        assert!(report.top_client.is_none());
        assert_eq!(report.not_computed, PendingBaselineFigures::default());
    }

    #[test]
    fn test_collection_rate_goes_negative_when_debt_exceeds_revenue() {
        let ana = client("Ana", &[], true);
        let orders = vec![
            order(&ana, at(6, 3, 10, 0), 100.0, OrderStatus::Liquidado, None),
            order(&ana, at(6, 4, 10, 0), 300.0, OrderStatus::NoPagado, Some(300.0)),
        ];

        let report = compute_summary(&june_week(), &orders, &[], &[], &[]);
        assert_eq!(report.collection_rate, -200);
    }

    #[test]
    fn test_top_client_ties_keep_first_seen_and_unknown_falls_back_to_snapshot() {
        let ana = client("Ana", &[], false);
        let beto = client("Beto", &[], false);
        let orders = vec![
            order(&beto, at(6, 2, 9, 0), 60.0, OrderStatus::Liquidado, None),
            order(&ana, at(6, 3, 9, 0), 60.0, OrderStatus::Liquidado, None),
        ];

        let report = compute_summary(&june_week(), &orders, &[], &[], &[]);
        let top = report.top_client.unwrap();
        assert_eq!(top.client_id, beto.id);
        assert_eq!(top.name, "Beto");
        assert_eq!(top.percentage, 50);
    }

    #[test]
    fn test_average_attendance_uses_active_staff_and_every_calendar_day() {
        let luis = staff("Luis", true);
        let marta = staff("Marta", false);
        let records: Vec<_> = (2..=8)
            .map(|d| attendance(&luis, at(6, d, 9, 0), Some(at(6, d, 17, 0))))
            .collect();

        let report = compute_summary(&june_week(), &[], &[], &[luis, marta], &records);
        assert_eq!(report.average_attendance, 100);
    }

    #[test]
    fn test_orders_outside_range_are_ignored() {
        let ana = client("Ana", &[], false);
        let orders = vec![
            order(&ana, at(6, 1, 23, 59), 999.0, OrderStatus::Liquidado, None),
            order(&ana, at(6, 8, 23, 59), 10.0, OrderStatus::Liquidado, None),
        ];

        let report = compute_summary(&june_week(), &orders, &[], &[], &[]);
        assert_eq!(report.total_orders, 1);
        assert_eq!(report.total_revenue, 10.0);
    }
}
