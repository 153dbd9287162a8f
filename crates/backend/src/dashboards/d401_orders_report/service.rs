use contracts::dashboards::d401_orders_report::{
    AverageOrderValue, ClientOrders, OrdersBucket, OrdersReport, StatusShare,
};
use contracts::domain::a001_order::{Order, OrderStatus};
use contracts::domain::a002_client::Client;
use contracts::shared::period::ReportRequest;

use super::super::{orders_in_range, tally_by_client, ClientNames};
use crate::shared::data::DataStore;
use crate::shared::error::{ReportError, ReportSection};
use crate::shared::period::group_by_period;
use crate::shared::rates;

const TOP_CLIENTS: usize = 5;

pub async fn get_orders_report(
    store: &dyn DataStore,
    request: &ReportRequest,
) -> Result<OrdersReport, ReportError> {
    let fail = |e| ReportError::data_fetch(ReportSection::Orders, request, e);
    let (orders, clients) =
        tokio::try_join!(store.query_orders(request), store.query_clients()).map_err(fail)?;
    Ok(compute_orders(request, &orders, &clients))
}

pub fn compute_orders(request: &ReportRequest, orders: &[Order], clients: &[Client]) -> OrdersReport {
    let buckets = group_by_period(orders, request, |o| o.date);

    let orders_over_time = buckets
        .iter()
        .map(|b| OrdersBucket {
            period: b.label.clone(),
            count: b.len() as u32,
            total: b.items.iter().map(|o| o.total).sum(),
        })
        .collect::<Vec<_>>();

    let average_order_value = orders_over_time
        .iter()
        .map(|b| AverageOrderValue {
            period: b.period.clone(),
            average: rates::ratio(b.total, b.count as f64),
        })
        .collect();

    let in_range = orders_in_range(orders, request);

    let status_distribution = OrderStatus::ALL
        .iter()
        .map(|status| {
            let matching = in_range.iter().filter(|o| o.status == *status);
            let (count, total) = matching.fold((0u32, 0.0), |(c, t), o| (c + 1, t + o.total));
            StatusShare {
                status: *status,
                name: status.label().to_string(),
                count,
                total,
            }
        })
        .collect();

    // Stable sort keeps first-seen order for full ties
    let mut tallies = tally_by_client(in_range.iter().copied());
    tallies.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.total.total_cmp(&a.total))
    });
    let names = ClientNames::new(clients);
    let top_clients_by_orders = tallies
        .into_iter()
        .take(TOP_CLIENTS)
        .map(|t| ClientOrders {
            client_id: t.client_id,
            name: names.resolve(t.client_id, t.snapshot_name.as_deref()),
            orders: t.count,
            total: t.total,
        })
        .collect();

    OrdersReport {
        orders_over_time,
        status_distribution,
        top_clients_by_orders,
        average_order_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::fixtures::*;

    #[test]
    fn test_status_distribution_always_lists_all_three() {
        let report = compute_orders(&june_week(), &[], &[]);

        let names: Vec<_> = report.status_distribution.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Liquidado", "Abono", "No pagado"]);
        assert!(report.status_distribution.iter().all(|s| s.count == 0 && s.total == 0.0));
        assert!(report.orders_over_time.is_empty());
        assert!(report.top_clients_by_orders.is_empty());
    }

    #[test]
    fn test_status_totals_conserve_order_totals() {
        let ana = client("Ana", &[], true);
        let orders = vec![
            order(&ana, at(6, 2, 8, 0), 100.0, OrderStatus::Liquidado, None),
            order(&ana, at(6, 3, 8, 0), 50.5, OrderStatus::Abono, Some(20.0)),
            order(&ana, at(6, 3, 9, 0), 80.25, OrderStatus::NoPagado, Some(80.25)),
            order(&ana, at(6, 8, 23, 59), 19.25, OrderStatus::Liquidado, None),
            order(&ana, at(6, 9, 0, 0), 1000.0, OrderStatus::Liquidado, None),
        ];

        let report = compute_orders(&june_week(), &orders, &[]);

        let by_status: f64 = report.status_distribution.iter().map(|s| s.total).sum();
        let by_bucket: f64 = report.orders_over_time.iter().map(|b| b.total).sum();
        assert_eq!(by_status, 250.0);
        assert_eq!(by_bucket, 250.0);
        let counts: u32 = report.status_distribution.iter().map(|s| s.count).sum();
        assert_eq!(counts, 4);
    }

    #[test]
    fn test_weekly_buckets_and_average_value() {
        let ana = client("Ana", &[], false);
        let orders = vec![
            order(&ana, at(6, 4, 10, 0), 30.0, OrderStatus::Liquidado, None),
            order(&ana, at(6, 2, 10, 0), 100.0, OrderStatus::Liquidado, None),
            order(&ana, at(6, 2, 12, 0), 50.0, OrderStatus::Liquidado, None),
        ];

        let report = compute_orders(&june_week(), &orders, &[]);

        assert_eq!(report.orders_over_time.len(), 2);
        assert_eq!(report.orders_over_time[0].period, "Lunes");
        assert_eq!(report.orders_over_time[0].count, 2);
        assert_eq!(report.average_order_value[0].average, 75.0);
        assert_eq!(report.orders_over_time[1].period, "Miércoles");
        assert_eq!(report.average_order_value[1].average, 30.0);
    }

    #[test]
    fn test_top_clients_rank_by_count_then_total_then_first_seen() {
        let a = client("A", &[], false);
        let b = client("B", &[], false);
        let c = client("C", &[], false);
        let d = client("D", &[], false);
        let orders = vec![
            order(&a, at(6, 2, 8, 0), 10.0, OrderStatus::Liquidado, None),
            order(&b, at(6, 2, 9, 0), 10.0, OrderStatus::Liquidado, None),
            order(&c, at(6, 2, 10, 0), 40.0, OrderStatus::Liquidado, None),
            order(&d, at(6, 3, 8, 0), 1.0, OrderStatus::Liquidado, None),
            order(&d, at(6, 3, 9, 0), 1.0, OrderStatus::Liquidado, None),
        ];

        let report = compute_orders(&june_week(), &orders, &[a.clone(), b.clone(), c.clone(), d.clone()]);

        let ranked: Vec<_> = report.top_clients_by_orders.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(ranked, vec!["D", "C", "A", "B"]);
        assert_eq!(report.top_clients_by_orders[0].orders, 2);
    }

    #[test]
    fn test_top_clients_capped_at_five() {
        let clients: Vec<_> = (0..7).map(|i| client(&format!("C{i}"), &[], false)).collect();
        let orders: Vec<_> = clients
            .iter()
            .enumerate()
            .map(|(i, c)| order(c, at(6, 2, 8 + i as u32, 0), 10.0, OrderStatus::Liquidado, None))
            .collect();

        let report = compute_orders(&june_week(), &orders, &clients);
        assert_eq!(report.top_clients_by_orders.len(), 5);
    }
}
