use chrono::NaiveDateTime;
use contracts::dashboards::d402_clients_report::{
    ClientActivityBucket, ClientRevenue, ClientsReport, CreditAnalysis, Debtor, RetentionSegment,
    RouteCount,
};
use contracts::domain::a001_order::Order;
use contracts::domain::a002_client::{Client, ClientId};
use contracts::shared::period::ReportRequest;
use std::collections::{HashMap, HashSet};

use super::super::{orders_in_range, tally_by_client, ClientNames};
use crate::shared::data::DataStore;
use crate::shared::error::{ReportError, ReportSection};
use crate::shared::period::group_by_period;
use crate::shared::rates;

const TOP_CLIENTS: usize = 10;
const TOP_DEBTORS: usize = 5;

/// Retention bands: label, min orders, max orders
const RETENTION_BANDS: [(&str, u32, Option<u32>); 4] = [
    ("1 pedido", 1, Some(1)),
    ("2-5 pedidos", 2, Some(5)),
    ("6-10 pedidos", 6, Some(10)),
    ("Más de 10 pedidos", 11, None),
];

pub async fn get_clients_report(
    store: &dyn DataStore,
    request: &ReportRequest,
) -> Result<ClientsReport, ReportError> {
    let fail = |e| ReportError::data_fetch(ReportSection::Clients, request, e);
    let (orders, clients) =
        tokio::try_join!(store.query_orders(request), store.query_clients()).map_err(fail)?;
    Ok(compute_clients(request, &orders, &clients))
}

pub fn compute_clients(request: &ReportRequest, orders: &[Order], clients: &[Client]) -> ClientsReport {
    let names = ClientNames::new(clients);
    let in_range = orders_in_range(orders, request);

    let client_activity = group_by_period(orders, request, |o| o.date)
        .into_iter()
        .map(|b| ClientActivityBucket {
            period: b.label,
            active_clients: b.items.iter().map(|o| o.client_id).collect::<HashSet<_>>().len() as u32,
            new_clients: None,
        })
        .collect();

    // Shares are against the revenue of this result set
    let mut revenue = tally_by_client(in_range.iter().copied().filter(|o| o.is_settled()));
    let settled_total: f64 = revenue.iter().map(|t| t.total).sum();
    revenue.sort_by(|a, b| b.total.total_cmp(&a.total));
    let top_clients_by_revenue = revenue
        .into_iter()
        .take(TOP_CLIENTS)
        .map(|t| ClientRevenue {
            client_id: t.client_id,
            name: names.resolve(t.client_id, t.snapshot_name.as_deref()),
            revenue: t.total,
            orders: t.count,
            percentage: rates::percent_one_decimal(t.total, settled_total),
        })
        .collect();

    let credit = CreditAnalysis {
        clients_with_credit: clients.iter().filter(|c| c.has_credit).count() as u32,
        total_credit_amount: in_range
            .iter()
            .filter(|o| o.is_credit)
            .map(|o| o.outstanding_debt())
            .sum(),
        average_payment_days: None,
    };

    ClientsReport {
        active_clients: in_range.iter().map(|o| o.client_id).collect::<HashSet<_>>().len() as u32,
        client_activity,
        top_clients_by_revenue,
        clients_by_route: route_distribution(clients),
        credit,
        top_debtors: top_debtors(request, &in_range, &names),
        retention: retention_segments(&in_range),
    }
}

fn route_distribution(clients: &[Client]) -> Vec<RouteCount> {
    let mut routes: Vec<RouteCount> = Vec::new();
    for client in clients {
        let mut seen = HashSet::new();
        for route in client.routes.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
            if !seen.insert(route) {
                continue;
            }
            match routes.iter_mut().find(|r| r.route == route) {
                Some(entry) => entry.clients += 1,
                None => routes.push(RouteCount {
                    route: route.to_string(),
                    clients: 1,
                }),
            }
        }
    }
    routes.sort_by(|a, b| b.clients.cmp(&a.clients));
    routes
}

struct DebtTally {
    client_id: ClientId,
    snapshot_name: Option<String>,
    total: f64,
    orders: u32,
    oldest: NaiveDateTime,
}

fn top_debtors(request: &ReportRequest, orders: &[&Order], names: &ClientNames<'_>) -> Vec<Debtor> {
    let mut index: HashMap<ClientId, usize> = HashMap::new();
    let mut tallies: Vec<DebtTally> = Vec::new();

    for order in orders.iter().filter(|o| o.is_credit) {
        let debt = order.outstanding_debt();
        if debt <= 0.0 {
            continue;
        }
        let slot = *index.entry(order.client_id).or_insert_with(|| {
            tallies.push(DebtTally {
                client_id: order.client_id,
                snapshot_name: order.client_name.clone(),
                total: 0.0,
                orders: 0,
                oldest: order.date,
            });
            tallies.len() - 1
        });
        let tally = &mut tallies[slot];
        tally.total += debt;
        tally.orders += 1;
        tally.oldest = tally.oldest.min(order.date);
    }

    tallies.sort_by(|a, b| b.total.total_cmp(&a.total));
    tallies
        .into_iter()
        .take(TOP_DEBTORS)
        .map(|t| Debtor {
            client_id: t.client_id,
            name: names.resolve(t.client_id, t.snapshot_name.as_deref()),
            total_debt: t.total,
            debt_orders: t.orders,
            days_outstanding: (request.end_date - t.oldest.date()).num_days().max(0),
        })
        .collect()
}

fn retention_segments(orders: &[&Order]) -> Vec<RetentionSegment> {
    let per_client = tally_by_client(orders.iter().copied());
    RETENTION_BANDS
        .iter()
        .map(|(segment, min, max)| RetentionSegment {
            segment: segment.to_string(),
            min_orders: *min,
            max_orders: *max,
            count: per_client
                .iter()
                .filter(|t| t.count >= *min && max.map_or(true, |m| t.count <= m))
                .count() as u32,
        })
        .collect()
}
