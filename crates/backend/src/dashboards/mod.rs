//! Report aggregators. Each one fetches what it needs through a
//! [`DataStore`](crate::shared::data::DataStore) and reduces it with a pure
//! `compute_*` function.

pub mod d400_summary_report;
pub mod d401_orders_report;
pub mod d402_clients_report;
pub mod d403_attendance_report;

use contracts::domain::a001_order::Order;
use contracts::domain::a002_client::{Client, ClientId};
use contracts::shared::period::ReportRequest;
use std::collections::HashMap;

pub const UNKNOWN_CLIENT: &str = "Cliente desconocido";

/// Client names by id, with the order's own snapshot as a fallback
pub(crate) struct ClientNames<'a> {
    by_id: HashMap<ClientId, &'a Client>,
}

impl<'a> ClientNames<'a> {
    pub(crate) fn new(clients: &'a [Client]) -> Self {
        Self {
            by_id: clients.iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub(crate) fn resolve(&self, id: ClientId, snapshot: Option<&str>) -> String {
        match self.by_id.get(&id) {
            Some(client) => client.name.clone(),
            None => snapshot
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(UNKNOWN_CLIENT)
                .to_string(),
        }
    }
}

/// Orders inside the request range, oldest first. Stores are expected to
/// filter already; this keeps the aggregators honest when one does not.
pub(crate) fn orders_in_range<'a>(orders: &'a [Order], request: &ReportRequest) -> Vec<&'a Order> {
    let mut in_range: Vec<&Order> = orders.iter().filter(|o| request.contains(o.date)).collect();
    in_range.sort_by_key(|o| o.date);
    in_range
}

/// Per-client running totals kept in first-seen order
pub(crate) struct ClientTally {
    pub client_id: ClientId,
    pub snapshot_name: Option<String>,
    pub count: u32,
    pub total: f64,
}

pub(crate) fn tally_by_client<'a, I>(orders: I) -> Vec<ClientTally>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut index: HashMap<ClientId, usize> = HashMap::new();
    let mut tallies: Vec<ClientTally> = Vec::new();
    for order in orders {
        let slot = *index.entry(order.client_id).or_insert_with(|| {
            tallies.push(ClientTally {
                client_id: order.client_id,
                snapshot_name: order.client_name.clone(),
                count: 0,
                total: 0.0,
            });
            tallies.len() - 1
        });
        tallies[slot].count += 1;
        tallies[slot].total += order.total;
    }
    tallies
}
