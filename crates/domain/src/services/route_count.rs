//! Route `event_count` adjustments.
//!
//! Every change to which events reference a route is reduced to a list of
//! `(route_id, delta)` pairs, one per distinct route, sorted by route id so
//! concurrent writers lock route rows in the same order.

use std::collections::BTreeMap;
use uuid::Uuid;

/// A signed change to one route's `event_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteCountDelta {
    pub route_id: Uuid,
    pub delta: i32,
}

fn collect(deltas: BTreeMap<Uuid, i32>) -> Vec<RouteCountDelta> {
    deltas
        .into_iter()
        .filter(|(_, delta)| *delta != 0)
        .map(|(route_id, delta)| RouteCountDelta { route_id, delta })
        .collect()
}

/// `count` events were created on `route_id`.
pub fn for_created(route_id: Option<Uuid>, count: usize) -> Vec<RouteCountDelta> {
    let mut deltas = BTreeMap::new();
    if let Some(route_id) = route_id {
        deltas.insert(route_id, count as i32);
    }
    collect(deltas)
}

/// One event moved from `old` to `new`.
pub fn for_route_change(old: Option<Uuid>, new: Option<Uuid>) -> Vec<RouteCountDelta> {
    let mut deltas = BTreeMap::new();
    if let Some(old) = old {
        *deltas.entry(old).or_insert(0) -= 1;
    }
    if let Some(new) = new {
        *deltas.entry(new).or_insert(0) += 1;
    }
    collect(deltas)
}

/// The given events were deleted; one entry per deleted row.
pub fn for_deleted<I>(route_ids: I) -> Vec<RouteCountDelta>
where
    I: IntoIterator<Item = Option<Uuid>>,
{
    let mut deltas = BTreeMap::new();
    for route_id in route_ids.into_iter().flatten() {
        *deltas.entry(route_id).or_insert(0) -= 1;
    }
    collect(deltas)
}
