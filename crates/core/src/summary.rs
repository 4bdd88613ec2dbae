//! Read-only summary projection of the order store.

use crate::order::{Order, OrderStatus};
use dental_types::{Money, NonEmptyText};
use serde::Serialize;
use std::str::FromStr;

/// Text that selects every value in a filter.
pub const FILTER_ALL: &str = "all";

/// Either no filter, or an exact match on one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    /// `all` (any case) or an empty string means no filter; anything else parses as `T`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(FILTER_ALL) {
            return Ok(Filter::All);
        }
        s.parse().map(Filter::Only)
    }
}

pub type StatusFilter = Filter<OrderStatus>;
pub type ProviderFilter = Filter<NonEmptyText>;

/// Orders matching both filters, in their existing relative order.
pub fn filter_orders<'a>(
    orders: &'a [Order],
    status: &StatusFilter,
    provider: &ProviderFilter,
) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|o| status.matches(&o.status()) && provider.matches(o.care_provider()))
        .collect()
}

/// Statuses present in `orders`, first-seen order.
pub fn distinct_statuses(orders: &[Order]) -> Vec<OrderStatus> {
    let mut seen = Vec::new();
    for order in orders {
        if !seen.contains(&order.status()) {
            seen.push(order.status());
        }
    }
    seen
}

/// Care providers present in `orders`, first-seen order.
pub fn distinct_providers(orders: &[Order]) -> Vec<&NonEmptyText> {
    let mut seen: Vec<&NonEmptyText> = Vec::new();
    for order in orders {
        if !seen.contains(&order.care_provider()) {
            seen.push(order.care_provider());
        }
    }
    seen
}

/// What the summary screen renders: filtered rows, the filter choices and row totals.
#[derive(Debug, Serialize)]
pub struct SummaryView<'a> {
    pub rows: Vec<&'a Order>,
    pub statuses: Vec<OrderStatus>,
    pub providers: Vec<&'a NonEmptyText>,
    pub total_net_price: Money,
    pub total_doctor_share: Money,
}

impl<'a> SummaryView<'a> {
    pub fn build(orders: &'a [Order], status: &StatusFilter, provider: &ProviderFilter) -> Self {
        let rows = filter_orders(orders, status, provider);
        let total_net_price = rows.iter().map(|o| o.net_price()).sum();
        let total_doctor_share = rows.iter().map(|o| o.doctor_share()).sum();
        Self {
            rows,
            statuses: distinct_statuses(orders),
            providers: distinct_providers(orders),
            total_net_price,
            total_doctor_share,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::order_with;

    fn orders() -> Vec<Order> {
        vec![
            order_with("BG001", OrderStatus::Processing, "Dr. Smith", 5500),
            order_with("GS001", OrderStatus::Processing, "Dr. Lee", 4800),
            order_with("BG002", OrderStatus::Completed, "Dr. Wilson", 6200),
            order_with("GS002", OrderStatus::Cancelled, "Dr. Anderson", 5100),
            order_with("BG003", OrderStatus::Pending, "Dr. Smith", 3600),
        ]
    }

    fn codes(rows: &[&Order]) -> Vec<String> {
        rows.iter().map(|o| o.code().to_string()).collect()
    }

    fn provider(name: &str) -> ProviderFilter {
        Filter::Only(NonEmptyText::new(name).unwrap())
    }

    #[test]
    fn test_no_filters_returns_everything_in_order() {
        let orders = orders();
        let rows = filter_orders(&orders, &Filter::All, &Filter::All);
        assert_eq!(rows.len(), orders.len());
        for (row, order) in rows.iter().zip(&orders) {
            assert_eq!(row.id(), order.id());
        }
    }

    #[test]
    fn test_status_filter() {
        let orders = orders();
        let rows = filter_orders(&orders, &Filter::Only(OrderStatus::Processing), &Filter::All);
        assert_eq!(codes(&rows), vec!["BG001", "GS001"]);
    }

    #[test]
    fn test_provider_filter_preserves_relative_order() {
        let orders = orders();
        let rows = filter_orders(&orders, &Filter::All, &provider("Dr. Smith"));
        assert_eq!(codes(&rows), vec!["BG001", "BG003"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let orders = orders();
        let rows = filter_orders(
            &orders,
            &Filter::Only(OrderStatus::Pending),
            &provider("Dr. Smith"),
        );
        assert_eq!(codes(&rows), vec!["BG003"]);

        let rows = filter_orders(
            &orders,
            &Filter::Only(OrderStatus::Completed),
            &provider("Dr. Lee"),
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        let orders = orders();
        assert_eq!(
            distinct_statuses(&orders),
            vec![
                OrderStatus::Processing,
                OrderStatus::Completed,
                OrderStatus::Cancelled,
                OrderStatus::Pending
            ]
        );
        let providers: Vec<&str> = distinct_providers(&orders)
            .into_iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(
            providers,
            vec!["Dr. Smith", "Dr. Lee", "Dr. Wilson", "Dr. Anderson"]
        );
    }

    #[test]
    fn test_filter_parses_all_and_values() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), Filter::All);
        assert_eq!("ALL".parse::<StatusFilter>().unwrap(), Filter::All);
        assert_eq!(
            "completed".parse::<StatusFilter>().unwrap(),
            Filter::Only(OrderStatus::Completed)
        );
        assert!("shipped".parse::<StatusFilter>().is_err());
        assert_eq!("Dr. Lee".parse::<ProviderFilter>().unwrap(), provider("Dr. Lee"));
    }

    #[test]
    fn test_summary_view_totals_filtered_rows() {
        let orders = orders();
        let view = SummaryView::build(&orders, &Filter::All, &provider("Dr. Smith"));

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.total_net_price, Money::from_whole(9100));
        assert_eq!(view.total_doctor_share, Money::from_whole(910));
        assert_eq!(view.statuses.len(), 4, "choices come from all orders");
        assert_eq!(view.providers.len(), 4);
    }
}
