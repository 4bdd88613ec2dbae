//! Text and JSON output.

use dental_catalog::{Catalog, OptionList, ProcedureChoice};
use dental_core::{FieldValueRef, FormField, Order, SummaryView};
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One summary row.
pub fn order_line(order: &Order) -> String {
    format!(
        "{:<7} {:<14} {:<11} net {:>10}  share {:>9}  {}",
        order.code().as_str(),
        order.procedure_name(),
        order.status().as_str(),
        order.net_price().to_string(),
        order.doctor_share().to_string(),
        order.care_provider()
    )
}

pub fn print_order(order: &Order) {
    println!("{}", order_line(order));
    println!("  id:         {}", order.id());
    println!("  ordered at: {}", order.ordered_at().format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  quantity:   {}", order.quantity());
    println!("  category:   {}", order.details().sub_category);

    let details = &order.details().procedure;
    for field in FormField::for_procedure(order.procedure()) {
        let Some(value) = details.value_of(*field) else {
            continue;
        };
        let shown = match value {
            FieldValueRef::Single(Some(v)) => v.to_string(),
            FieldValueRef::Single(None) => continue,
            FieldValueRef::Multi([]) => continue,
            FieldValueRef::Multi(values) => values
                .iter()
                .map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            FieldValueRef::Flag(true) => "yes".to_string(),
            FieldValueRef::Flag(false) => "no".to_string(),
        };
        println!("  {:<22}{}", format!("{field}:"), shown);
    }
}

pub fn print_summary(view: &SummaryView<'_>) {
    if view.rows.is_empty() {
        println!("No orders match.");
    }
    for order in &view.rows {
        println!("{}", order_line(order));
    }
    println!();
    println!(
        "{} orders, net {}, doctor share {}",
        view.rows.len(),
        view.total_net_price,
        view.total_doctor_share
    );

    let statuses: Vec<&str> = view.statuses.iter().map(|s| s.as_str()).collect();
    let providers: Vec<&str> = view.providers.iter().map(|p| p.as_str()).collect();
    println!("Statuses:  all, {}", statuses.join(", "));
    println!("Providers: all, {}", providers.join(", "));
}

pub fn print_option_list(list: &OptionList) {
    println!("{} ({} options)", list.kind(), list.len());
    for option in list.iter() {
        match option.price {
            Some(price) => println!(
                "  {:<20} {:<28} {:>9}",
                option.value,
                option.label,
                price.to_string()
            ),
            None => println!("  {:<20} {}", option.value, option.label),
        }
    }
}

pub fn print_catalog(catalog: &Catalog) {
    println!("Sub-categories:");
    for category in catalog.sub_categories() {
        println!("  {:<12} {}", category.value, category.label);
    }
    for list in catalog.lists() {
        println!();
        print_option_list(list);
    }
}

pub fn print_procedures(category: &str, procedures: &[&ProcedureChoice]) {
    if procedures.is_empty() {
        println!("No procedures under '{category}'.");
        return;
    }
    for procedure in procedures {
        println!("{:<12} {}", procedure.value, procedure.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dental_core::seed_orders;

    #[test]
    fn test_order_line_shows_code_status_and_money() {
        let orders = seed_orders().expect("seed orders should parse");
        let line = order_line(&orders[0]);
        assert!(line.starts_with("BG001"));
        assert!(line.contains("Processing"));
        assert!(line.contains("5500.00"));
        assert!(line.contains("550.00"));
        assert!(line.ends_with("Dr. Smith"));
    }
}
