use crate::process::RecordSet;

pub const CHART_LABEL: &str = "Order Volume by Product";
pub const MAX_CHART_PRODUCTS: usize = 7;

/// Headline numbers for the overview tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub leads: usize,
    pub orders: usize,
    /// Orders per lead as a percentage, e.g. `"100.0%"`; `"0%"` with no leads.
    pub conversion_rate: String,
    /// `(product, orders)` pairs for the chart.
    pub product_volume: Vec<(String, usize)>,
}

impl Summary {
    pub fn new(leads: &RecordSet, orders: &RecordSet) -> Self {
        let conversion_rate = if leads.is_empty() {
            "0%".to_string()
        } else {
            format!("{:.1}%", orders.len() as f64 / leads.len() as f64 * 100.0)
        };

        Self {
            leads: leads.len(),
            orders: orders.len(),
            conversion_rate,
            product_volume: product_volume(orders),
        }
    }
}

/// Orders per product in first-seen order, capped at
/// [`MAX_CHART_PRODUCTS`]. A blank product counts as `"Unknown"`; with no
/// orders at all the chart gets a single `("No Data", 0)` bar.
pub fn product_volume(orders: &RecordSet) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for order in orders {
        let product = order.get_or("Product name", "Unknown");
        match counts.iter_mut().find(|(p, _)| p.as_str() == product) {
            Some((_, n)) => *n += 1,
            None => counts.push((product.to_string(), 1)),
        }
    }

    if counts.is_empty() {
        return vec![("No Data".to_string(), 0)];
    }
    counts.truncate(MAX_CHART_PRODUCTS);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::parse_csv;

    #[test]
    fn counts_and_conversion() {
        let rs = parse_csv("Name,Product name\nA,Ring\nB,Chain\nC,Ring");
        let s = Summary::new(&rs, &rs);
        assert_eq!(s.leads, 3);
        assert_eq!(s.orders, 3);
        assert_eq!(s.conversion_rate, "100.0%");
        assert_eq!(
            s.product_volume,
            vec![("Ring".to_string(), 2), ("Chain".to_string(), 1)]
        );
    }

    #[test]
    fn conversion_rounds_to_one_decimal() {
        let leads = parse_csv("Name\nA\nB\nC");
        let orders = parse_csv("Name\nA");
        assert_eq!(Summary::new(&leads, &orders).conversion_rate, "33.3%");
    }

    #[test]
    fn no_leads_is_zero_percent() {
        let empty = RecordSet::default();
        let s = Summary::new(&empty, &empty);
        assert_eq!(s.conversion_rate, "0%");
        assert_eq!(s.product_volume, vec![("No Data".to_string(), 0)]);
    }

    #[test]
    fn blank_product_is_unknown() {
        let rs = parse_csv("Name,Product name\nA,\nB");
        assert_eq!(product_volume(&rs), vec![("Unknown".to_string(), 2)]);
    }

    #[test]
    fn chart_is_capped() {
        let mut text = String::from("Product name");
        for i in 0..10 {
            text.push_str(&format!("\np{}", i));
        }
        let volume = product_volume(&parse_csv(&text));
        assert_eq!(volume.len(), MAX_CHART_PRODUCTS);
        assert_eq!(volume[0].0, "p0");
        assert_eq!(volume[6].0, "p6");
    }
}
