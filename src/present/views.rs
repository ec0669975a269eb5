use std::fmt;

use crate::process::Record;

const NAME: &str = "Name";
const PHONE: &str = "Phone / WhatsApp number";
const PRODUCT: &str = "Product name";
const QUANTITY: &str = "quantity";
const ADDRESS: &str = "address";

/// One row of the leads table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRow<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub source: &'static str,
    pub stage: &'static str,
    pub status: &'static str,
}

impl<'a> From<&'a Record> for LeadRow<'a> {
    fn from(r: &'a Record) -> Self {
        Self {
            name: r.get_or(NAME, "No Name"),
            phone: r.get_or(PHONE, "-"),
            source: "Website",
            stage: "New",
            status: "Active",
        }
    }
}

impl fmt::Display for LeadRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {}",
            self.name, self.phone, self.source, self.stage, self.status
        )
    }
}

impl LeadRow<'_> {
    /// Case-insensitive search over the row as displayed, fallbacks included.
    pub fn matches(&self, query: &str) -> bool {
        shown_text_matches(self, query)
    }
}

/// One row of the orders table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub product: &'a str,
    pub quantity: &'a str,
    pub address: &'a str,
    pub status: &'static str,
}

impl<'a> From<&'a Record> for OrderRow<'a> {
    fn from(r: &'a Record) -> Self {
        Self {
            name: r.get_or(NAME, "Guest"),
            phone: r.get_or(PHONE, "-"),
            product: r.get_or(PRODUCT, "Jhumar"),
            quantity: r.get_or(QUANTITY, "1"),
            address: r.get_or(ADDRESS, "-"),
            status: "Confirmed",
        }
    }
}

impl fmt::Display for OrderRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {} | {}",
            self.name, self.phone, self.product, self.quantity, self.address, self.status
        )
    }
}

impl OrderRow<'_> {
    pub fn matches(&self, query: &str) -> bool {
        shown_text_matches(self, query)
    }
}

fn shown_text_matches(row: &impl fmt::Display, query: &str) -> bool {
    row.to_string()
        .to_lowercase()
        .contains(&query.to_lowercase())
}

/// The detail popup for a single customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub product: String,
    pub quantity: String,
    pub address: String,
    pub status: &'static str,
    /// `tel:` link built from the raw phone cell; nothing after the scheme
    /// when the cell is missing.
    pub call_link: String,
    pub whatsapp_link: String,
}

impl From<&Record> for CustomerDetails {
    fn from(r: &Record) -> Self {
        let raw_phone = r.get(PHONE).unwrap_or("");
        Self {
            name: r.get_or(NAME, "N/A").to_string(),
            phone: r.get_or(PHONE, "N/A").to_string(),
            product: r.get_or(PRODUCT, "N/A").to_string(),
            quantity: r.get_or(QUANTITY, "N/A").to_string(),
            address: r.get_or(ADDRESS, "N/A").to_string(),
            status: "Confirmed",
            call_link: format!("tel:{}", raw_phone),
            whatsapp_link: format!("https://wa.me/{}", raw_phone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_row_fallbacks() {
        let rec = Record::from([("Name", "")]);
        let row = LeadRow::from(&rec);
        assert_eq!(row.name, "No Name");
        assert_eq!(row.phone, "-");
        assert_eq!(row.source, "Website");
    }

    #[test]
    fn order_row_fills_defaults() {
        let rec = Record::from([("Name", "Ada"), ("address", "1 Loop Rd")]);
        let row = OrderRow::from(&rec);
        assert_eq!(row.name, "Ada");
        assert_eq!(row.product, "Jhumar");
        assert_eq!(row.quantity, "1");
        assert_eq!(row.address, "1 Loop Rd");
        assert_eq!(row.status, "Confirmed");
    }

    #[test]
    fn details_links_use_raw_phone() {
        let rec = Record::from([("Name", "Ada"), ("Phone / WhatsApp number", "923001234567")]);
        let d = CustomerDetails::from(&rec);
        assert_eq!(d.name, "Ada");
        assert_eq!(d.product, "N/A");
        assert_eq!(d.call_link, "tel:923001234567");
        assert_eq!(d.whatsapp_link, "https://wa.me/923001234567");
    }

    #[test]
    fn rows_match_on_displayed_text() {
        let rec = Record::from([("Name", "Ada"), ("Product name", "")]);
        let order = OrderRow::from(&rec);
        assert_eq!(order.to_string(), "Ada | - | Jhumar | 1 | - | Confirmed");
        assert!(order.matches("jhumar"));
        assert!(order.matches("CONFIRMED"));
        assert!(!order.matches("ring"));

        let lead_rec = Record::from([("Name", "")]);
        let lead = LeadRow::from(&lead_rec);
        assert!(lead.matches("no name"));
        assert!(lead.matches("website"));
    }

    #[test]
    fn details_links_are_bare_without_phone() {
        let d = CustomerDetails::from(&Record::from([("Name", "Ada")]));
        assert_eq!(d.phone, "N/A");
        assert_eq!(d.call_link, "tel:");
        assert_eq!(d.whatsapp_link, "https://wa.me/");
    }
}
