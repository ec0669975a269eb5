use std::io::{self, Stdout, Write};
use tracing::{info, warn};

use super::{
    CustomerDetails, LeadRow, NotificationQueue, OrderRow, Presenter, RecordKind, Summary,
    CHART_LABEL,
};
use crate::{poll::ChangeEvent, process::RecordSet};

/// Plain-text presenter: tables and panels go to `out`, events to the log.
pub struct ConsolePresenter<W: Write> {
    out: W,
    /// Only rows whose displayed text contains this (case-insensitive) are printed.
    filter: Option<String>,
}

impl ConsolePresenter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, filter: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn shows(&self, matches: impl Fn(&str) -> bool) -> bool {
        self.filter.as_deref().map_or(true, matches)
    }

    fn write_lines(&mut self, lines: &[String]) {
        let mut result = Ok(());
        for line in lines {
            result = writeln!(self.out, "{}", line);
            if result.is_err() {
                break;
            }
        }
        if let Err(e) = result.and_then(|_| self.out.flush()) {
            warn!("console write failed: {}", e);
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn render_records(&mut self, kind: RecordKind, records: &RecordSet) {
        let mut lines = vec![format!("== {} ({}) ==", kind.as_str(), records.len())];
        if records.is_empty() {
            lines.push("No data found".to_string());
        }

        for (i, rec) in records.iter().enumerate() {
            let (shown, text) = match kind {
                RecordKind::Leads => {
                    let row = LeadRow::from(rec);
                    (self.shows(|q| row.matches(q)), row.to_string())
                }
                RecordKind::Orders => {
                    let row = OrderRow::from(rec);
                    (self.shows(|q| row.matches(q)), row.to_string())
                }
            };
            if shown {
                lines.push(format!("[{}] {}", i, text));
            }
        }
        self.write_lines(&lines);
    }

    fn notify(&mut self, event: &ChangeEvent) {
        info!(
            index = event.index,
            at = %event.time_label(),
            "{}: {}",
            event.title(),
            event.message()
        );
    }

    fn render_summary(&mut self, summary: &Summary) {
        let mut lines = vec![format!(
            "leads: {}  orders: {}  conversion: {}",
            summary.leads, summary.orders, summary.conversion_rate
        )];
        lines.push(format!("{}:", CHART_LABEL));
        for (product, count) in &summary.product_volume {
            lines.push(format!("  {:<24} {}", product, count));
        }
        self.write_lines(&lines);
    }

    fn render_notifications(&mut self, queue: &NotificationQueue) {
        let lines = if queue.is_empty() {
            vec!["No new orders".to_string()]
        } else {
            let mut lines = vec![format!("{} new", queue.len())];
            lines.extend(queue.iter().enumerate().map(|(pos, ev)| {
                format!(
                    "({}) {} {} [{}]",
                    pos,
                    ev.title(),
                    ev.message(),
                    ev.time_label()
                )
            }));
            lines
        };
        self.write_lines(&lines);
    }

    fn show_details(&mut self, kind: RecordKind, d: &CustomerDetails) {
        let lines = vec![
            format!("-- customer details ({}) --", kind.as_str()),
            format!("Full Name:      {}", d.name),
            format!("Phone/WhatsApp: {}", d.phone),
            format!("Product:        {}", d.product),
            format!("Quantity:       {}", d.quantity),
            format!("Address:        {}", d.address),
            format!("Order Status:   {}", d.status),
            format!("Call:           {}", d.call_link),
            format!("WhatsApp:       {}", d.whatsapp_link),
        ];
        self.write_lines(&lines);
    }

    fn show_status(&mut self, status: &str) {
        self.write_lines(&[status.to_string()]);
    }

    fn set_filter(&mut self, query: Option<String>) {
        self.filter = query.filter(|q| !q.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::parse_csv;

    fn output(p: ConsolePresenter<Vec<u8>>) -> String {
        String::from_utf8(p.into_inner()).unwrap()
    }

    #[test]
    fn renders_order_rows_with_defaults() {
        let rs = parse_csv("Name,quantity\nAda,3\n,");
        let mut p = ConsolePresenter::new(Vec::new());
        p.render_records(RecordKind::Orders, &rs);

        let out = output(p);
        assert!(out.contains("== orders (2) =="));
        assert!(out.contains("[0] Ada | - | Jhumar | 3 | - | Confirmed"));
        assert!(out.contains("[1] Guest | - | Jhumar | 1 | - | Confirmed"));
    }

    #[test]
    fn filter_hides_non_matching_rows() {
        let rs = parse_csv("Name\nAda\nGrace");
        let mut p = ConsolePresenter::new(Vec::new());
        p.set_filter(Some("GRA".to_string()));
        p.render_records(RecordKind::Leads, &rs);

        let out = output(p);
        assert!(out.contains("[1] Grace"));
        assert!(!out.contains("Ada"));
    }

    #[test]
    fn blank_filter_is_ignored() {
        let mut p = ConsolePresenter::new(Vec::new());
        p.set_filter(Some("  ".to_string()));
        p.render_records(RecordKind::Leads, &parse_csv("Name\nAda"));
        assert!(output(p).contains("Ada"));
    }

    #[test]
    fn empty_tables_and_queue_say_so() {
        let mut p = ConsolePresenter::new(Vec::new());
        p.render_records(RecordKind::Leads, &RecordSet::default());
        p.render_notifications(&NotificationQueue::new());

        let out = output(p);
        assert!(out.contains("No data found"));
        assert!(out.contains("No new orders"));
    }

    #[test]
    fn filter_matches_fallback_text_shown_in_the_row() {
        let rs = parse_csv("Name,Product name\nAda,\nGrace,Ring");
        let mut p = ConsolePresenter::new(Vec::new());
        p.set_filter(Some("jhumar".to_string()));
        p.render_records(RecordKind::Orders, &rs);

        let out = output(p);
        assert!(out.contains("[0] Ada | - | Jhumar | 1 | - | Confirmed"));
        assert!(!out.contains("Grace"));
    }
}
