use std::fmt;

use url::form_urlencoded;

use crate::{
    models::payment::{
        DashboardFilter, PaymentPage, PaymentStats, StatusFilter, ROW_TIMESTAMP_FORMAT,
    },
    repos::file::ReceiptStore,
};

pub struct DashboardView<'a> {
    pub page: &'a PaymentPage,
    pub stats: &'a PaymentStats,
    pub filter: &'a DashboardFilter,
    pub receipts: &'a ReceiptStore,
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem; color: #1f2933; }
.stats { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
.stat { border: 1px solid #d9e2ec; border-radius: 6px; padding: .75rem 1.25rem; min-width: 8rem; }
.stat strong { display: block; font-size: 1.5rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #e4e7eb; padding: .5rem; text-align: left; }
.status-badge.confirmed { color: #0e7c3a; }
.status-badge.pending { color: #b44d12; }
.pagination { margin-top: 1rem; display: flex; gap: .75rem; }
"#;

// Toggling posts JSON and reloads, stats are refreshed from the polling endpoint
const SCRIPT: &str = r#"
document.querySelectorAll('.toggle-confirmation').forEach((button) => {
  button.addEventListener('click', async () => {
    const response = await fetch('/admin/toggle-confirmation/', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({
        payment_id: Number(button.dataset.paymentId),
        confirmed: button.dataset.confirmed !== 'true',
      }),
    });
    const result = await response.json();
    if (result.success) { window.location.reload(); } else { alert(result.message); }
  });
});
setInterval(async () => {
  const response = await fetch('/admin/api/dashboard-data/');
  if (!response.ok) { return; }
  const { stats } = await response.json();
  for (const [key, value] of Object.entries(stats)) {
    const card = document.querySelector(`[data-stat="${key}"]`);
    if (card) { card.textContent = value; }
  }
}, 30000);
"#;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `?search=..&status=..&page=N`, keeping the active filters across pages
pub fn page_link(filter: &DashboardFilter, page: i64) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if !filter.search.is_empty() {
        query.append_pair("search", &filter.search);
    }
    query.append_pair("status", filter.status.as_str());
    query.append_pair("page", &page.to_string());

    format!("?{}", query.finish())
}

fn render_stats(f: &mut fmt::Formatter<'_>, stats: &PaymentStats) -> fmt::Result {
    let cards = [
        ("total", "Total payments", stats.total),
        ("confirmed", "Confirmed", stats.confirmed),
        ("pending", "Pending", stats.pending),
        ("total_amount", "Confirmed amount", stats.total_amount),
    ];

    f.write_str("<section class=\"stats\">")?;
    for (key, label, value) in cards {
        write!(
            f,
            "<div class=\"stat\">{label}<strong data-stat=\"{key}\">{value}</strong></div>"
        )?;
    }
    f.write_str("</section>")
}

fn render_filters(f: &mut fmt::Formatter<'_>, filter: &DashboardFilter) -> fmt::Result {
    write!(
        f,
        "<form method=\"get\" action=\"/admin/\">\
         <input type=\"search\" name=\"search\" placeholder=\"Name or matric number\" value=\"{}\">\
         <select name=\"status\">",
        escape_html(&filter.search)
    )?;

    for (status, label) in [
        (StatusFilter::All, "All"),
        (StatusFilter::Confirmed, "Confirmed"),
        (StatusFilter::Pending, "Pending"),
    ] {
        let selected = if status == filter.status { " selected" } else { "" };
        write!(
            f,
            "<option value=\"{}\"{selected}>{label}</option>",
            status.as_str()
        )?;
    }

    f.write_str("</select><button type=\"submit\">Filter</button></form>")
}

fn render_rows(f: &mut fmt::Formatter<'_>, view: &DashboardView<'_>) -> fmt::Result {
    f.write_str(
        "<table><thead><tr><th>#</th><th>Name</th><th>Matric number</th><th>Amount</th>\
         <th>Submitted</th><th>Receipt</th><th>Status</th><th></th></tr></thead><tbody>",
    )?;

    if view.page.payments.is_empty() {
        f.write_str("<tr><td colspan=\"8\">No payments found.</td></tr>")?;
    }

    for payment in &view.page.payments {
        let receipt = match view.receipts.url_for(&payment.receipt) {
            Some(url) => format!(
                "<a href=\"{}\" target=\"_blank\">View</a>",
                escape_html(&url)
            ),
            None => "-".to_owned(),
        };
        let (badge, action) = if payment.confirmed {
            ("confirmed", "Unconfirm")
        } else {
            ("pending", "Confirm")
        };

        write!(
            f,
            "<tr><td>{id}</td><td>{name}</td><td>{matric}</td><td>{amount}</td><td>{timestamp}</td>\
             <td>{receipt}</td><td><span class=\"status-badge {badge}\">{badge}</span></td>\
             <td><button class=\"toggle-confirmation\" data-payment-id=\"{id}\" data-confirmed=\"{confirmed}\">{action}</button></td></tr>",
            id = payment.id,
            name = escape_html(&payment.name),
            matric = payment.matric_number,
            amount = payment.amount,
            timestamp = payment.timestamp.format(ROW_TIMESTAMP_FORMAT),
            confirmed = payment.confirmed,
        )?;
    }

    f.write_str("</tbody></table>")
}

fn render_pagination(f: &mut fmt::Formatter<'_>, view: &DashboardView<'_>) -> fmt::Result {
    let page = view.page;
    f.write_str("<nav class=\"pagination\">")?;

    if page.has_previous() {
        write!(
            f,
            "<a href=\"{}\">&laquo; first</a><a href=\"{}\">previous</a>",
            escape_html(&page_link(view.filter, 1)),
            escape_html(&page_link(view.filter, page.number - 1))
        )?;
    }

    write!(
        f,
        "<span>Page {} of {} ({}&ndash;{} of {})</span>",
        page.number,
        page.num_pages,
        page.start_index(),
        page.end_index(),
        page.total_count
    )?;

    if page.has_next() {
        write!(
            f,
            "<a href=\"{}\">next</a><a href=\"{}\">last &raquo;</a>",
            escape_html(&page_link(view.filter, page.number + 1)),
            escape_html(&page_link(view.filter, page.num_pages))
        )?;
    }

    f.write_str("</nav>")
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>Payment dashboard</title><style>{STYLE}</style></head><body>\
             <h1>Payment dashboard</h1>"
        )?;

        render_stats(f, self.stats)?;
        render_filters(f, self.filter)?;
        render_rows(f, self)?;
        render_pagination(f, self)?;

        write!(f, "<script>{SCRIPT}</script></body></html>")
    }
}

pub fn render_dashboard(view: &DashboardView<'_>) -> String {
    view.to_string()
}
