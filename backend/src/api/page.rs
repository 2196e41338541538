//! Single-page HTML view of the dashboard.
//!
//! Every summary is rendered as a table; the count column carries a plain
//! CSS bar so the relative sizes read at a glance. No charting library.

use std::fmt::Write;

use crate::aggregate::{DisplayLabels, SummaryName, Summaries};
use crate::dashboard::Dashboard;
use crate::labels::NOT_SPECIFIED;

const STYLE: &str = "\
body{font-family:sans-serif;margin:0 auto;max-width:1100px;padding:1rem;color:#222}\
h1,h2{text-align:center}h2{margin-top:40px}\
table{border-collapse:collapse;width:80%;margin:auto}\
th{background:#004c70;color:#fff;padding:8px}\
td{padding:6px 8px}tr:nth-child(even){background:#f2f2f2}\
.bar{background:#c0392b;height:12px;display:inline-block;margin-right:6px}\
.meta{text-align:center;color:#666}";

/// Render the whole page.
pub fn render_page(dashboard: &Dashboard) -> String {
    let s = &dashboard.summaries;
    let l = &s.labels;
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<title>Mortality in Colombia - 2019</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body><h1>Mortality in Colombia - 2019</h1>");
    let _ = write!(
        html,
        "<p class=\"meta\">{} records from {}</p>",
        dashboard.record_count,
        escape(&dashboard.source)
    );

    for name in SummaryName::ALL {
        let _ = write!(html, "<h2 id=\"{}\">{}</h2>", name, escape(name.title()));
        html.push_str(&render_section(name, s, l));
    }

    html.push_str("</body></html>");
    html
}

fn render_section(name: SummaryName, s: &Summaries, l: &DisplayLabels) -> String {
    match name {
        SummaryName::Geographic => table(
            &[l.department, "Latitude", "Longitude", l.total],
            s.geographic.iter().map(|r| {
                (vec![text(&r.department), number(r.latitude), number(r.longitude)], r.total)
            }),
        ),
        SummaryName::Homicides => table(
            &[l.municipality, l.homicides],
            s.homicides.iter().map(|r| (vec![text(&r.municipality)], r.total)),
        ),
        SummaryName::Monthly => table(
            &[l.month, l.total],
            s.monthly.iter().map(|r| (vec![r.month_name.clone()], r.total)),
        ),
        SummaryName::LowMortality => table(
            &[l.municipality, l.total],
            s.low_mortality.iter().map(|r| (vec![text(&r.municipality)], r.total)),
        ),
        SummaryName::Causes => table(
            &[l.code, l.description, l.total],
            s.causes.iter().map(|r| (vec![text(&r.code), text(&r.description)], r.total)),
        ),
        SummaryName::SexByDepartment => table(
            &[l.department, l.sex, l.total],
            s.sex_by_department
                .iter()
                .map(|r| (vec![text(&r.department), r.sex.to_string()], r.total)),
        ),
        SummaryName::AgeGroups => table(
            &[l.age_group, l.total],
            s.age_groups.iter().map(|r| (vec![r.age_group.clone()], r.total)),
        ),
    }
}

/// Render rows of `(cells, count)`; the count column gets a bar scaled to
/// the section's largest count.
fn table<I>(headers: &[&str], rows: I) -> String
where
    I: Iterator<Item = (Vec<String>, usize)>,
{
    let rows: Vec<(Vec<String>, usize)> = rows.collect();
    let max = rows.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);
    let mut html = String::from("<table><thead><tr>");

    for header in headers {
        let _ = write!(html, "<th>{}</th>", escape(header));
    }
    html.push_str("</tr></thead><tbody>");

    for (cells, count) in &rows {
        html.push_str("<tr>");
        for cell in cells {
            let _ = write!(html, "<td>{}</td>", escape(cell));
        }
        let width = count * 200 / max;
        let _ = write!(
            html,
            "<td><span class=\"bar\" style=\"width:{}px\"></span>{}</td></tr>",
            width, count
        );
    }

    html.push_str("</tbody></table>");
    html
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Minimal HTML escaping for text nodes and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
