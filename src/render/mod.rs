//! Server-rendered dashboard page.
//!
//! Assembles the full HTML view over the aggregator's outputs: the four
//! summary metrics, the emergency-type and reporter-status charts, ONE
//! clustered marker map, the victims-by-type chart, and the filterable
//! table with its CSV download action. Charts and the map are drawn
//! client-side (Plotly, Leaflet + markercluster from CDN) from JSON
//! computed here; no aggregation happens in the browser.
//!
//! The date inputs are bounded and pre-filled from the table's parsed date
//! range but are display-only.
// TODO: wire the date-range selection into the filtered view; today it
// round-trips through the query string without constraining the table.

pub mod charts;

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use url::form_urlencoded;

use crate::analysis::{
    self, EmergencyFilter, date_bounds, distinct, emergency_types, filter_rows, group_tally,
    map_center, markers, sum_by_category, sum_numeric,
};
use crate::model::{
    FIELD_DEATHS, FIELD_EMERGENCY_TYPE, FIELD_LOCATION, FIELD_STATUS, FIELD_VICTIMS, MarkerKind,
    NOT_SPECIFIED, Row, Table, cell_text,
};

// ---------------------------------------------------------------------------
// Query model
// ---------------------------------------------------------------------------

pub const PARAM_EMERGENCY_TYPE: &str = "emergency_type";
pub const PARAM_START_DATE: &str = "start_date";
pub const PARAM_END_DATE: &str = "end_date";

/// Decoded dashboard query string. Missing values fall back to defaults:
/// `All` for the filter, the data-derived bounds for the dates.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardQuery {
    pub filter: EmergencyFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DashboardQuery {
    pub fn from_params(params: &HashMap<String, String>) -> DashboardQuery {
        DashboardQuery {
            filter: EmergencyFilter::from_param(
                params.get(PARAM_EMERGENCY_TYPE).map(String::as_str),
            ),
            start_date: parse_date_param(params.get(PARAM_START_DATE)),
            end_date: parse_date_param(params.get(PARAM_END_DATE)),
        }
    }

    /// Query string carrying the current selection, used by the CSV
    /// download link so the export matches the displayed view.
    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair(PARAM_EMERGENCY_TYPE, self.filter.label());
        if let Some(date) = self.start_date {
            serializer.append_pair(PARAM_START_DATE, &date.to_string());
        }
        if let Some(date) = self.end_date {
            serializer.append_pair(PARAM_END_DATE, &date.to_string());
        }
        serializer.finish()
    }
}

/// Malformed dates are treated as unselected.
fn parse_date_param(param: Option<&String>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(param?.trim(), "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Page assembly
// ---------------------------------------------------------------------------

pub const PAGE_TITLE: &str = "Community Emergency Response System";

/// Container id of the single map render.
pub const MAP_CONTAINER_ID: &str = "incident-map";

/// Render the full dashboard for one request.
///
/// Metrics, charts, and the map summarize the whole table; the detailed
/// table and the download action reflect the filtered view.
pub fn dashboard_page(table: &Table, query: &DashboardQuery) -> String {
    let rows = &table.rows;
    let filtered = filter_rows(table, &query.filter);

    let mut page = String::with_capacity(16 * 1024);
    page.push_str(&head());
    page.push_str("<body>\n");
    page.push_str(&format!("<h1>{}</h1>\n<hr>\n", PAGE_TITLE));
    page.push_str(&metrics_section(rows));
    page.push_str(&distribution_charts(rows));
    page.push_str(&map_section(rows));
    page.push_str(&victims_section(rows));
    page.push_str(&details_section(table, &filtered, query));
    page.push_str(&date_range_section(rows, query));
    page.push_str("</body>\n</html>\n");
    page
}

fn head() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="https://cdn.plot.ly/plotly-2.32.0.min.js"></script>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
<style>
body {{ font-family: sans-serif; margin: 1.5rem; }}
.metrics {{ display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }}
.metric {{ border: 1px solid #ddd; border-radius: 6px; padding: 1rem; }}
.metric .value {{ font-size: 1.8rem; font-weight: bold; }}
.charts {{ display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }}
#{map_id} {{ height: 500px; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ddd; padding: 0.3rem 0.5rem; text-align: left; }}
.download {{ display: inline-block; margin: 0.8rem 0; }}
</style>
</head>
"#,
        title = PAGE_TITLE,
        map_id = MAP_CONTAINER_ID,
    )
}

// --- metrics ----------------------------------------------------------------

fn metrics_section(rows: &[Row]) -> String {
    let metrics = [
        ("Total Reports", analysis::count(rows).to_string()),
        ("Total Victims", fmt_total(sum_numeric(rows, FIELD_VICTIMS))),
        ("Total Deaths", fmt_total(sum_numeric(rows, FIELD_DEATHS))),
        ("Unique Locations", distinct(rows, FIELD_LOCATION).to_string()),
    ];

    let cards: String = metrics
        .iter()
        .map(|(label, value)| {
            format!(
                "<div class=\"metric\"><div>{}</div><div class=\"value\">{}</div></div>\n",
                label,
                escape_html(value)
            )
        })
        .collect();

    format!("<div class=\"metrics\">\n{}</div>\n", cards)
}

/// Totals are sums of coerced values; show them as whole numbers when they
/// are whole, which is the common case for count fields.
fn fmt_total(total: f64) -> String {
    if total.fract() == 0.0 {
        format!("{}", total as i64)
    } else {
        format!("{}", total)
    }
}

// --- charts -----------------------------------------------------------------

fn distribution_charts(rows: &[Row]) -> String {
    let emergency = group_tally(rows, FIELD_EMERGENCY_TYPE, NOT_SPECIFIED);
    let status = group_tally(rows, FIELD_STATUS, NOT_SPECIFIED);

    format!(
        r#"<div class="charts">
<div>
<h2>Emergency Type Distribution</h2>
<div id="emergency-type-chart"></div>
</div>
<div>
<h2>Reporter Status Distribution</h2>
<div id="reporter-status-chart"></div>
</div>
</div>
<script>
Plotly.newPlot('emergency-type-chart', {pie});
Plotly.newPlot('reporter-status-chart', {bar});
</script>
"#,
        pie = plot_args(&charts::pie_chart("Distribution of Emergency Types", &emergency)),
        bar = plot_args(&charts::bar_chart(
            "Distribution of Reporter Status",
            "Status Type",
            "Count",
            &status
        )),
    )
}

fn victims_section(rows: &[Row]) -> String {
    let victims = sum_by_category(rows, FIELD_EMERGENCY_TYPE, FIELD_VICTIMS);
    format!(
        r#"<h2>Number of Victims by Emergency Type</h2>
<div id="victims-chart"></div>
<script>
Plotly.newPlot('victims-chart', {args});
</script>
"#,
        args = plot_args(&charts::bar_chart(
            "Number of Victims per Emergency Type",
            "Emergency_Type",
            "Number_of_Victims",
            &victims
        )),
    )
}

/// `Plotly.newPlot` takes data and layout as separate arguments.
fn plot_args(payload: &Value) -> String {
    format!(
        "{}, {}",
        inline_json(&payload["data"]),
        inline_json(&payload["layout"])
    )
}

// --- map --------------------------------------------------------------------

fn map_section(rows: &[Row]) -> String {
    let (center_lat, center_lon) = map_center(rows);

    let marker_values: Vec<Value> = markers(rows)
        .into_iter()
        .map(|m| {
            // Popup HTML is assembled (and escaped) server-side; the color
            // encodes emergency vs. resource.
            let popup = format!(
                "Type: {}<br>Area: {}",
                escape_html(&m.type_label),
                escape_html(&m.area)
            );
            let color = match m.kind {
                MarkerKind::Emergency => "red",
                MarkerKind::Resource => "blue",
            };
            serde_json::json!({
                "lat": m.latitude,
                "lon": m.longitude,
                "color": color,
                "popup": popup,
            })
        })
        .collect();

    format!(
        r#"<h2>Map of Incidents and Resources</h2>
<div id="{map_id}"></div>
<script>
var map = L.map('{map_id}').setView([{lat}, {lon}], 13);
L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
var cluster = L.markerClusterGroup();
var markers = {markers};
markers.forEach(function (m) {{
  cluster.addLayer(
    L.circleMarker([m.lat, m.lon], {{ radius: 8, color: m.color, fillColor: m.color, fillOpacity: 0.8 }})
      .bindPopup(m.popup)
  );
}});
map.addLayer(cluster);
</script>
"#,
        map_id = MAP_CONTAINER_ID,
        lat = center_lat,
        lon = center_lon,
        markers = inline_json(&Value::Array(marker_values)),
    )
}

// --- detailed table, filter, download ---------------------------------------

fn details_section(table: &Table, filtered: &Table, query: &DashboardQuery) -> String {
    let mut section = String::new();
    section.push_str("<h2>Detailed Data Analysis</h2>\n");
    section.push_str(&filter_form(&table.rows, query));
    section.push_str(&table_html(filtered));
    section.push_str(&format!(
        "<a class=\"download\" href=\"/download.csv?{}\" download>Download Data</a>\n",
        escape_html(&query.query_string())
    ));
    section
}

fn filter_form(rows: &[Row], query: &DashboardQuery) -> String {
    let mut options = String::new();
    for label in std::iter::once(EmergencyFilter::All.label().to_string())
        .chain(emergency_types(rows))
    {
        let selected = if label == query.filter.label() { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{value}\"{selected}>{value}</option>\n",
            value = escape_html(&label),
            selected = selected,
        ));
    }

    format!(
        r#"<form method="get" action="/">
<label>Select Emergency Type
<select name="{param}">
{options}</select>
</label>
<button type="submit">Apply</button>
</form>
"#,
        param = PARAM_EMERGENCY_TYPE,
        options = options,
    )
}

fn table_html(view: &Table) -> String {
    let mut html = String::from("<table>\n<thead><tr>");
    for column in &view.columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in &view.rows {
        html.push_str("<tr>");
        for column in &view.columns {
            let text = row.get(column).map(cell_text).unwrap_or_default();
            html.push_str(&format!("<td>{}</td>", escape_html(&text)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

// --- date range -------------------------------------------------------------

fn date_range_section(rows: &[Row], query: &DashboardQuery) -> String {
    let bounds = date_bounds(rows);
    let (min_attr, max_attr) = match bounds {
        Some((min, max)) => (date_attr("min", min), date_attr("max", max)),
        None => (String::new(), String::new()),
    };
    let start_value = query
        .start_date
        .or(bounds.map(|(min, _)| min))
        .map(|d| date_attr("value", d))
        .unwrap_or_default();
    let end_value = query
        .end_date
        .or(bounds.map(|(_, max)| max))
        .map(|d| date_attr("value", d))
        .unwrap_or_default();

    format!(
        r#"<form method="get" action="/">
<input type="hidden" name="{filter_param}" value="{filter_value}">
<label>Start Date <input type="date" name="{start_param}"{start_value}{min}{max}></label>
<label>End Date <input type="date" name="{end_param}"{end_value}{min}{max}></label>
<button type="submit">Apply</button>
</form>
"#,
        filter_param = PARAM_EMERGENCY_TYPE,
        filter_value = escape_html(query.filter.label()),
        start_param = PARAM_START_DATE,
        end_param = PARAM_END_DATE,
        start_value = start_value,
        end_value = end_value,
        min = min_attr,
        max = max_attr,
    )
}

fn date_attr(name: &str, date: NaiveDate) -> String {
    format!(" {}=\"{}\"", name, date)
}

// --- escaping ---------------------------------------------------------------

/// Minimal HTML entity escaping for text and attribute positions.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// JSON inlined into a `<script>` block must not be able to close the
/// block early.
fn inline_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
