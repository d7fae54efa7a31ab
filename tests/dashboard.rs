//! Rendered-page tests.
//!
//! Assert the dashboard HTML carries every section the view promises —
//! metrics, both distribution charts, exactly one map, the victims chart,
//! the filter control, the filtered table, the download action, and the
//! bounded date inputs.

use cers_dashboard::analysis::EmergencyFilter;
use cers_dashboard::model::Table;
use cers_dashboard::normalize::build_table;
use cers_dashboard::render::{DashboardQuery, MAP_CONTAINER_ID, dashboard_page};
use serde_json::{Value, json};

fn fixture() -> Vec<Value> {
    vec![
        json!({
            "_id": 1,
            "Date": "2024-04-02",
            "Emergency_Type": "Flood",
            "Status": "Citizen",
            "Number_of_Victims": "12",
            "Number_of_Deaths": "3",
            "Location_of_Resource": "Makurdi",
            "_geolocation": [7.5, 8.5],
        }),
        json!({
            "_id": 2,
            "Date": "2024-04-10",
            "Emergency_Type": "Fire",
            "Status": "Volunteer",
            "Number_of_Victims": "4",
            "Number_of_Deaths": "0",
            "Location_of_Resource": "Gboko",
            "_geolocation": [7.9, 8.7],
        }),
        json!({
            "_id": 3,
            "Date": "2024-03-28",
            "Resource_Type": "Shelter",
            "Location_of_Resource": "Makurdi",
            "_geolocation": [7.7, 8.6],
        }),
    ]
}

fn table() -> Table {
    build_table(&fixture())
}

fn all() -> DashboardQuery {
    DashboardQuery {
        filter: EmergencyFilter::All,
        start_date: None,
        end_date: None,
    }
}

#[test]
fn test_page_carries_title_and_metric_values() {
    let page = dashboard_page(&table(), &all());

    assert!(page.contains("Community Emergency Response System"));
    assert!(page.contains("Total Reports"));
    assert!(page.contains("<div class=\"value\">3</div>"), "total reports");
    assert!(page.contains("<div class=\"value\">16</div>"), "total victims 12 + 4");
    assert!(page.contains("Total Deaths"));
    assert!(page.contains("<div class=\"value\">2</div>"), "unique locations");
}

#[test]
fn test_page_renders_the_map_exactly_once() {
    let page = dashboard_page(&table(), &all());

    let containers = page.matches(&format!("id=\"{}\"", MAP_CONTAINER_ID)).count();
    assert_eq!(containers, 1, "the map container must appear exactly once");
    assert_eq!(page.matches("L.map(").count(), 1, "the map must be initialized exactly once");
    assert_eq!(page.matches("L.markerClusterGroup(").count(), 1);
}

#[test]
fn test_map_markers_color_by_kind() {
    let page = dashboard_page(&table(), &all());

    // Two emergencies, one resource.
    assert_eq!(page.matches("\"color\":\"red\"").count(), 2);
    assert_eq!(page.matches("\"color\":\"blue\"").count(), 1);
    assert!(page.contains("Type: Shelter<br>Area: Makurdi"));
}

#[test]
fn test_both_distribution_charts_and_victims_chart_present() {
    let page = dashboard_page(&table(), &all());

    assert!(page.contains("id=\"emergency-type-chart\""));
    assert!(page.contains("id=\"reporter-status-chart\""));
    assert!(page.contains("id=\"victims-chart\""));
    assert_eq!(page.matches("Plotly.newPlot(").count(), 3);
    assert!(page.contains("Distribution of Emergency Types"));
    assert!(page.contains("Distribution of Reporter Status"));
    assert!(page.contains("Number of Victims per Emergency Type"));
}

#[test]
fn test_filter_options_cover_all_and_each_type() {
    let page = dashboard_page(&table(), &all());

    assert!(page.contains("<option value=\"All\" selected>All</option>"));
    assert!(page.contains("<option value=\"Flood\">Flood</option>"));
    assert!(page.contains("<option value=\"Fire\">Fire</option>"));
}

#[test]
fn test_selected_filter_restricts_table_and_download_link() {
    let query = DashboardQuery {
        filter: EmergencyFilter::Only("Flood".to_string()),
        start_date: None,
        end_date: None,
    };
    let page = dashboard_page(&table(), &query);

    assert!(page.contains("<option value=\"Flood\" selected>Flood</option>"));
    // Header row plus exactly one matching data row.
    assert_eq!(page.matches("<tr>").count(), 2);
    assert!(page.contains("/download.csv?emergency_type=Flood"));
}

#[test]
fn test_date_inputs_bounded_by_table_dates() {
    let page = dashboard_page(&table(), &all());

    assert_eq!(page.matches("type=\"date\"").count(), 2);
    assert!(page.contains("min=\"2024-03-28\""));
    assert!(page.contains("max=\"2024-04-10\""));
    // Unselected dates default to the bounds.
    assert!(page.contains("value=\"2024-03-28\""));
    assert!(page.contains("value=\"2024-04-10\""));
}

#[test]
fn test_cell_values_are_html_escaped() {
    let submissions = vec![json!({
        "_id": 9,
        "Emergency_Type": "<script>alert(1)</script>",
        "_geolocation": [7.5, 8.5],
    })];
    let page = dashboard_page(&build_table(&submissions), &all());

    assert!(!page.contains("<script>alert(1)</script>"));
    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}
