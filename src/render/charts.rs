//! Plotly chart payloads.
//!
//! Charts are computed server-side by the aggregator; this module only
//! shapes the results into the `{data, layout}` payloads Plotly renders
//! client-side. Payloads are plain JSON values so serialization into the
//! page cannot fail.

use serde_json::{Value, json};

/// Pie chart of a grouped tally (label → count).
pub fn pie_chart(title: &str, tally: &[(String, u64)]) -> Value {
    let labels: Vec<&String> = tally.iter().map(|(label, _)| label).collect();
    let values: Vec<u64> = tally.iter().map(|(_, n)| *n).collect();
    json!({
        "data": [{
            "type": "pie",
            "labels": labels,
            "values": values,
        }],
        "layout": {
            "title": { "text": title },
        },
    })
}

/// Vertical bar chart of per-category values (counts or sums).
pub fn bar_chart<T>(title: &str, x_title: &str, y_title: &str, data: &[(String, T)]) -> Value
where
    T: Clone + Into<Value>,
{
    let x: Vec<&String> = data.iter().map(|(label, _)| label).collect();
    let y: Vec<Value> = data.iter().map(|(_, v)| v.clone().into()).collect();
    json!({
        "data": [{
            "type": "bar",
            "x": x,
            "y": y,
        }],
        "layout": {
            "title": { "text": title },
            "xaxis": { "title": { "text": x_title } },
            "yaxis": { "title": { "text": y_title } },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pie_chart_payload_shape() {
        let tally = vec![("Flood".to_string(), 3u64), ("Fire".to_string(), 1)];
        let payload = pie_chart("Distribution of Emergency Types", &tally);

        assert_eq!(payload["data"][0]["type"], "pie");
        assert_eq!(payload["data"][0]["labels"], json!(["Flood", "Fire"]));
        assert_eq!(payload["data"][0]["values"], json!([3, 1]));
        assert_eq!(
            payload["layout"]["title"]["text"],
            "Distribution of Emergency Types"
        );
    }

    #[test]
    fn test_bar_chart_accepts_counts_and_sums() {
        let counts = vec![("Citizen".to_string(), 5u64)];
        let payload = bar_chart("t", "Status Type", "Count", &counts);
        assert_eq!(payload["data"][0]["type"], "bar");
        assert_eq!(payload["data"][0]["y"], json!([5]));

        let sums = vec![("Flood".to_string(), 12.5f64)];
        let payload = bar_chart("t", "Emergency Type", "Victims", &sums);
        assert_eq!(payload["data"][0]["y"], json!([12.5]));
    }
}
