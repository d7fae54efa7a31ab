//! Map center and marker derivation.

use crate::model::{
    COL_LATITUDE, COL_LONGITUDE, DEFAULT_MAP_CENTER, FIELD_EMERGENCY_TYPE, FIELD_LOCATION,
    FIELD_RESOURCE_TYPE, Marker, MarkerKind, Row, Table, cell_text,
};

/// The derived coordinate pair of a row, if both components are present.
///
/// The normalizer guarantees the columns are either both numeric or both
/// null, so a partial pair cannot occur here.
pub fn coordinate(row: &Row) -> Option<(f64, f64)> {
    let lat = Table::cell(row, COL_LATITUDE)?.as_f64()?;
    let lon = Table::cell(row, COL_LONGITUDE)?.as_f64()?;
    Some((lat, lon))
}

/// Mean of the valid coordinate pairs, used to center the map.
///
/// Falls back to [`DEFAULT_MAP_CENTER`] when no row carries a valid pair.
pub fn map_center(rows: &[Row]) -> (f64, f64) {
    let mut lat_sum = 0.0;
    let mut lon_sum = 0.0;
    let mut n = 0usize;
    for row in rows {
        if let Some((lat, lon)) = coordinate(row) {
            lat_sum += lat;
            lon_sum += lon;
            n += 1;
        }
    }
    if n == 0 {
        return DEFAULT_MAP_CENTER;
    }
    (lat_sum / n as f64, lon_sum / n as f64)
}

/// One marker per row with a full coordinate pair, in row order.
///
/// A row with an `Emergency_Type` is an emergency marker; a row with only a
/// `Resource_Type` is a resource marker. The popup label prefers the
/// emergency type over the resource type, matching the marker kind.
pub fn markers(rows: &[Row]) -> Vec<Marker> {
    rows.iter()
        .filter_map(|row| {
            let (latitude, longitude) = coordinate(row)?;
            let emergency = Table::cell(row, FIELD_EMERGENCY_TYPE);
            let kind = if emergency.is_some() {
                MarkerKind::Emergency
            } else {
                MarkerKind::Resource
            };
            let type_label = emergency
                .or_else(|| Table::cell(row, FIELD_RESOURCE_TYPE))
                .map(cell_text)
                .unwrap_or_default();
            let area = Table::cell(row, FIELD_LOCATION)
                .map(cell_text)
                .unwrap_or_default();
            Some(Marker {
                latitude,
                longitude,
                kind,
                type_label,
                area,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn located(lat: Value, lon: Value, extra: &[(&str, Value)]) -> Row {
        let mut row = Row::new();
        row.insert(COL_LATITUDE.to_string(), lat);
        row.insert(COL_LONGITUDE.to_string(), lon);
        for (k, v) in extra {
            row.insert(k.to_string(), v.clone());
        }
        row
    }

    #[test]
    fn test_map_center_is_mean_of_valid_pairs() {
        let rows = vec![
            located(json!(8.0), json!(6.0), &[]),
            located(json!(10.0), json!(8.0), &[]),
            located(Value::Null, Value::Null, &[]),
        ];
        assert_eq!(map_center(&rows), (9.0, 7.0));
    }

    #[test]
    fn test_map_center_fallback_constant() {
        let rows = vec![located(Value::Null, Value::Null, &[]), Row::new()];
        assert_eq!(
            map_center(&rows),
            (7.719421, 8.580176),
            "with zero valid pairs the documented default applies"
        );
        assert_eq!(map_center(&[]), DEFAULT_MAP_CENTER);
    }

    #[test]
    fn test_markers_only_for_full_pairs() {
        let rows = vec![
            located(json!(8.0), json!(6.0), &[(FIELD_EMERGENCY_TYPE, json!("Flood"))]),
            located(Value::Null, Value::Null, &[(FIELD_EMERGENCY_TYPE, json!("Fire"))]),
        ];
        let markers = markers(&rows);
        assert_eq!(markers.len(), 1, "rows without coordinates produce no marker");
        assert_eq!(markers[0].latitude, 8.0);
    }

    #[test]
    fn test_marker_kind_and_labels() {
        let rows = vec![
            located(
                json!(8.0),
                json!(6.0),
                &[
                    (FIELD_EMERGENCY_TYPE, json!("Flood")),
                    (FIELD_LOCATION, json!("Makurdi")),
                ],
            ),
            located(
                json!(8.1),
                json!(6.1),
                &[
                    (FIELD_RESOURCE_TYPE, json!("Shelter")),
                    (FIELD_LOCATION, json!("Gboko")),
                ],
            ),
        ];
        let markers = markers(&rows);

        assert_eq!(markers[0].kind, MarkerKind::Emergency);
        assert_eq!(markers[0].type_label, "Flood");
        assert_eq!(markers[0].area, "Makurdi");

        assert_eq!(markers[1].kind, MarkerKind::Resource);
        assert_eq!(markers[1].type_label, "Shelter");
        assert_eq!(markers[1].area, "Gboko");
    }

    #[test]
    fn test_emergency_type_wins_over_resource_type() {
        let rows = vec![located(
            json!(8.0),
            json!(6.0),
            &[
                (FIELD_EMERGENCY_TYPE, json!("Flood")),
                (FIELD_RESOURCE_TYPE, json!("Shelter")),
            ],
        )];
        let markers = markers(&rows);
        assert_eq!(markers[0].kind, MarkerKind::Emergency);
        assert_eq!(markers[0].type_label, "Flood");
    }
}
