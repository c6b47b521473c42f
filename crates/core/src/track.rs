//! GPS track maths for the race timer.
//!
//! Validates position samples and summarizes a recorded track: distance
//! sailed (great-circle, nautical miles), elapsed time, and speeds.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Mean Earth radius in nautical miles.
const EARTH_RADIUS_NM: f64 = 3440.065;

/// Maximum samples accepted in one upload.
pub const MAX_POINTS_PER_BATCH: usize = 5_000;

/// A single GPS sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    pub lat: f64,
    pub lon: f64,
    pub recorded_at: Timestamp,
    /// Speed over ground reported by the device, if any.
    pub speed_kts: Option<f64>,
    pub heading_deg: Option<f64>,
}

/// Summary of a finished (or in-progress) track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub point_count: usize,
    /// Rounded to one decimal place.
    pub distance_nm: f64,
    pub elapsed_secs: i64,
    /// Distance over elapsed time, one decimal; `None` when no time elapsed.
    pub avg_speed_kts: Option<f64>,
    /// Highest device-reported speed, one decimal.
    pub max_speed_kts: Option<f64>,
}

/// Validate a batch of samples before storage.
pub fn validate_samples(samples: &[TrackSample]) -> Result<(), String> {
    if samples.is_empty() {
        return Err("At least one track point is required".to_string());
    }
    if samples.len() > MAX_POINTS_PER_BATCH {
        return Err(format!(
            "Too many track points in one batch ({}); maximum is {MAX_POINTS_PER_BATCH}",
            samples.len()
        ));
    }
    for (i, s) in samples.iter().enumerate() {
        if !(-90.0..=90.0).contains(&s.lat) || !s.lat.is_finite() {
            return Err(format!("Point {i}: latitude {} out of range", s.lat));
        }
        if !(-180.0..=180.0).contains(&s.lon) || !s.lon.is_finite() {
            return Err(format!("Point {i}: longitude {} out of range", s.lon));
        }
        if let Some(speed) = s.speed_kts {
            if !speed.is_finite() || speed < 0.0 {
                return Err(format!("Point {i}: speed {speed} is invalid"));
            }
        }
        if let Some(heading) = s.heading_deg {
            if !(0.0..360.0).contains(&heading) {
                return Err(format!("Point {i}: heading {heading} out of range"));
            }
        }
    }
    Ok(())
}

/// Great-circle distance between two positions in nautical miles.
pub fn haversine_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * a.sqrt().asin()
}

/// Summarize a track. Samples are ordered by time first.
pub fn summarize(samples: &[TrackSample]) -> TrackSummary {
    let mut ordered: Vec<&TrackSample> = samples.iter().collect();
    ordered.sort_by_key(|s| s.recorded_at);

    let distance: f64 = ordered
        .windows(2)
        .map(|w| haversine_nm(w[0].lat, w[0].lon, w[1].lat, w[1].lon))
        .sum();

    let elapsed_secs = match (ordered.first(), ordered.last()) {
        (Some(first), Some(last)) => (last.recorded_at - first.recorded_at).num_seconds(),
        _ => 0,
    };

    let avg_speed_kts =
        (elapsed_secs > 0).then(|| round1(distance / (elapsed_secs as f64 / 3600.0)));

    let max_speed_kts = ordered
        .iter()
        .filter_map(|s| s.speed_kts)
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
        .map(round1);

    TrackSummary {
        point_count: ordered.len(),
        distance_nm: round1(distance),
        elapsed_secs,
        avg_speed_kts,
        max_speed_kts,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn sample(lat: f64, lon: f64, secs: i64) -> TrackSample {
        TrackSample {
            lat,
            lon,
            recorded_at: Utc.with_ymd_and_hms(2025, 6, 14, 10, 0, 0).unwrap()
                + Duration::seconds(secs),
            speed_kts: None,
            heading_deg: None,
        }
    }

    #[test]
    fn one_minute_of_latitude_is_one_nautical_mile() {
        let d = haversine_nm(50.0, -1.0, 50.0 + 1.0 / 60.0, -1.0);
        assert!((d - 1.0).abs() < 0.01, "got {d}");
    }

    #[test]
    fn zero_distance_for_same_point() {
        assert_eq!(haversine_nm(10.0, 10.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn summary_of_one_hour_leg() {
        // Two nautical miles north over one hour.
        let samples = vec![sample(50.0, -1.0, 0), sample(50.0 + 2.0 / 60.0, -1.0, 3600)];
        let summary = summarize(&samples);
        assert_eq!(summary.point_count, 2);
        assert_eq!(summary.distance_nm, 2.0);
        assert_eq!(summary.elapsed_secs, 3600);
        assert_eq!(summary.avg_speed_kts, Some(2.0));
    }

    #[test]
    fn samples_are_ordered_by_time() {
        let samples = vec![
            sample(50.0 + 2.0 / 60.0, -1.0, 3600),
            sample(50.0, -1.0, 0),
            sample(50.0 + 1.0 / 60.0, -1.0, 1800),
        ];
        let summary = summarize(&samples);
        assert_eq!(summary.distance_nm, 2.0);
        assert_eq!(summary.elapsed_secs, 3600);
    }

    #[test]
    fn empty_and_single_point_tracks() {
        let empty = summarize(&[]);
        assert_eq!(empty.point_count, 0);
        assert_eq!(empty.distance_nm, 0.0);
        assert_eq!(empty.avg_speed_kts, None);

        let single = summarize(&[sample(0.0, 0.0, 0)]);
        assert_eq!(single.elapsed_secs, 0);
        assert_eq!(single.avg_speed_kts, None);
    }

    #[test]
    fn max_speed_from_device_readings() {
        let mut a = sample(0.0, 0.0, 0);
        a.speed_kts = Some(5.24);
        let mut b = sample(0.0, 0.001, 10);
        b.speed_kts = Some(7.76);
        assert_eq!(summarize(&[a, b]).max_speed_kts, Some(7.8));
    }

    #[test]
    fn validation_rejects_bad_coordinates() {
        assert!(validate_samples(&[sample(91.0, 0.0, 0)]).is_err());
        assert!(validate_samples(&[sample(0.0, -181.0, 0)]).is_err());
        assert!(validate_samples(&[sample(f64::NAN, 0.0, 0)]).is_err());
        assert!(validate_samples(&[]).is_err());
        assert!(validate_samples(&[sample(45.0, 45.0, 0)]).is_ok());
    }

    #[test]
    fn validation_rejects_bad_heading_and_speed() {
        let mut s = sample(0.0, 0.0, 0);
        s.heading_deg = Some(360.0);
        assert!(validate_samples(&[s.clone()]).is_err());
        s.heading_deg = Some(359.9);
        s.speed_kts = Some(-1.0);
        assert!(validate_samples(&[s]).is_err());
    }
}
