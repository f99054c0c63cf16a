//! Edge label text.
//!
//! Labels are built from the label modes active in the view, always in the
//! same order: traffic rate, response time, throughput, traffic
//! distribution. Units are only spelled out when more than one mode is
//! active.

use meshgraph_types::{DisplaySettings, EdgeLabelMode, EdgeRecord, Protocol};

const SEPARATOR: &str = " - ";

/// Label text for an edge, empty when nothing applies.
pub fn edge_label(edge: &EdgeRecord, settings: &DisplaySettings) -> String {
    let modes = &settings.edge_labels;
    let include_units = active_mode_count(modes) > 1;
    let mut labels = Vec::new();

    if modes.contains(&EdgeLabelMode::TrafficRate) && edge.has_traffic() {
        labels.push(traffic_rate(edge, settings, include_units));
    }

    if modes.contains(&EdgeLabelMode::ResponseTime) {
        if let Some(rt) = edge.response_time.filter(|rt| *rt > 0.0) {
            labels.push(format_duration_ms(rt));
        }
    }

    if modes.contains(&EdgeLabelMode::Throughput) {
        if let Some(bytes) = edge.throughput.filter(|b| *b > 0.0) {
            labels.push(format_byte_rate(bytes, include_units));
        }
    }

    if modes.contains(&EdgeLabelMode::TrafficDistribution) {
        if let Some(pct) = edge.percent_req.filter(|p| *p > 0.0 && *p < 100.0) {
            labels.push(format_percent(pct));
        }
    }

    labels.join(SEPARATOR)
}

fn active_mode_count(modes: &[EdgeLabelMode]) -> usize {
    let mut seen: Vec<EdgeLabelMode> = Vec::with_capacity(modes.len());
    for mode in modes {
        if !seen.contains(mode) {
            seen.push(*mode);
        }
    }
    seen.len()
}

fn traffic_rate(edge: &EdgeRecord, settings: &DisplaySettings, include_units: bool) -> String {
    let err = edge.percent_err.filter(|e| *e > 0.0);

    match (edge.protocol, err) {
        (Protocol::Tcp, _) => format_byte_rate(edge.rate, include_units),
        (_, Some(err)) => format!(
            "{}\n{}",
            format_request_rate(edge.rate, include_units, "rps"),
            format_err_rate(err)
        ),
        (Protocol::Grpc, None) if !settings.grpc_request_rates => {
            format_request_rate(edge.rate, include_units, "mps")
        }
        _ => format_request_rate(edge.rate, include_units, "rps"),
    }
}

/// Strip trailing zeros, and a trailing decimal point, from a fixed-point number.
pub fn trim_fixed(fixed: &str) -> &str {
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.')
}

pub fn format_request_rate(rate: f64, include_units: bool, units: &str) -> String {
    let fixed = format!("{:.2}", rate);
    let rate = trim_fixed(&fixed);
    if include_units {
        format!("{}{}", rate, units)
    } else {
        rate.to_string()
    }
}

pub fn format_err_rate(pct: f64) -> String {
    let precision = if pct < 1.0 { 1 } else { 0 };
    let fixed = format!("{:.*}", precision, pct);
    format!("{}%err", trim_fixed(&fixed))
}

/// Bytes per second, switching to kilobytes from 1024 up.
pub fn format_byte_rate(bytes: f64, include_units: bool) -> String {
    let (fixed, units) = if bytes < 1024.0 {
        let fixed = if bytes < 1.0 {
            trim_fixed(&format!("{:.2}", bytes)).to_string()
        } else {
            format!("{:.0}", bytes)
        };
        (fixed, "bps")
    } else {
        (trim_fixed(&format!("{:.2}", bytes / 1024.0)).to_string(), "kps")
    };

    if include_units {
        format!("{}{}", fixed, units)
    } else {
        fixed
    }
}

pub fn format_percent(pct: f64) -> String {
    format!("{}%", trim_fixed(&format!("{:.1}", pct)))
}

/// Milliseconds below one second, seconds from there on.
pub fn format_duration_ms(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.0}ms", ms)
    } else {
        format!("{}s", trim_fixed(&format!("{:.2}", ms / 1000.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_modes(modes: &[EdgeLabelMode]) -> DisplaySettings {
        DisplaySettings {
            edge_labels: modes.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_trim_fixed() {
        assert_eq!(trim_fixed("12.50"), "12.5");
        assert_eq!(trim_fixed("3.00"), "3");
        assert_eq!(trim_fixed("100"), "100");
        assert_eq!(trim_fixed("0.05"), "0.05");
    }

    #[test]
    fn test_request_rate_label() {
        let settings = with_modes(&[EdgeLabelMode::TrafficRate]);
        let edge = EdgeRecord::new("e", "a", "b", Protocol::Http, 12.5);
        assert_eq!(edge_label(&edge, &settings), "12.5");

        let idle = EdgeRecord::new("e", "a", "b", Protocol::Http, 0.0);
        assert_eq!(edge_label(&idle, &settings), "");

        let nan = EdgeRecord::new("e", "a", "b", Protocol::Http, f64::NAN);
        assert_eq!(edge_label(&nan, &settings), "");
    }

    #[test]
    fn test_error_rate_line() {
        let settings = with_modes(&[EdgeLabelMode::TrafficRate]);
        let mut edge = EdgeRecord::new("e", "a", "b", Protocol::Http, 7.0);

        edge.percent_err = Some(12.4);
        assert_eq!(edge_label(&edge, &settings), "7\n12%err");

        edge.percent_err = Some(0.37);
        assert_eq!(edge_label(&edge, &settings), "7\n0.4%err");
    }

    #[test]
    fn test_grpc_message_rate() {
        let edge = EdgeRecord::new("e", "a", "b", Protocol::Grpc, 3.0);
        let settings = DisplaySettings {
            edge_labels: vec![EdgeLabelMode::TrafficRate, EdgeLabelMode::ResponseTime],
            grpc_request_rates: false,
            ..Default::default()
        };
        assert_eq!(edge_label(&edge, &settings), "3mps");

        let settings = DisplaySettings {
            grpc_request_rates: true,
            ..settings
        };
        assert_eq!(edge_label(&edge, &settings), "3rps");
    }

    #[test]
    fn test_byte_rates() {
        assert_eq!(format_byte_rate(0.5, true), "0.5bps");
        assert_eq!(format_byte_rate(512.4, true), "512bps");
        assert_eq!(format_byte_rate(2048.0, true), "2kps");
        assert_eq!(format_byte_rate(1536.0, false), "1.5");

        let tcp = EdgeRecord::new("e", "a", "b", Protocol::Tcp, 4096.0);
        let settings = with_modes(&[EdgeLabelMode::TrafficRate]);
        assert_eq!(edge_label(&tcp, &settings), "4");
    }

    #[test]
    fn test_durations() {
        assert_eq!(format_duration_ms(42.4), "42ms");
        assert_eq!(format_duration_ms(1500.0), "1.5s");
        assert_eq!(format_duration_ms(2000.0), "2s");
    }

    #[test]
    fn test_combined_modes_include_units() {
        let settings = with_modes(&[
            EdgeLabelMode::TrafficDistribution,
            EdgeLabelMode::TrafficRate,
            EdgeLabelMode::ResponseTime,
            EdgeLabelMode::Throughput,
        ]);
        let mut edge = EdgeRecord::new("e", "a", "b", Protocol::Http, 20.0);
        edge.response_time = Some(35.0);
        edge.throughput = Some(3072.0);
        edge.percent_req = Some(33.3);

        assert_eq!(edge_label(&edge, &settings), "20rps - 35ms - 3kps - 33.3%");

        edge.percent_req = Some(100.0);
        assert_eq!(edge_label(&edge, &settings), "20rps - 35ms - 3kps");
    }

    #[test]
    fn test_duplicate_modes_count_once() {
        let settings = with_modes(&[EdgeLabelMode::TrafficRate, EdgeLabelMode::TrafficRate]);
        let edge = EdgeRecord::new("e", "a", "b", Protocol::Http, 1.0);
        assert_eq!(edge_label(&edge, &settings), "1");
    }
}
