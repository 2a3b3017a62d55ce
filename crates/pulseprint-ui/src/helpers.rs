//! Display formatting shared by cards, table rows and notifications

/// Placeholder for values that are not available
pub const NOT_AVAILABLE: &str = "-";

/// Format a temperature, e.g. `220°C`
pub fn format_temperature(celsius: f64) -> String {
    format!("{:.0}°C", celsius)
}

/// Format a percentage, e.g. `75%`
pub fn format_percent(percent: f64) -> String {
    format!("{:.0}%", percent.clamp(0.0, 100.0))
}

/// Format a duration in seconds as hours and minutes
///
/// Durations under a minute read `<1m`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    match (hours, minutes) {
        (0, 0) => "<1m".to_string(),
        (0, m) => format!("{}m", m),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Format current and total layers, e.g. `150/200`
pub fn format_layers(current: u32, total: u32) -> Option<String> {
    (total > 0).then(|| format!("{}/{}", current, total))
}
