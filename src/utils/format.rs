use chrono::{Datelike, NaiveDate, Weekday};

/// Kelvin to rounded degrees Celsius.
pub fn celsius_rounded(kelvin: f64) -> i32 {
    (kelvin - 273.15).round() as i32
}

/// Kelvin to truncated degrees Celsius, as used by the 5-day rows.
pub fn celsius_truncated(kelvin: f64) -> i32 {
    (kelvin - 273.15) as i32
}

/// Meters per second to rounded km/h.
pub fn wind_kmh(mps: f64) -> i32 {
    (mps * 3.6).round() as i32
}

/// Map an OpenWeatherMap icon code ("10d", "01n", ...) to a single-cell
/// symbol for the terminal.
pub fn icon_symbol(code: &str) -> &'static str {
    match code.get(..2).unwrap_or("") {
        "01" => "☀",
        "02" | "03" | "04" => "☁",
        "09" | "10" => "☂",
        "11" => "⚡",
        "13" => "❄",
        "50" => "≈",
        _ => " ",
    }
}

pub fn german_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Di",
        Weekday::Wed => "Mi",
        Weekday::Thu => "Do",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "So",
    }
}

/// "Mo, 22.01." style date label.
pub fn day_label(date: NaiveDate) -> String {
    format!("{}, {}", german_weekday(date.weekday()), date.format("%d.%m."))
}
