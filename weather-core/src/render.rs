//! Render target abstraction and the display formatting written into it.
//!
//! The view never reads a region back; every setter replaces what the region
//! showed before.

use chrono::NaiveDateTime;

use crate::model::CurrentConditions;

pub const UV_INDEX_PLACEHOLDER: &str = "UV Index: 0 of 10";

const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

/// Static demo values for the other-cities panel.
pub const OTHER_CITIES: [CitySummary; 4] = [
    CitySummary { name: "Mumbai", temperature_c: 30 },
    CitySummary { name: "Delhi", temperature_c: 28 },
    CitySummary { name: "Bangalore", temperature_c: 25 },
    CitySummary { name: "Kolkata", temperature_c: 29 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitySummary {
    pub name: &'static str,
    pub temperature_c: i32,
}

impl CitySummary {
    pub fn label(&self) -> String {
        format!("{}: {}°", self.name, self.temperature_c)
    }
}

/// Named display regions the view writes into.
pub trait RenderTarget {
    fn set_loading(&mut self, loading: bool);
    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);

    fn set_status(&mut self, status: &str);
    fn set_sub_status(&mut self, sub_status: &str);
    fn set_temperature(&mut self, text: &str);
    fn set_wind(&mut self, text: &str);
    fn set_uv_index(&mut self, text: &str);
    fn set_location(&mut self, name: &str);
    fn set_humidity(&mut self, text: &str);
    /// Feels-like and pressure summary line.
    fn set_details(&mut self, text: &str);
    fn set_icon_url(&mut self, url: &str);
    fn set_other_cities(&mut self, cities: &[CitySummary]);

    /// Min/max labels under the chart; `None` hides them.
    fn set_range_labels(&mut self, labels: Option<(&str, &str)>);

    fn set_clock(&mut self, time: &str, date: &str);
}

/// In-memory render target holding the last value written to each region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    pub loading: bool,
    pub error: Option<String>,
    pub status: String,
    pub sub_status: String,
    pub temperature: String,
    pub wind: String,
    pub uv_index: String,
    pub location: String,
    pub humidity: String,
    pub details: String,
    pub icon_url: String,
    pub other_cities: Vec<CitySummary>,
    pub range_labels: Option<(String, String)>,
    pub clock: Option<(String, String)>,
}

impl RenderTarget for Panel {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn hide_error(&mut self) {
        self.error = None;
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    fn set_sub_status(&mut self, sub_status: &str) {
        self.sub_status = sub_status.to_string();
    }

    fn set_temperature(&mut self, text: &str) {
        self.temperature = text.to_string();
    }

    fn set_wind(&mut self, text: &str) {
        self.wind = text.to_string();
    }

    fn set_uv_index(&mut self, text: &str) {
        self.uv_index = text.to_string();
    }

    fn set_location(&mut self, name: &str) {
        self.location = name.to_string();
    }

    fn set_humidity(&mut self, text: &str) {
        self.humidity = text.to_string();
    }

    fn set_details(&mut self, text: &str) {
        self.details = text.to_string();
    }

    fn set_icon_url(&mut self, url: &str) {
        self.icon_url = url.to_string();
    }

    fn set_other_cities(&mut self, cities: &[CitySummary]) {
        self.other_cities = cities.to_vec();
    }

    fn set_range_labels(&mut self, labels: Option<(&str, &str)>) {
        self.range_labels = labels.map(|(low, high)| (low.to_string(), high.to_string()));
    }

    fn set_clock(&mut self, time: &str, date: &str) {
        self.clock = Some((time.to_string(), date.to_string()));
    }
}

/// Rounds half-up, so `-2.5` becomes `-2` and `21.5` becomes `22`.
pub fn round_half_up(value: f64) -> i64 {
    // `f64::round` breaks ties away from zero; only negative ties need moving up.
    let rounded = value.round();
    if value - rounded == 0.5 {
        (rounded + 1.0) as i64
    } else {
        rounded as i64
    }
}

pub fn format_temperature(temperature_c: f64) -> String {
    format!("{}°", round_half_up(temperature_c))
}

pub fn format_wind(speed_mps: f64) -> String {
    format!("Wind: {speed_mps} m/s")
}

pub fn format_humidity(humidity_pct: f64) -> String {
    format!("{humidity_pct}%")
}

pub fn format_details(feels_like_c: f64, pressure_hpa: f64) -> String {
    format!(
        "Feels like {}°C. Pressure: {} hPa.",
        round_half_up(feels_like_c),
        pressure_hpa
    )
}

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_URL_BASE}/{icon}@2x.png")
}

/// `(time, date)` strings for the clock region, e.g. `("09:05", "19 Oct 2026")`.
pub fn format_clock(now: NaiveDateTime) -> (String, String) {
    (
        now.format("%H:%M").to_string(),
        now.format("%-d %b %Y").to_string(),
    )
}

/// Writes every current-condition region plus the other-cities panel.
pub fn render_current<R: RenderTarget + ?Sized>(target: &mut R, current: &CurrentConditions) {
    target.set_status(&current.condition);
    target.set_sub_status(&current.description);
    target.set_temperature(&format_temperature(current.temperature_c));
    target.set_wind(&format_wind(current.wind_speed_mps));
    target.set_uv_index(UV_INDEX_PLACEHOLDER);
    target.set_location(&current.location_name);
    target.set_humidity(&format_humidity(current.humidity_pct));
    target.set_details(&format_details(current.feels_like_c, current.pressure_hpa));
    target.set_icon_url(&icon_url(&current.icon));
    target.set_other_cities(&OTHER_CITIES);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn pune() -> CurrentConditions {
        CurrentConditions {
            condition: "Clouds".to_string(),
            description: "broken clouds".to_string(),
            temperature_c: 21.6,
            feels_like_c: 21.4,
            humidity_pct: 64.0,
            pressure_hpa: 1012.0,
            wind_speed_mps: 3.6,
            location_name: "Pune".to_string(),
            icon: "04d".to_string(),
        }
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(21.6), 22);
        assert_eq!(round_half_up(21.5), 22);
        assert_eq!(round_half_up(21.4), 21);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(0.5), 1);
    }

    #[test]
    fn value_just_below_half_rounds_down() {
        let below_half = 0.49999999999999994;
        assert_eq!(round_half_up(below_half), 0);
        assert_eq!(format_temperature(below_half), "0°");
        assert_eq!(round_half_up(-below_half), 0);
    }

    #[test]
    fn render_current_fills_every_region() {
        let mut panel = Panel::default();
        render_current(&mut panel, &pune());

        assert_eq!(panel.status, "Clouds");
        assert_eq!(panel.sub_status, "broken clouds");
        assert_eq!(panel.temperature, "22°");
        assert_eq!(panel.wind, "Wind: 3.6 m/s");
        assert_eq!(panel.uv_index, "UV Index: 0 of 10");
        assert_eq!(panel.location, "Pune");
        assert_eq!(panel.humidity, "64%");
        assert_eq!(panel.details, "Feels like 21°C. Pressure: 1012 hPa.");
        assert_eq!(panel.icon_url, "https://openweathermap.org/img/wn/04d@2x.png");
        assert_eq!(panel.other_cities, OTHER_CITIES.to_vec());
    }

    #[test]
    fn other_cities_labels() {
        let labels: Vec<_> = OTHER_CITIES.iter().map(CitySummary::label).collect();
        assert_eq!(labels, vec!["Mumbai: 30°", "Delhi: 28°", "Bangalore: 25°", "Kolkata: 29°"]);
    }

    #[test]
    fn clock_formats_time_and_short_date() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 9)
            .unwrap()
            .and_hms_opt(7, 5, 0)
            .unwrap();
        assert_eq!(format_clock(now), ("07:05".to_string(), "9 Oct 2026".to_string()));
    }

    #[test]
    fn hide_error_clears_banner() {
        let mut panel = Panel::default();
        panel.show_error("City not found!");
        assert_eq!(panel.error.as_deref(), Some("City not found!"));
        panel.hide_error();
        assert_eq!(panel.error, None);
    }
}
