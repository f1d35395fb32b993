use serde::Serialize;
use std::fmt;

/// Normalized weather reading for one city, built from a single provider response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temp_c: f64,
    pub condition: String,
    pub day_high_c: f64,
    pub night_low_c: f64,
    pub humidity_pct: u8,
    pub feels_like_c: f64,
    pub wind_kph: f64,
    /// Hours of the first forecast day, in chronological order.
    pub hourly: Vec<HourlyPoint>,
    /// Every returned forecast day, in chronological order. Never empty.
    pub daily: Vec<DailyPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    /// `HH:MM`
    pub time_label: String,
    pub temp_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    /// `YYYY-MM-DD`, as reported by the provider.
    pub date_label: String,
    pub max_temp_c: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub health_tip: String,
    pub travel_alert: String,
    pub activity_rec: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Today,
    Hourly,
    #[serde(rename = "10day")]
    TenDay,
    Monthly,
    Air,
    Allergy,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Today => "today",
            PageKind::Hourly => "hourly",
            PageKind::TenDay => "10day",
            PageKind::Monthly => "monthly",
            PageKind::Air => "air",
            PageKind::Allergy => "allergy",
        }
    }

    pub const fn all() -> &'static [PageKind] {
        &[
            PageKind::Today,
            PageKind::Hourly,
            PageKind::TenDay,
            PageKind::Monthly,
            PageKind::Air,
            PageKind::Allergy,
        ]
    }

    /// Air and allergy pages are placeholders and never touch the provider.
    pub fn needs_weather(&self) -> bool {
        !matches!(self, PageKind::Air | PageKind::Allergy)
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PageKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        PageKind::all().iter().copied().find(|page| page.as_str() == lower).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown page '{value}'. \
                 Supported pages: today, hourly, 10day, monthly, air, allergy."
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// Chart description handed to whatever draws it. Labels and values always pair up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub title: String,
    labels: Vec<String>,
    values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(
        kind: ChartKind,
        title: impl Into<String>,
        labels: Vec<String>,
        values: Vec<f64>,
    ) -> anyhow::Result<Self> {
        if labels.len() != values.len() {
            return Err(anyhow::anyhow!(
                "Chart series has {} labels but {} values",
                labels.len(),
                values.len()
            ));
        }

        Ok(Self { kind, title: title.into(), labels, values })
    }

    /// Builds a series from `(label, value)` pairs, which keeps both sides the same length.
    pub fn from_points(
        kind: ChartKind,
        title: impl Into<String>,
        points: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        let (labels, values) = points.into_iter().unzip();
        Self { kind, title: title.into(), labels, values }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// Static text block shown by placeholder pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoPanel {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl InfoPanel {
    pub fn air_quality(city: &str) -> Self {
        Self {
            title: format!("Air Quality in {city}"),
            rows: vec![
                ("Index".into(), "47 (Good)".into()),
                ("PM2.5".into(), "16 µg/m³".into()),
                ("Advice".into(), "Air is clean. Outdoor activities recommended.".into()),
            ],
        }
    }

    pub fn allergy(city: &str) -> Self {
        Self {
            title: format!("Allergy Tracker - {city}"),
            rows: vec![
                ("Pollen Count".into(), "Low".into()),
                ("Recommendation".into(), "No major allergy risk today.".into()),
            ],
        }
    }
}

/// Everything a front end needs to display one page.
///
/// For weather-backed pages exactly one of `summary` and `error` is set.
/// Placeholder pages only carry a `panel`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderDescriptor {
    pub page: PageKind,
    pub summary: Option<WeatherSnapshot>,
    pub advisory: Option<Advisory>,
    pub series: Option<ChartSeries>,
    pub panel: Option<InfoPanel>,
    pub error: Option<String>,
}

impl RenderDescriptor {
    pub fn loaded(
        page: PageKind,
        summary: WeatherSnapshot,
        advisory: Advisory,
        series: Option<ChartSeries>,
    ) -> Self {
        Self {
            page,
            summary: Some(summary),
            advisory: Some(advisory),
            series,
            panel: None,
            error: None,
        }
    }

    pub fn placeholder(page: PageKind, panel: InfoPanel) -> Self {
        Self { page, summary: None, advisory: None, series: None, panel: Some(panel), error: None }
    }

    pub fn failed(page: PageKind, message: impl Into<String>) -> Self {
        Self {
            page,
            summary: None,
            advisory: None,
            series: None,
            panel: None,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_kind_as_str_roundtrip() {
        for page in PageKind::all() {
            let parsed = PageKind::try_from(page.as_str()).expect("roundtrip should succeed");
            assert_eq!(*page, parsed);
        }
    }

    #[test]
    fn page_kind_parse_is_case_insensitive() {
        assert_eq!(PageKind::try_from("Hourly").unwrap(), PageKind::Hourly);
        assert_eq!(PageKind::try_from(" 10DAY ").unwrap(), PageKind::TenDay);
    }

    #[test]
    fn unknown_page_error() {
        let err = PageKind::try_from("weekly").unwrap_err();
        assert!(err.to_string().contains("Unknown page 'weekly'"));
    }

    #[test]
    fn only_placeholder_pages_skip_weather() {
        let offline: Vec<_> = PageKind::all().iter().filter(|p| !p.needs_weather()).collect();
        assert_eq!(offline, vec![&PageKind::Air, &PageKind::Allergy]);
    }

    #[test]
    fn chart_series_rejects_mismatched_lengths() {
        let err = ChartSeries::new(ChartKind::Line, "t", vec!["a".into()], vec![]).unwrap_err();
        assert!(err.to_string().contains("1 labels but 0 values"));
    }

    #[test]
    fn chart_series_from_points_keeps_order() {
        let series = ChartSeries::from_points(
            ChartKind::Line,
            "Hourly Temp (°C)",
            vec![("00:00".to_string(), 7.5), ("01:00".to_string(), 7.0)],
        );

        assert_eq!(series.labels(), &["00:00".to_string(), "01:00".to_string()]);
        assert_eq!(series.values(), &[7.5, 7.0]);
    }

    #[test]
    fn chart_series_points_pair_labels_with_values() {
        let series = ChartSeries::new(
            ChartKind::Bar,
            "Max Temp (°C)",
            vec!["2024-06-01".into(), "2024-06-02".into()],
            vec![31.0, 29.5],
        )
        .unwrap();

        let points: Vec<_> = series.points().collect();
        assert_eq!(points, vec![("2024-06-01", 31.0), ("2024-06-02", 29.5)]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn placeholder_panels_accept_empty_city() {
        assert_eq!(InfoPanel::air_quality("").title, "Air Quality in ");
        assert_eq!(InfoPanel::allergy("").rows.len(), 2);
    }

    #[test]
    fn page_kind_serializes_to_slug() {
        let json = serde_json::to_string(&PageKind::TenDay).unwrap();
        assert_eq!(json, "\"10day\"");
    }
}
