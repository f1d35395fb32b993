use std::fmt;

use chrono::Local;
use dashboard_core::{ChartKind, ChartSeries, Delivery, PageKind, RenderDescriptor};

const BAR_WIDTH: usize = 40;

pub fn page_title(page: PageKind) -> &'static str {
    match page {
        PageKind::Today => "Today",
        PageKind::Hourly => "Hourly",
        PageKind::TenDay => "10 Day",
        PageKind::Monthly => "Monthly",
        PageKind::Air => "Air Quality",
        PageKind::Allergy => "Allergy",
    }
}

/// Header line plus the page body, as printed by `browse`.
pub fn render_delivery(delivery: &Delivery) -> String {
    format!(
        "── {} · {} · updated {} ──\n{}",
        page_title(delivery.descriptor.page),
        delivery.city,
        Local::now().format("%H:%M"),
        Page(&delivery.descriptor)
    )
}

pub fn render(desc: &RenderDescriptor) -> String {
    Page(desc).to_string()
}

/// Text view of a descriptor.
struct Page<'a>(&'a RenderDescriptor);

impl fmt::Display for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = self.0;

        if let Some(error) = &desc.error {
            return writeln!(f, "⚠️  {error}");
        }

        if let Some(panel) = &desc.panel {
            writeln!(f, "{}", panel.title)?;
            for (label, value) in &panel.rows {
                writeln!(f, "  {label}: {value}")?;
            }
        }

        if let Some(w) = &desc.summary {
            writeln!(f, "{}", w.city)?;
            writeln!(f, "  {}°C  {}", w.temp_c, w.condition)?;
            writeln!(f, "  Day {}° • Night {}°", w.day_high_c, w.night_low_c)?;
            writeln!(f, "  Humidity: {}%", w.humidity_pct)?;
            writeln!(f, "  Feels Like: {}°C", w.feels_like_c)?;
            writeln!(f, "  Wind: {} km/h", w.wind_kph)?;
        }

        if let Some(advisory) = &desc.advisory {
            writeln!(f, "\nSmart Notifications")?;
            for line in [&advisory.health_tip, &advisory.travel_alert, &advisory.activity_rec] {
                writeln!(f, "  {line}")?;
            }
        }

        if let Some(series) = &desc.series {
            write!(f, "\n{}", Chart(series))?;
        }

        Ok(())
    }
}

/// Horizontal bars measured from zero; values at or below zero get an empty bar.
struct Chart<'a>(&'a ChartSeries);

impl fmt::Display for Chart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let series = self.0;
        let kind = match series.kind {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
        };
        writeln!(f, "{} ({kind})", series.title)?;

        let max = series.values().iter().copied().fold(0.0_f64, f64::max);
        let label_width = series.labels().iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let glyph = if series.kind == ChartKind::Bar { '█' } else { '─' };

        for (label, value) in series.points() {
            let len = if max > 0.0 {
                ((value.max(0.0) / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let bar: String = std::iter::repeat_n(glyph, len).collect();
            writeln!(f, "  {label:>label_width$} │{bar} {value:.1}")?;
        }

        Ok(())
    }
}
