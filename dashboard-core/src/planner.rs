use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    advisory,
    client::WeatherSource,
    model::{ChartKind, ChartSeries, InfoPanel, PageKind, RenderDescriptor, WeatherSnapshot},
};

/// Turns a `(page, city)` pair into a [`RenderDescriptor`].
///
/// Provider failures are folded into the descriptor's `error`; `plan` itself never fails.
#[derive(Debug, Clone)]
pub struct PageRenderPlanner {
    source: Arc<dyn WeatherSource>,
}

impl PageRenderPlanner {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    pub async fn plan(&self, page: PageKind, city: &str) -> RenderDescriptor {
        match page {
            PageKind::Air => {
                return RenderDescriptor::placeholder(page, InfoPanel::air_quality(city));
            }
            PageKind::Allergy => {
                return RenderDescriptor::placeholder(page, InfoPanel::allergy(city));
            }
            _ => {}
        }

        let snapshot = match self.source.fetch(city).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(%page, city, error = %err, "weather fetch failed");
                return RenderDescriptor::failed(page, err.user_message());
            }
        };

        let advisory = advisory::derive(&snapshot);
        let series = chart_for(page, &snapshot);

        debug!(%page, city = %snapshot.city, "planned page");
        RenderDescriptor::loaded(page, snapshot, advisory, series)
    }
}

/// Monthly shares the daily forecast with the ten-day page; the provider has no monthly data.
fn chart_for(page: PageKind, snapshot: &WeatherSnapshot) -> Option<ChartSeries> {
    let hourly = || snapshot.hourly.iter().map(|h| (h.time_label.clone(), h.temp_c));
    let daily = || snapshot.daily.iter().map(|d| (d.date_label.clone(), d.max_temp_c));

    let series = match page {
        PageKind::Hourly => {
            ChartSeries::from_points(ChartKind::Line, "Hourly Temp (°C)", hourly())
        }
        PageKind::TenDay => ChartSeries::from_points(ChartKind::Bar, "Max Temp (°C)", daily()),
        PageKind::Monthly => {
            ChartSeries::from_points(ChartKind::Line, "Monthly Trend (Max °C)", daily())
        }
        PageKind::Today | PageKind::Air | PageKind::Allergy => return None,
    };

    Some(series)
}
