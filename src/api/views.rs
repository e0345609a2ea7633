use axum::extract::{Query, State};
use axum::Json;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics;
use crate::domain::{
    DailyForecast, FlowTarget, ForecastPoint, Granularity, HourlyAverage, MergedPoint,
    MeterReading, PeakTimeSummary, ResampledPoint, StatusSummary,
};
use crate::routing;
use crate::state::AppState;

use super::error::ApiError;
use super::response::{ApiResponse, Panel};
use super::authorize;

type MaybeBearer = Option<TypedHeader<Authorization<Bearer>>>;

fn token(bearer: &MaybeBearer) -> Option<&str> {
    bearer.as_ref().map(|h| h.token())
}

#[derive(Debug, Deserialize)]
pub struct MeterQuery {
    pub meter_code: Option<String>,
}

fn required_meter(query: &MeterQuery) -> Result<&str, ApiError> {
    query
        .meter_code
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::BadRequest("meter_code query parameter is required".to_string()))
}

/// GET /api/views/home
///
/// The landing dashboard: KPI figures, the latest reading per meter from
/// the polled snapshot, and (when a meter is selected) the peak-usage
/// analysis. Each panel degrades independently.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub status: Panel<StatusSummary>,
    pub meter_codes: Panel<Vec<String>>,
    pub latest_readings: Panel<Vec<MeterReading>>,
    pub readings_fetched_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageView>,
}

#[derive(Debug, Serialize)]
pub struct UsageView {
    pub meter_code: String,
    pub peaks: Option<PeakTimeSummary>,
    pub volume_by_hour: Vec<HourlyAverage>,
    pub rate_by_hour: Vec<HourlyAverage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn home(
    State(state): State<AppState>,
    bearer: MaybeBearer,
    Query(query): Query<MeterQuery>,
) -> Result<Json<ApiResponse<HomeView>>, ApiError> {
    authorize(&state, token(&bearer), routing::DASHBOARD_HOME)?;

    let (status, meter_codes) = tokio::join!(state.upstream.status(), state.upstream.meter_codes());

    let (latest_readings, readings_fetched_at) = {
        let cache = state.readings.read();
        let panel = Panel {
            data: analytics::latest_per_meter(&cache.readings),
            error: cache.last_error.clone(),
        };
        (panel, cache.fetched_at)
    };

    let usage = match &query.meter_code {
        None => None,
        Some(meter) => {
            // A failed fetch still renders the panel, as a dense all-zero
            // series with the error text inline.
            let (points, peaks, error) = match state.upstream.peak_times(meter).await {
                Ok(payload) => (payload.resampled_data, payload.peak_times.first().cloned(), None),
                Err(e) => (Vec::new(), None, Some(e.to_string())),
            };
            Some(UsageView {
                meter_code: meter.clone(),
                peaks,
                volume_by_hour: analytics::hourly_averages(
                    &points,
                    |p| &p.ds,
                    |p| FlowTarget::Volume.of(p),
                ),
                rate_by_hour: analytics::hourly_averages(
                    &points,
                    |p| &p.ds,
                    |p| FlowTarget::Rate.of(p),
                ),
                error,
            })
        }
    };

    Ok(Json(ApiResponse::success(HomeView {
        status: Panel::from_result(status),
        meter_codes: Panel::from_result(meter_codes),
        latest_readings,
        readings_fetched_at,
        usage,
    })))
}

/// GET /api/views/daily?meter_code=
///
/// Daily forecast analysis: per-target forecast curves plus the day-grouped
/// aggregate table from the combined forecast feed.
#[derive(Debug, Serialize)]
pub struct DailyView {
    pub meter_code: String,
    pub history: Panel<Vec<ResampledPoint>>,
    pub volume_forecast: Panel<Vec<ForecastPoint>>,
    pub rate_forecast: Panel<Vec<ForecastPoint>>,
    pub daily_aggregates: Panel<Vec<DailyForecast>>,
}

pub async fn daily(
    State(state): State<AppState>,
    bearer: MaybeBearer,
    Query(query): Query<MeterQuery>,
) -> Result<Json<ApiResponse<DailyView>>, ApiError> {
    authorize(&state, token(&bearer), routing::DASHBOARD_DAILY)?;
    let meter = required_meter(&query)?;

    let (history, volume, rate, combined) = tokio::join!(
        state.upstream.daily_resampled(meter),
        state.upstream.daily_forecast(meter, FlowTarget::Volume),
        state.upstream.daily_forecast(meter, FlowTarget::Rate),
        state.upstream.forecast(),
    );

    let daily_aggregates = Panel::from_result(combined.map(|records| {
        let scoped: Vec<_> = records
            .into_iter()
            .filter(|r| r.meter_code == meter && r.granularity == Granularity::Daily)
            .collect();
        analytics::aggregate_by_day(&scoped)
    }));

    Ok(Json(ApiResponse::success(DailyView {
        meter_code: meter.to_string(),
        history: Panel::from_result(history),
        volume_forecast: Panel::from_result(volume),
        rate_forecast: Panel::from_result(rate),
        daily_aggregates,
    })))
}

/// GET /api/views/hourly?meter_code=
///
/// Hourly forecast comparison: the historical and forecast series merged on
/// their exact timestamps for the chart and its table.
#[derive(Debug, Serialize)]
pub struct HourlyView {
    pub meter_code: String,
    pub history: Panel<Vec<ResampledPoint>>,
    pub merged: Panel<Vec<MergedPoint>>,
}

pub async fn hourly(
    State(state): State<AppState>,
    bearer: MaybeBearer,
    Query(query): Query<MeterQuery>,
) -> Result<Json<ApiResponse<HourlyView>>, ApiError> {
    authorize(&state, token(&bearer), routing::DASHBOARD_HOURLY)?;
    let meter = required_meter(&query)?;

    let (history, forecast) = tokio::join!(
        state.upstream.hourly_resampled(meter),
        state.upstream.hourly_forecast(meter),
    );

    let merged = Panel::from_result(forecast.map(|payload| {
        analytics::merge_series(
            &payload.resampled_data,
            FlowTarget::Volume,
            &payload.forecast_data,
        )
    }));
    let count = merged.data.len();

    Ok(Json(ApiResponse::success(HourlyView {
        meter_code: meter.to_string(),
        history: Panel::from_result(history),
        merged,
    })
    .with_count(count)))
}
