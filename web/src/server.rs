use availability::wire::{
    blocked_dates_from_dtos, bookings_from_dtos, parse_date, parse_timestamp, settings_from_dto,
    settings_to_dto,
};
use availability::{build_month_grid, date_range, BlockedDateRegistry, BookingSettings};
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use shared_types::{
    AvailabilityResultDto, BlockRangeRequestDto, BlockRangeResponseDto, BlockStats,
    BlockStatsRequestDto, BlockedDateDto, BookingSettingsDto, CalendarMonthDto,
    CheckBookingRequestDto, CheckBookingResponseDto, HealthDto, ResolveRequestDto,
};
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::AppError;

type ApiResult<T> = Result<Json<T>, AppError>;

/// Longest range one request may block, in days.
pub const MAX_BLOCK_RANGE_DAYS: u64 = 366;

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Bookable slots for one date.
pub async fn resolve_availability(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequestDto>,
) -> ApiResult<AvailabilityResultDto> {
    let settings = enabled_settings(&state, &request.settings)?;
    let date = parse_date(&request.date)?;
    let blocked = blocked_dates_from_dtos(&request.blocked_dates)?;
    let bookings = bookings_from_dtos(&request.bookings)?;
    let now = request_now(request.now.as_deref())?;

    let result = settings.resolver().resolve(date, &blocked, &bookings, now)?;
    Ok(Json(AvailabilityResultDto::from(&result)))
}

/// Re-validate a slot right before a booking is created.
pub async fn check_booking(
    State(state): State<AppState>,
    Json(request): Json<CheckBookingRequestDto>,
) -> ApiResult<CheckBookingResponseDto> {
    let settings = enabled_settings(&state, &request.settings)?;
    let date = parse_date(&request.date)?;
    let blocked = blocked_dates_from_dtos(&request.blocked_dates)?;
    let bookings = bookings_from_dtos(&request.bookings)?;
    let now = request_now(request.now.as_deref())?;

    if let Err(rejection) = settings
        .resolver()
        .check_booking(date, &request.time, &blocked, &bookings, now)
    {
        warn!(%date, time = %request.time, code = rejection.code(), "booking rejected");
        return Err(rejection.into());
    }

    info!(%date, time = %request.time, "booking slot accepted");
    Ok(Json(CheckBookingResponseDto { accepted: true }))
}

/// Validate settings before they are saved and echo them back normalised.
pub async fn validate_settings(
    State(state): State<AppState>,
    Json(settings): Json<BookingSettingsDto>,
) -> ApiResult<BookingSettingsDto> {
    let settings = settings_from_dto(&settings, state.config.time_zone).inspect_err(|err| {
        warn!("rejected booking settings: {}", err);
    })?;
    Ok(Json(settings_to_dto(&settings)))
}

/// Full-day records for every date of a range.
pub async fn block_range(
    Json(request): Json<BlockRangeRequestDto>,
) -> ApiResult<BlockRangeResponseDto> {
    let start = parse_date(&request.start_date)?;
    let end = parse_date(&request.end_date)?;
    let day_count = date_range::day_count(start, end);
    if day_count > MAX_BLOCK_RANGE_DAYS {
        warn!(%start, %end, day_count, "rejected oversized block range");
        return Err(AppError::BadRequest(format!(
            "range covers {day_count} days; at most {MAX_BLOCK_RANGE_DAYS} can be blocked at once"
        )));
    }
    let reason = request
        .reason
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty());

    let mut registry = BlockedDateRegistry::new();
    let created = registry.block_range(start, end, reason, Utc::now());

    Ok(Json(BlockRangeResponseDto {
        day_count,
        blocked_dates: created.iter().map(BlockedDateDto::from).collect(),
    }))
}

pub async fn blocked_date_stats(
    State(state): State<AppState>,
    Json(request): Json<BlockStatsRequestDto>,
) -> ApiResult<BlockStats> {
    let records = blocked_dates_from_dtos(&request.blocked_dates)?;
    let registry = BlockedDateRegistry::from_records(records);
    let today = match request.today.as_deref() {
        Some(today) => parse_date(today)?,
        None => business_today(&state),
    };
    let window_days = request
        .window_days
        .unwrap_or(state.config.upcoming_window_days);

    Ok(Json(registry.stats(today, window_days)))
}

pub async fn month_grid(Path((year, month)): Path<(i32, u32)>) -> ApiResult<CalendarMonthDto> {
    let grid = build_month_grid(year, month)?;
    Ok(Json(CalendarMonthDto::from(&grid)))
}

fn enabled_settings(state: &AppState, dto: &BookingSettingsDto) -> Result<BookingSettings, AppError> {
    let settings = settings_from_dto(dto, state.config.time_zone)?;
    if !settings.is_booking_enabled {
        return Err(AppError::BookingDisabled);
    }
    Ok(settings)
}

fn request_now(now: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match now {
        Some(now) => Ok(parse_timestamp(now)?),
        None => Ok(Utc::now()),
    }
}

fn business_today(state: &AppState) -> NaiveDate {
    Utc::now().with_timezone(&state.config.time_zone).date_naive()
}
