//! Fail-fast axis validation.
//!
//! Every load entry point validates its axes here before touching the
//! filesystem, so a malformed request never produces a half-read dataset.

use crate::app::models::AxisSpec;
use crate::Result;

/// Validate the outer date axis of an observation or forecast load
pub fn validate_date_axis(dates: &AxisSpec) -> Result<()> {
    dates.validate_dates()
}

/// Validate the day-of-year axis of a climatology load
pub fn validate_day_axis(days: &AxisSpec) -> Result<()> {
    days.validate_days()
}

/// Validate the nested forecast axes of a deterministic load
pub fn validate_forecast_axes(dates: &AxisSpec, _fhrs: &AxisSpec) -> Result<()> {
    // AxisSpec construction already guarantees non-empty fhr/member lists
    validate_date_axis(dates)
}

/// Validate the nested axes of an ensemble load
pub fn validate_ensemble_axes(dates: &AxisSpec, fhrs: &AxisSpec, _members: &AxisSpec) -> Result<()> {
    validate_forecast_axes(dates, fhrs)
}
