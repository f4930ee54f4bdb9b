//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    MonthCalendar, PayslipInput, aggregate_month, aggregate_worker, assemble_payslip,
};
use crate::models::{PayslipOptions, WorkerMonth};

use super::request::{PayslipRequest, RejectedShift, TimesheetRequest, convert_shifts};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/timesheet", post(timesheet_handler))
        .route("/payslip", post(payslip_handler))
        .with_state(state)
}

/// Handler for POST /timesheet.
///
/// Aggregates a payroll month for the requested workers.
async fn timesheet_handler(
    State(state): State<AppState>,
    payload: Result<Json<TimesheetRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing timesheet request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let (shifts, rejected) = convert_shifts(request.shifts);
    log_rejected(&rejected, correlation_id);

    let start_time = Instant::now();
    match aggregate_month(
        &shifts,
        request.workers.as_slice(),
        state.config().rates(),
        request.year,
        request.month,
    ) {
        Ok(mut timesheet) => {
            attach_rejected(&mut timesheet.workers, rejected);
            info!(
                correlation_id = %correlation_id,
                year = request.year,
                month = request.month,
                workers = timesheet.workers.len(),
                shifts_count = shifts.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Timesheet completed successfully"
            );
            json_response(StatusCode::OK, &timesheet)
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /payslip.
///
/// Aggregates one worker's month and assembles the payslip.
async fn payslip_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayslipRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip request");

    let mut request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    for shift in request.shifts.iter_mut().filter(|s| s.worker_id.is_empty()) {
        shift.worker_id = request.worker.id.clone();
    }
    let (shifts, rejected) = convert_shifts(std::mem::take(&mut request.shifts));
    log_rejected(&rejected, correlation_id);

    let calendar = match MonthCalendar::new(request.year, request.month) {
        Ok(calendar) => calendar,
        Err(err) => return engine_error_response(err, correlation_id),
    };

    let start_time = Instant::now();
    let config = state.config();
    let month = aggregate_worker(&shifts, &request.worker.id, config.rates(), &calendar);
    let mut payslip = assemble_payslip(&PayslipInput {
        company: config.company(),
        worker: &request.worker,
        month: &month,
        period: calendar.period(),
        shifts: &shifts,
        allowances: &request.allowances,
        deductions: &request.deductions,
        options: PayslipOptions {
            include_cancelled_in_care_list: request.include_cancelled_in_care_list,
        },
    });
    payslip.diagnostics.extend(
        rejected
            .into_iter()
            .filter(|r| r.worker_id == request.worker.id)
            .map(|r| r.diagnostic),
    );

    info!(
        correlation_id = %correlation_id,
        worker_id = %request.worker.id,
        shifts_count = shifts.len(),
        net_pay = %payslip.net_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Payslip completed successfully"
    );
    json_response(StatusCode::OK, &payslip)
}

/// Adds conversion diagnostics to the workers the rejected shifts belonged to.
fn attach_rejected(workers: &mut [WorkerMonth], rejected: Vec<RejectedShift>) {
    for rejection in rejected {
        if let Some(worker) = workers
            .iter_mut()
            .find(|w| w.worker_id() == rejection.worker_id)
        {
            worker.diagnostics.push(rejection.diagnostic);
        }
    }
}

fn log_rejected(rejected: &[RejectedShift], correlation_id: Uuid) {
    for rejection in rejected {
        warn!(
            correlation_id = %correlation_id,
            worker_id = %rejection.worker_id,
            shift_id = rejection.diagnostic.shift_id.as_deref().unwrap_or_default(),
            code = ?rejection.diagnostic.code,
            reason = %rejection.diagnostic.message,
            "Shift rejected for a malformed time range"
        );
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(err: crate::error::EngineError, correlation_id: Uuid) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Calculation failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, &api_error.error)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}
