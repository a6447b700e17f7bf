//! Employee CRUD handlers.

// crates.io
use axum::{
	Json,
	extract::{Path, State, rejection::{JsonRejection, PathRejection}},
};
use serde_json::{Value, json};
// self
use crate::{
	_prelude::*,
	server::{ApiError, AppState},
	store::{Employee, EmployeeId, NewEmployee},
};

pub(super) async fn list(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, ApiError> {
	Ok(Json(state.store.list().await?))
}

pub(super) async fn fetch(
	State(state): State<AppState>,
	id: Result<Path<EmployeeId>, PathRejection>,
) -> Result<Json<Employee>, ApiError> {
	let id = employee_id(id)?;

	Ok(Json(state.store.get(id).await?))
}

pub(super) async fn create(
	State(state): State<AppState>,
	body: Result<Json<NewEmployee>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
	let employee = state.store.create(employee_body(body)?).await?;

	tracing::info!(id = employee.id, "employee created");

	Ok(Json(employee))
}

pub(super) async fn update(
	State(state): State<AppState>,
	id: Result<Path<EmployeeId>, PathRejection>,
	body: Result<Json<NewEmployee>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
	let id = employee_id(id)?;
	let employee = state.store.update(id, employee_body(body)?).await?;

	tracing::info!(id, "employee updated");

	Ok(Json(employee))
}

pub(super) async fn remove(
	State(state): State<AppState>,
	id: Result<Path<EmployeeId>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
	let id = employee_id(id)?;

	state.store.delete(id).await?;

	tracing::info!(id, "employee deleted");

	Ok(Json(json!({ "message": format!("Deleted employee {id}") })))
}

fn employee_id(id: Result<Path<EmployeeId>, PathRejection>) -> Result<EmployeeId> {
	id.map(|Path(id)| id).map_err(|e| Error::Validation { reason: e.body_text() })
}

fn employee_body(body: Result<Json<NewEmployee>, JsonRejection>) -> Result<NewEmployee> {
	body.map(|Json(employee)| employee).map_err(|e| Error::Validation { reason: e.body_text() })
}
