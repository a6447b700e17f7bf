//! Employee record models.

// self
use crate::_prelude::*;

/// Identifier assigned to an employee by the store.
pub type EmployeeId = u64;

/// Stored employee record.
///
/// Only the identifier is guaranteed; the remaining fields are stored as sent and serialize
/// as `null` when absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
	/// Store-assigned identifier; never reused.
	pub id: EmployeeId,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Job title.
	#[serde(default)]
	pub designation: Option<String>,
	/// Salary amount.
	#[serde(default)]
	pub salary: Option<f64>,
}
impl Employee {
	pub(crate) fn from_new(id: EmployeeId, employee: NewEmployee) -> Self {
		let NewEmployee { name, designation, salary } = employee;

		Self { id, name, designation, salary }
	}
}

/// Request body for creating or replacing an employee.
///
/// Any `id` field sent by a client is ignored; the store owns identifiers.
/// Omitted fields are accepted and stored as `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewEmployee {
	/// Display name.
	pub name: Option<String>,
	/// Job title.
	pub designation: Option<String>,
	/// Salary amount.
	pub salary: Option<f64>,
}
impl NewEmployee {
	/// Builds a body with every field present.
	pub fn new(name: impl Into<String>, designation: impl Into<String>, salary: f64) -> Self {
		Self { name: Some(name.into()), designation: Some(designation.into()), salary: Some(salary) }
	}
}
