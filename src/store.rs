//! Storage contract and the built-in in-memory store for employee records.

pub mod employee;
pub mod memory;

pub use employee::*;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`EmployeeStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// CRUD contract implemented by employee stores.
///
/// Every operation is atomic with respect to the others: a reader never observes a
/// half-applied write, and two concurrent creates never receive the same id.
pub trait EmployeeStore
where
	Self: Send + Sync,
{
	/// Assigns the next id to `employee` and stores it.
	fn create(&self, employee: NewEmployee) -> StoreFuture<'_, Employee>;

	/// Fetches the record stored under `id`.
	fn get(&self, id: EmployeeId) -> StoreFuture<'_, Employee>;

	/// Returns every stored record ordered by id.
	fn list(&self) -> StoreFuture<'_, Vec<Employee>>;

	/// Replaces the fields of an existing record, keeping its id.
	fn update(&self, id: EmployeeId, employee: NewEmployee) -> StoreFuture<'_, Employee>;

	/// Removes and returns the record stored under `id`.
	fn delete(&self, id: EmployeeId) -> StoreFuture<'_, Employee>;

	/// Number of stored records.
	fn count(&self) -> StoreFuture<'_, usize>;
}

/// Error type produced by [`EmployeeStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// No record is stored under the requested id.
	#[error("Employee {id} was not found.")]
	NotFound {
		/// Requested identifier.
		id: EmployeeId,
	},
	/// The id counter cannot advance any further.
	#[error("Employee id space is exhausted.")]
	IdSpaceExhausted,
}
