//! Thread-safe in-memory [`EmployeeStore`] implementation.

// self
use crate::{
	_prelude::*,
	store::{Employee, EmployeeId, EmployeeStore, NewEmployee, StoreError, StoreFuture},
};

type StoreState = Arc<RwLock<Records>>;

#[derive(Debug)]
struct Records {
	next_id: EmployeeId,
	entries: BTreeMap<EmployeeId, Employee>,
}
impl Default for Records {
	fn default() -> Self {
		Self { next_id: 1, entries: BTreeMap::new() }
	}
}

/// Storage backend that keeps employee records in-process.
///
/// Records are lost when the process exits.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreState);
impl MemoryStore {
	fn create_now(state: StoreState, employee: NewEmployee) -> Result<Employee, StoreError> {
		let mut guard = state.write();
		let id = guard.next_id;

		guard.next_id = id.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;

		let record = Employee::from_new(id, employee);

		guard.entries.insert(id, record.clone());

		Ok(record)
	}

	fn get_now(state: StoreState, id: EmployeeId) -> Result<Employee, StoreError> {
		state.read().entries.get(&id).cloned().ok_or(StoreError::NotFound { id })
	}

	fn list_now(state: StoreState) -> Vec<Employee> {
		state.read().entries.values().cloned().collect()
	}

	fn update_now(
		state: StoreState,
		id: EmployeeId,
		employee: NewEmployee,
	) -> Result<Employee, StoreError> {
		let mut guard = state.write();

		match guard.entries.get_mut(&id) {
			Some(record) => {
				*record = Employee::from_new(id, employee);

				Ok(record.clone())
			},
			None => Err(StoreError::NotFound { id }),
		}
	}

	fn delete_now(state: StoreState, id: EmployeeId) -> Result<Employee, StoreError> {
		state.write().entries.remove(&id).ok_or(StoreError::NotFound { id })
	}
}
impl EmployeeStore for MemoryStore {
	fn create(&self, employee: NewEmployee) -> StoreFuture<'_, Employee> {
		let state = self.0.clone();

		Box::pin(async move { Self::create_now(state, employee) })
	}

	fn get(&self, id: EmployeeId) -> StoreFuture<'_, Employee> {
		let state = self.0.clone();

		Box::pin(async move { Self::get_now(state, id) })
	}

	fn list(&self) -> StoreFuture<'_, Vec<Employee>> {
		let state = self.0.clone();

		Box::pin(async move { Ok(Self::list_now(state)) })
	}

	fn update(&self, id: EmployeeId, employee: NewEmployee) -> StoreFuture<'_, Employee> {
		let state = self.0.clone();

		Box::pin(async move { Self::update_now(state, id, employee) })
	}

	fn delete(&self, id: EmployeeId) -> StoreFuture<'_, Employee> {
		let state = self.0.clone();

		Box::pin(async move { Self::delete_now(state, id) })
	}

	fn count(&self) -> StoreFuture<'_, usize> {
		let state = self.0.clone();

		Box::pin(async move { Ok(state.read().entries.len()) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn exhausted_counter_is_reported() {
		let store = MemoryStore::default();

		store.0.write().next_id = EmployeeId::MAX;

		let err = MemoryStore::create_now(store.0.clone(), NewEmployee::new("Ada", "Engineer", 1.0))
			.expect_err("The last id cannot be handed out.");

		assert_eq!(err, StoreError::IdSpaceExhausted);
		assert!(store.0.read().entries.is_empty());
	}
}
