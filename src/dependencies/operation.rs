use super::hook::{Depends, HookArg};
use super::inject::inject_dependencies;
use crate::config::CrudMethod;
use std::collections::HashMap;

/// Hooks configured per CRUD operation of one entity.
#[derive(Clone, Debug, Default)]
pub struct OperationDependencies {
    by_method: HashMap<CrudMethod, Vec<Depends>>,
}

impl OperationDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap and store hooks for `method`. `None` leaves the operation unconfigured.
    pub fn set(&mut self, method: CrudMethod, hooks: Option<Vec<HookArg>>) -> &mut Self {
        match inject_dependencies(hooks) {
            Some(handles) => {
                self.by_method.insert(method, handles);
            }
            None => {
                self.by_method.remove(&method);
            }
        }
        self
    }

    pub fn with(mut self, method: CrudMethod, hooks: Vec<HookArg>) -> Self {
        self.set(method, Some(hooks));
        self
    }

    /// None when no hooks were configured for `method`; Some(&[]) when configured empty.
    pub fn get(&self, method: CrudMethod) -> Option<&[Depends]> {
        self.by_method.get(&method).map(Vec::as_slice)
    }
}
