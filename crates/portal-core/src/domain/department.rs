//! Department catalogue

use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct DepartmentCatalogue {
    names: Vec<String>,
}

impl DepartmentCatalogue {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn ensure(&self, name: &str) -> Result<(), DomainError> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(DomainError::UnknownDepartment(name.to_string()))
        }
    }
}

impl Default for DepartmentCatalogue {
    fn default() -> Self {
        Self::new(
            portal_shared::constants::DEFAULT_DEPARTMENTS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        )
    }
}
