//! Employee entity.

use common::EntityId;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// A staff member with a free-form role.
///
/// Serialized with camelCase field names and a derived `name` field holding
/// the full name. On input, `name` takes precedence over `firstName` and
/// `lastName` when present.
///
/// Because output always includes `name`, a client that fetches an employee,
/// edits only `firstName` or `lastName` and sends the object back must also
/// update or drop `name`; otherwise the stale `name` overrides the edit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "EmployeeRepr", from = "EmployeeRepr")]
pub struct Employee {
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl Employee {
    /// Creates an unsaved employee.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: role.into(),
        }
    }

    /// Returns `"{first_name} {last_name}"`.
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Sets first and last name from a full name, splitting on the first space.
    pub fn set_name(&mut self, name: &str) {
        match name.split_once(' ') {
            Some((first, last)) => {
                self.first_name = first.to_string();
                self.last_name = last.to_string();
            }
            None => {
                self.first_name = name.to_string();
                self.last_name = String::new();
            }
        }
    }
}

impl Entity for Employee {
    const KIND: &'static str = "employee";
    const COLLECTION: &'static str = "employees";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn replace_fields(&mut self, other: Self) {
        self.first_name = other.first_name;
        self.last_name = other.last_name;
        self.role = other.role;
    }
}

impl std::fmt::Display for Employee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self
            .id
            .map_or_else(|| "null".to_string(), |id| id.to_string());
        write!(
            f,
            "Employee{{id={id}, firstName='{}', lastName='{}', role='{}'}}",
            self.first_name, self.last_name, self.role
        )
    }
}

// Wire shape.
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct EmployeeRepr {
    id: Option<EntityId>,
    first_name: String,
    last_name: String,
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl From<Employee> for EmployeeRepr {
    fn from(employee: Employee) -> Self {
        let name = Some(employee.name());
        Self {
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            role: employee.role,
            name,
        }
    }
}

impl From<EmployeeRepr> for Employee {
    fn from(repr: EmployeeRepr) -> Self {
        let mut employee = Employee {
            id: repr.id,
            first_name: repr.first_name,
            last_name: repr.last_name,
            role: repr.role,
        };
        if let Some(name) = repr.name {
            employee.set_name(&name);
        }
        employee
    }
}
