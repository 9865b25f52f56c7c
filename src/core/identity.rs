use crate::domain::model::{Scenario, Service};
use crate::domain::ports::ServiceStore;

/// Exact, case-sensitive match on service name.
pub fn find_service<'a, S: ServiceStore + ?Sized>(store: &'a S, name: &str) -> Option<&'a Service> {
    store.get_service_by_name(name)
}

pub fn find_scenario<'a>(service: &'a Service, name: &str) -> Option<&'a Scenario> {
    service.scenarios().iter().find(|scenario| scenario.name == name)
}

/// 空白或空字串的名稱無法作為識別
pub fn is_valid_identity(name: &str) -> bool {
    !name.trim().is_empty()
}
