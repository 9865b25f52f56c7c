use crate::core::identity::{find_scenario, is_valid_identity};
use crate::core::report::Outcome;
use crate::core::set_merge::merge;
use crate::domain::model::{Scenario, Service};

/// Reconciles one incoming scenario into `service`, which must already be the
/// matched store copy. Only the tags are merged; response data of an existing
/// scenario is left as it is.
pub fn reconcile_scenario(service: &mut Service, incoming: &Scenario) -> Outcome {
    if !is_valid_identity(&incoming.name) {
        return Outcome::InvalidScenarioIdentity {
            service: service.name.clone(),
        };
    }

    let Some(existing_tags) = find_scenario(service, &incoming.name).map(|s| s.tags.clone()) else {
        service.upsert_scenario(incoming.clone());
        return Outcome::ScenarioAdded {
            service: service.name.clone(),
            scenario: incoming.name.clone(),
        };
    };

    let (merged_tags, added) = merge(&existing_tags, &incoming.tags);
    if added == 0 {
        return Outcome::ScenarioConflict {
            service: service.name.clone(),
            scenario: incoming.name.clone(),
        };
    }

    if let Some(existing) = service.scenario_mut(&incoming.name) {
        existing.tags = merged_tags;
    }
    Outcome::ScenarioTagsMerged {
        service: service.name.clone(),
        scenario: incoming.name.clone(),
        added,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::OutcomeKind;

    fn service_with_abc() -> Service {
        Service::new("Service 1").with_scenario(
            Scenario::new("ABC")
                .with_tags(&["abc"])
                .with_response(200, "{\"ok\":true}"),
        )
    }

    #[test]
    fn test_unknown_scenario_is_added_as_full_copy() {
        let mut service = service_with_abc();
        let incoming = Scenario::new("DEF")
            .with_tags(&["def"])
            .with_response(404, "not found");

        let outcome = reconcile_scenario(&mut service, &incoming);

        assert_eq!(outcome.kind(), OutcomeKind::Addition);
        assert_eq!(outcome.to_string(), "New scenario 'DEF' added to service 'Service 1'");
        assert_eq!(service.scenarios().len(), 2);
        assert_eq!(service.scenarios()[1], incoming);
    }

    #[test]
    fn test_existing_scenario_gains_tags() {
        let mut service = service_with_abc();
        let incoming = Scenario::new("ABC").with_tags(&["def"]).with_response(500, "boom");

        let outcome = reconcile_scenario(&mut service, &incoming);

        assert_eq!(outcome.kind(), OutcomeKind::Merge);
        let scenario = &service.scenarios()[0];
        assert_eq!(scenario.tags.joined(), "abc def");
        assert_eq!(scenario.http_status, 200);
        assert_eq!(scenario.response_body, "{\"ok\":true}");
    }

    #[test]
    fn test_duplicate_scenario_is_conflict_without_mutation() {
        let mut service = service_with_abc();
        let before = service.clone();

        let outcome = reconcile_scenario(&mut service, &Scenario::new("ABC").with_tags(&["abc"]));

        assert_eq!(outcome.kind(), OutcomeKind::Conflict);
        assert_eq!(service, before);
    }

    #[test]
    fn test_blank_scenario_name_is_invalid_identity() {
        let mut service = service_with_abc();
        let outcome = reconcile_scenario(&mut service, &Scenario::new(" "));

        assert_eq!(
            outcome,
            Outcome::InvalidScenarioIdentity {
                service: "Service 1".to_string()
            }
        );
        assert_eq!(service.scenarios().len(), 1);
    }
}
