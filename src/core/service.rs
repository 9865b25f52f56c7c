use crate::core::identity::{find_service, is_valid_identity};
use crate::core::report::{Outcome, OutcomeKind, ReconciliationReport};
use crate::core::scenario::reconcile_scenario;
use crate::core::set_merge::merge;
use crate::domain::model::{Service, Snapshot};
use crate::domain::ports::ServiceStore;

/// 把匯入的服務依序 reconcile 進 `store`。
///
/// 服務按照輸入順序逐一處理，後面的服務會看到前面已經寫入的結果，所以訊息的
/// 數量和順序是可重現的。每個服務各自 commit，沒有 rollback；同一份匯入重跑一次，
/// 已寫入的服務都會變成 Conflict。
///
/// The store is borrowed mutably for the whole call. Callers sharing a store
/// across threads hold their mutex around the entire call.
pub fn reconcile<S: ServiceStore + ?Sized>(
    store: &mut S,
    incoming: &[Service],
) -> ReconciliationReport {
    let mut report = ReconciliationReport::new();
    for service in incoming {
        for outcome in reconcile_service(store, service) {
            report.record(&outcome);
        }
    }

    tracing::info!(
        services = incoming.len(),
        "Reconciliation finished: {}",
        report.summary()
    );
    report
}

/// Services first, then the store-level proxy settings when the snapshot has them.
pub fn reconcile_snapshot<S: ServiceStore + ?Sized>(
    store: &mut S,
    snapshot: &Snapshot,
) -> ReconciliationReport {
    let mut report = reconcile(store, &snapshot.services);

    if let Some(proxy) = &snapshot.proxy {
        store.set_proxy_settings(proxy.clone());
        report.record(&Outcome::ProxySettingsApplied {
            settings: proxy.to_string(),
        });
    }

    report
}

/// Outcomes for one incoming service, in the order they should be reported.
fn reconcile_service<S: ServiceStore + ?Sized>(store: &mut S, incoming: &Service) -> Vec<Outcome> {
    if !is_valid_identity(&incoming.name) {
        return vec![Outcome::InvalidServiceIdentity];
    }

    let Some(mut updated) = find_service(store, &incoming.name).cloned() else {
        return add_service(store, incoming);
    };

    let had_urls = !updated.real_urls.is_empty();

    let (merged_tags, tags_added) = merge(&updated.tags, &incoming.tags);
    updated.tags = merged_tags;

    let (merged_urls, urls_added) = merge(&updated.real_urls, &incoming.real_urls);
    updated.real_urls = merged_urls;

    let scenario_outcomes: Vec<Outcome> = incoming
        .scenarios()
        .iter()
        .map(|scenario| reconcile_scenario(&mut updated, scenario))
        .collect();
    let scenarios_contributed = scenario_outcomes
        .iter()
        .any(|outcome| outcome.kind() != OutcomeKind::Conflict);

    if tags_added == 0 && urls_added == 0 && !scenarios_contributed {
        // 完全重複：重複的 scenario 併入服務層級的 Conflict，無效名稱仍各自回報
        let mut outcomes: Vec<Outcome> = scenario_outcomes
            .into_iter()
            .filter(|outcome| matches!(outcome, Outcome::InvalidScenarioIdentity { .. }))
            .collect();
        outcomes.push(Outcome::ServiceConflict {
            service: incoming.name.clone(),
        });
        return outcomes;
    }

    let mut outcomes = scenario_outcomes;
    if tags_added > 0 {
        outcomes.push(Outcome::ServiceTagsMerged {
            service: incoming.name.clone(),
            added: tags_added,
        });
    }
    if urls_added > 0 {
        if had_urls {
            outcomes.push(Outcome::ServiceUrlsMerged {
                service: incoming.name.clone(),
                added: urls_added,
            });
        } else {
            outcomes.push(Outcome::ForwardingEndpointConfigured {
                service: incoming.name.clone(),
                urls: updated.real_urls.iter().map(|url| url.to_string()).collect(),
            });
        }
    }

    store.upsert_service(updated);
    outcomes
}

/// 新服務整份寫入，但名稱無效的 scenario 不保存，每個各回報一個 Conflict
fn add_service<S: ServiceStore + ?Sized>(store: &mut S, incoming: &Service) -> Vec<Outcome> {
    let mut added = incoming.clone();
    let rejected = added.retain_scenarios(|scenario| is_valid_identity(&scenario.name));

    let mut outcomes = vec![Outcome::ServiceAdded {
        service: incoming.name.clone(),
    }];
    outcomes.extend((0..rejected).map(|_| Outcome::InvalidScenarioIdentity {
        service: incoming.name.clone(),
    }));

    store.upsert_service(added);
    outcomes
}
