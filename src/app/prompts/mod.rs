//! Prompt registries. Each command variant assembles its pipeline from the
//! prompt groups below plus generated descriptors covering the per-host and
//! per-service blocks already present in the configuration, so the unknown-
//! key pass only flags keys no registry member accounts for.

mod datasource;
mod deployment;
mod replication;

use std::collections::{HashMap, HashSet};

use crate::app::pipeline::PromptPipeline;
use crate::domain::keys;
use crate::domain::{DbmsType, PackageKind, PromptDescriptor, PropertyStore, Validator};

pub use datasource::datasource_prompts;
pub use deployment::deployment_prompts;
pub use replication::{replication_prompts, service_prompts};

/// Weight placing generated block descriptors after every explicit prompt.
const STRUCTURAL_WEIGHT: i32 = 1000;

/// Build the prompt pipeline for one command invocation.
pub fn registry_for(store: &PropertyStore, kind: PackageKind) -> PromptPipeline {
    let dbms = store
        .get(&[keys::DBMS_TYPE])
        .and_then(DbmsType::parse)
        .unwrap_or(DbmsType::Mysql);

    let mut prompts = deployment_prompts();
    prompts.extend(datasource_prompts(dbms, store));
    prompts.extend(replication_prompts(store));
    if let PackageKind::Service(_) = kind {
        if let Some(service) = store.get(&[keys::DEPLOYMENT_SERVICE]) {
            let service = service.to_string();
            prompts.extend(service_prompts(store, &service));
        }
    }
    let structural = structural_prompts(store, &prompts);
    prompts.extend(structural);
    PromptPipeline::new(prompts)
}

/// Generated descriptors for `hosts.<alias>.*` and `repl_services.<name>.*`
/// entries already in the store. A nested key is recognized when its leaf
/// matches a registered prompt key; the leaf's validator carries over, so a
/// misspelled or foreign nested key still fails the unknown-key pass.
fn structural_prompts(
    store: &PropertyStore,
    registered: &[PromptDescriptor],
) -> Vec<PromptDescriptor> {
    let known: HashSet<&str> = registered.iter().map(PromptDescriptor::key).collect();
    let mut leaf_validators: HashMap<&str, &Validator> = HashMap::new();
    for prompt in registered {
        let leaf = prompt.key().rsplit('.').next().unwrap_or(prompt.key());
        leaf_validators.entry(leaf).or_insert(prompt.validator());
    }

    let mut generated = Vec::new();
    for (flat_key, _) in store.flat_entries() {
        let dotted = flat_key.replace('[', ".").replace(']', "");
        if known.contains(dotted.as_str()) {
            continue;
        }
        let in_block = dotted.starts_with("hosts.")
            || dotted.starts_with("repl_services.");
        if !in_block {
            continue;
        }
        let leaf = dotted.rsplit('.').next().unwrap_or(dotted.as_str());
        let Some(validator) = leaf_validators.get(leaf) else {
            continue;
        };
        generated.push(
            PromptDescriptor::new(
                dotted.clone(),
                format!("Value for {}", dotted),
                (*validator).clone(),
            )
            .with_weight(STRUCTURAL_WEIGHT)
            .no_previous(),
        );
    }
    generated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationReport;

    fn multi_host_store() -> PropertyStore {
        let mut store = PropertyStore::new();
        store.set(&[keys::HOST], "db1");
        store.set(&[keys::USERID], "tungsten");
        store.set(&[keys::HOSTS, "alpha", keys::HOST], "db1.example.com");
        store.set(&[keys::HOSTS, "alpha", keys::REPL_ROLE], "master");
        store.set(&[keys::REPL_SERVICES, "east", keys::DEPLOYMENT_HOST], "alpha");
        store.set(&[keys::REPL_SERVICES, "east", keys::REPL_THL_PORT], "2112");
        store
    }

    #[test]
    fn block_entries_pass_the_unknown_key_check() {
        let store = multi_host_store();
        let pipeline = registry_for(&store, PackageKind::Install);

        let mut report = ValidationReport::new();
        pipeline.verify_no_unknown_keys(&store, &mut report);
        assert!(!report.has_errors(), "{:?}", report.entries());
    }

    #[test]
    fn unknown_leaf_keys_are_still_flagged() {
        let mut store = multi_host_store();
        store.set(&[keys::HOSTS, "alpha", "bogus_setting"], "1");

        let pipeline = registry_for(&store, PackageKind::Install);
        let mut report = ValidationReport::new();
        pipeline.verify_no_unknown_keys(&store, &mut report);

        assert!(report.has_errors());
        let entry = report.errors().next().unwrap();
        assert_eq!(entry.key.as_deref(), Some("hosts.alpha.bogus_setting"));
    }

    #[test]
    fn nested_values_are_validated_with_the_leaf_rule() {
        let mut store = multi_host_store();
        store.set(&[keys::REPL_SERVICES, "east", keys::REPL_BUFFER_SIZE], "500");

        let pipeline = registry_for(&store, PackageKind::Install);
        let mut report = ValidationReport::new();
        pipeline.run_batch(&mut store, &mut report);

        assert!(report.errors().any(|e| {
            e.key.as_deref() == Some("repl_services.east.repl_buffer_size")
        }));
    }

    #[test]
    fn batch_on_a_complete_store_is_clean() {
        let mut store = PropertyStore::new();
        store.set(&[keys::HOST], "db1");
        store.set(&[keys::USERID], "tungsten");
        store.set(&[keys::HOME_DIRECTORY], "/opt/ck");
        store.set(&[keys::REPL_ROLE], "master");

        let pipeline = registry_for(&store, PackageKind::Install);
        let mut report = ValidationReport::new();
        pipeline.run_batch(&mut store, &mut report);

        assert!(!report.has_errors(), "{:?}", report.entries());
        // Defaults were materialized.
        assert_eq!(store.get(&[keys::REPL_THL_PORT]), Some("2112"));
        assert_eq!(store.get(&[keys::DBMS_TYPE]), Some("mysql"));
    }
}
