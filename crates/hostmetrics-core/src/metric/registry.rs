//! Process-wide registry of metric definitions.
//!
//! The registry is built once on first use and never mutated afterwards.
//! Lookups go through the definition identifier (`"CpuUserTime"`), which
//! maps to a factory producing a shared instance.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use super::{
    CpuIdleTime, CpuIoWaitTime, CpuSystemTime, CpuUserTime, LoadAverageLastFifteenMinutes,
    LoadAverageLastFiveMinutes, LoadAverageLastMinute, MemoryAvailable, MemoryFree, MemoryTotal,
    MetricDefinition, ProcessCount, SwapFree, Uptime,
};

type Factory = fn() -> Arc<dyn MetricDefinition>;

/// A configured identifier has no registered definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric '{id}'")]
pub struct UnknownMetricError {
    pub id: String,
}

const FACTORIES: &[Factory] = &[
    || Arc::new(CpuUserTime),
    || Arc::new(CpuSystemTime),
    || Arc::new(CpuIdleTime),
    || Arc::new(CpuIoWaitTime),
    || Arc::new(LoadAverageLastMinute),
    || Arc::new(LoadAverageLastFiveMinutes),
    || Arc::new(LoadAverageLastFifteenMinutes),
    || Arc::new(MemoryTotal),
    || Arc::new(MemoryFree),
    || Arc::new(MemoryAvailable),
    || Arc::new(SwapFree),
    || Arc::new(Uptime),
    || Arc::new(ProcessCount),
];

static REGISTRY: LazyLock<BTreeMap<&'static str, Factory>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    for factory in FACTORIES {
        let id = factory().id();
        let previous = map.insert(id, *factory);
        assert!(previous.is_none(), "metric '{}' registered twice", id);
    }
    map
});

/// Resolves a definition by identifier.
pub fn resolve(id: &str) -> Result<Arc<dyn MetricDefinition>, UnknownMetricError> {
    REGISTRY
        .get(id)
        .map(|factory| factory())
        .ok_or_else(|| UnknownMetricError { id: id.to_string() })
}

/// All registered identifiers, sorted.
pub fn ids() -> impl Iterator<Item = &'static str> {
    REGISTRY.keys().copied()
}

/// One instance of every registered definition, in identifier order.
pub fn all() -> Vec<Arc<dyn MetricDefinition>> {
    REGISTRY.values().map(|factory| factory()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resolve_cpu_user_time() {
        let def = resolve("CpuUserTime").unwrap();
        assert_eq!(def.id(), "CpuUserTime");
        assert_eq!(def.name(), "CPU User Time");
    }

    #[test]
    fn test_resolve_unknown() {
        let err = resolve("CpuWizardTime").unwrap_err();
        assert_eq!(err.id, "CpuWizardTime");
        assert_eq!(err.to_string(), "unknown metric 'CpuWizardTime'");
    }

    #[test]
    fn test_identifiers_are_case_sensitive() {
        assert!(resolve("cpuusertime").is_err());
    }

    #[test]
    fn test_every_definition_is_well_formed() {
        for def in all() {
            assert!(!def.id().is_empty());
            assert!(!def.name().is_empty(), "{} has empty name", def.id());
            assert!(
                !def.description().is_empty(),
                "{} has empty description",
                def.id()
            );
            // Repeated calls return identical values.
            assert_eq!(def.name(), def.name());
            assert_eq!(def.description(), def.description());
            assert_eq!(resolve(def.id()).unwrap().name(), def.name());
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = all().iter().map(|d| d.name()).collect();
        assert_eq!(names.len(), FACTORIES.len());
        assert_eq!(ids().count(), FACTORIES.len());
    }

    #[test]
    fn test_ids_sorted() {
        let ids: Vec<&str> = ids().collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert!(ids.contains(&"LoadAverageLastMinute"));
    }
}
