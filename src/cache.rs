//! Tenant-scoped model cache.
//!
//! Compiled models are partitioned by (consumer type, tenant id, design-time
//! flag) so tenants never observe each other's schema metadata and a model is
//! compiled at most once per distinct key. There is no eviction; the cache
//! lives as long as the process.

use crate::error::AppError;
use crate::model::{ModelBlueprint, TenantModel};
use crate::tenant::TenantId;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Cache key with value equality over (consumer type, tenant, design-time).
///
/// Two keys built from equal tuples compare equal; differing tenant ids always
/// produce distinct keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelCacheKey {
    consumer: TypeId,
    tenant: TenantId,
    design_time: bool,
}

impl ModelCacheKey {
    pub fn for_consumer<C: 'static>(tenant: &TenantId, design_time: bool) -> Self {
        ModelCacheKey {
            consumer: TypeId::of::<C>(),
            tenant: tenant.clone(),
            design_time,
        }
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }
}

/// Process-wide cache of compiled tenant models.
#[derive(Default)]
pub struct ModelCache {
    entries: RwLock<HashMap<ModelCacheKey, Arc<TenantModel>>>,
    compiles: AtomicU64,
    hits: AtomicU64,
}

impl ModelCache {
    pub fn new() -> Self {
        ModelCache::default()
    }

    /// Fetch the model for `key`, compiling it with `compile` on first access.
    ///
    /// Double-checked: a read-lock probe serves the hot path; the write lock
    /// is re-checked before compiling so concurrent first accesses for the
    /// same key still compile exactly once. Every caller for a given key
    /// shares the same `Arc`.
    pub fn get_or_compile_with(
        &self,
        key: ModelCacheKey,
        compile: impl FnOnce() -> TenantModel,
    ) -> Result<Arc<TenantModel>, AppError> {
        {
            let entries = self
                .entries
                .read()
                .map_err(|_| AppError::Internal("model cache lock poisoned".into()))?;
            if let Some(model) = entries.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(model));
            }
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| AppError::Internal("model cache lock poisoned".into()))?;
        if let Some(model) = entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(model));
        }

        tracing::debug!(
            tenant = %key.tenant(),
            design_time = key.design_time,
            "compiling tenant model"
        );
        let model = Arc::new(compile());
        self.compiles.fetch_add(1, Ordering::Relaxed);
        entries.insert(key, Arc::clone(&model));
        Ok(model)
    }

    /// Fetch the model for `C`'s view of `tenant`, compiling the blueprint on
    /// first access.
    pub fn get_or_compile<C: 'static>(
        &self,
        blueprint: &ModelBlueprint,
        tenant: &TenantId,
        design_time: bool,
    ) -> Result<Arc<TenantModel>, AppError> {
        let key = ModelCacheKey::for_consumer::<C>(tenant, design_time);
        self.get_or_compile_with(key, || blueprint.compile(tenant, design_time))
    }

    /// Number of distinct models compiled so far.
    pub fn compile_count(&self) -> u64 {
        self.compiles.load(Ordering::Relaxed)
    }

    pub fn hit_count(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;

    struct Handler;
    struct OtherHandler;

    fn tenant(id: &str) -> TenantId {
        TenantId::new(id).unwrap()
    }

    fn blueprint() -> ModelBlueprint {
        ModelBlueprint::application_default()
    }

    #[test]
    fn equal_tuples_produce_equal_keys() {
        let t = tenant("acme");
        let a = ModelCacheKey::for_consumer::<Handler>(&t, false);
        let b = ModelCacheKey::for_consumer::<Handler>(&t, false);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_tenants_produce_distinct_keys() {
        let a = ModelCacheKey::for_consumer::<Handler>(&tenant("acme"), false);
        let b = ModelCacheKey::for_consumer::<Handler>(&tenant("globex"), false);
        assert_ne!(a, b);
    }

    #[test]
    fn consumer_type_and_flag_partition_keys() {
        let t = tenant("acme");
        let runtime = ModelCacheKey::for_consumer::<Handler>(&t, false);
        let design = ModelCacheKey::for_consumer::<Handler>(&t, true);
        let other = ModelCacheKey::for_consumer::<OtherHandler>(&t, false);
        assert_ne!(runtime, design);
        assert_ne!(runtime, other);
    }

    #[test]
    fn second_access_is_a_hit_not_a_compile() {
        let cache = ModelCache::new();
        let bp = blueprint();
        let t = tenant("acme");

        let first = cache.get_or_compile::<Handler>(&bp, &t, false).unwrap();
        let second = cache.get_or_compile::<Handler>(&bp, &t, false).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.compile_count(), 1);
        assert_eq!(cache.hit_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn tenants_do_not_share_models() {
        let cache = ModelCache::new();
        let bp = blueprint();

        let acme = cache.get_or_compile::<Handler>(&bp, &tenant("acme"), false).unwrap();
        let globex = cache.get_or_compile::<Handler>(&bp, &tenant("globex"), false).unwrap();

        assert!(!Arc::ptr_eq(&acme, &globex));
        assert_eq!(acme.schema_name, "tenant_acme");
        assert_eq!(globex.schema_name, "tenant_globex");
        assert_eq!(cache.compile_count(), 2);
    }

    #[test]
    fn design_time_and_runtime_are_separate_entries() {
        let cache = ModelCache::new();
        let bp = blueprint();
        let t = tenant("acme");

        let runtime = cache.get_or_compile::<Handler>(&bp, &t, false).unwrap();
        let design = cache.get_or_compile::<Handler>(&bp, &t, true).unwrap();

        assert!(!Arc::ptr_eq(&runtime, &design));
        assert!(!runtime.design_time);
        assert!(design.design_time);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_first_access_compiles_once() {
        let cache = Arc::new(ModelCache::new());
        let compiled = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));
        let t = tenant("acme");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let compiled = Arc::clone(&compiled);
                let barrier = Arc::clone(&barrier);
                let t = t.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    let key = ModelCacheKey::for_consumer::<Handler>(&t, false);
                    cache
                        .get_or_compile_with(key, || {
                            compiled.fetch_add(1, Ordering::SeqCst);
                            ModelBlueprint::application_default().compile(&t, false)
                        })
                        .unwrap()
                })
            })
            .collect();

        let models: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(compiled.load(Ordering::SeqCst), 1);
        assert_eq!(cache.compile_count(), 1);
        assert!(models.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
