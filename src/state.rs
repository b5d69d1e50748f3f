//! Shared application state for all routes.

use crate::cache::ModelCache;
use crate::config::Environment;
use crate::model::ModelBlueprint;
use crate::provision::Provisioner;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub provisioner: Arc<dyn Provisioner>,
    /// One compiled model per (consumer, tenant, design-time) key.
    pub models: Arc<ModelCache>,
    pub blueprint: Arc<ModelBlueprint>,
    pub environment: Environment,
}
