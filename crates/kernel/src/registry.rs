use anyhow::Context;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::module::{InitCtx, Module};
use crate::schema::CollectionSpec;

/// Module registry: owns the registered modules and aggregates their schema
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module with the registry
    pub fn register(&mut self, module: Arc<dyn Module>) {
        self.modules.push(module);
    }

    /// Get all registered modules in registration order
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Get a module by name
    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Initialize modules in registration order, stopping at the first failure
    pub async fn init_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("initializing {} modules", self.modules.len());

        for module in &self.modules {
            tracing::debug!(module = module.name(), "initializing module");

            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Collect the collections declared by every module.
    ///
    /// Declarations of the same collection are merged; the result is sorted by
    /// collection name so schema application is deterministic.
    pub fn collect_collections(&self) -> Vec<CollectionSpec> {
        let mut merged: BTreeMap<String, CollectionSpec> = BTreeMap::new();

        for module in &self.modules {
            for spec in module.collections() {
                tracing::debug!(
                    module = module.name(),
                    collection = %spec.name,
                    indexes = spec.indexes.len(),
                    "collected collection declaration"
                );

                match merged.get_mut(&spec.name) {
                    Some(existing) => {
                        for index in spec.indexes {
                            existing.push_index(index);
                        }
                    }
                    None => {
                        merged.insert(spec.name.clone(), spec);
                    }
                }
            }
        }

        merged.into_values().collect()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
