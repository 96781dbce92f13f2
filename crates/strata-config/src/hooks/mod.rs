//! Build-lifecycle hook driver
//!
//! Stands in for the host tool's lifecycle: once the main output exists, every
//! plugin's `write_bundle` hook runs in plugin-list order.

use strata_core::error::StrataResult;
use strata_core::types::{BuildConfig, OutputOptions};
use tracing::{debug, error};

/// Run `write_bundle` on every plugin, stopping at the first failure
pub async fn write_bundle(config: &BuildConfig, output: &OutputOptions) -> StrataResult<()> {
    for plugin in &config.plugins {
        debug!("Running write_bundle hook of {}", plugin.name());
        if let Err(err) = plugin.write_bundle(output).await {
            error!("Plugin {} failed: {}", plugin.name(), err);
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use strata_core::error::StrataError;
    use strata_core::types::Plugin;

    #[derive(Debug)]
    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Plugin for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn write_bundle(&self, _output: &OutputOptions) -> StrataResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StrataError::invalid("outDir", "stub failure"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_hooks_run_in_order_until_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut config = BuildConfig::default();
        config.plugins = vec![
            Arc::new(Counting { calls: Arc::clone(&calls), fail: false }),
            Arc::new(Counting { calls: Arc::clone(&calls), fail: true }),
            Arc::new(Counting { calls: Arc::clone(&calls), fail: false }),
        ];

        let result = write_bundle(&config, &OutputOptions::with_dir("dist")).await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_plugin_list() {
        let config = BuildConfig::default();
        assert!(write_bundle(&config, &OutputOptions::default()).await.is_ok());
    }
}
