//! Public apply/delete entry points
//!
//! [`Kubectl`] pairs a command engine with its configuration. The free
//! functions at the bottom of this module use a default client backed by the
//! `kubectl` binary on `PATH`.

use std::path::Path;
use std::sync::Arc;

use crate::bridge::{apply_func, delete_func, path_strings};
use crate::config::KubectlConfig;
use crate::context::Context;
use crate::engine::{CommandEngine, KubectlEngine};
use crate::error::Result;
use crate::options::{ApplyKustomizationOptions, ApplyManifestsOptions, ApplyOptions, DeleteOptions};

/// Client for applying and deleting manifests with kubectl semantics
///
/// Calls of the same kind are serialized process-wide, across all clients:
/// at most one apply and one delete run at any time.
pub struct Kubectl<E: CommandEngine = KubectlEngine> {
    engine: Arc<E>,
    config: KubectlConfig,
}

impl Kubectl<KubectlEngine> {
    /// Client using the kubectl binary named in `config`
    pub fn new(config: KubectlConfig) -> Self {
        let engine = KubectlEngine::new(config.binary.clone());
        Self::with_engine(engine, config)
    }
}

impl Default for Kubectl<KubectlEngine> {
    fn default() -> Self {
        Self::new(KubectlConfig::default())
    }
}

impl<E: CommandEngine> Kubectl<E> {
    /// Client using a custom engine
    pub fn with_engine(engine: E, config: KubectlConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            config,
        }
    }

    /// Get the command engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Get the configuration
    pub fn config(&self) -> &KubectlConfig {
        &self.config
    }

    /// Apply manifest files, like `kubectl apply -f`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use kubeapply_kubectl::{ApplyManifestsOptions, Context, Kubectl};
    ///
    /// # async fn run() -> kubeapply_kubectl::Result<()> {
    /// let ctx = Context::with_timeout(Duration::from_secs(10));
    /// let kubectl: Kubectl = Kubectl::default();
    /// kubectl
    ///     .apply_manifests(
    ///         &ctx,
    ///         "/path/to/kubeconfig",
    ///         &ApplyManifestsOptions::new(),
    ///         &["/path/to/manifest1.yaml", "/path/to/manifest2.yaml"],
    ///     )
    ///     .await
    /// # }
    /// ```
    pub async fn apply_manifests<P: AsRef<Path>>(
        &self,
        ctx: &Context,
        kubeconfig_path: &str,
        opts: &ApplyManifestsOptions,
        paths: &[P],
    ) -> Result<()> {
        let opts = ApplyOptions::from(opts);
        apply_func(
            &self.engine,
            self.config.default_timeout,
            ctx,
            kubeconfig_path,
            Some(&opts),
            &path_strings(paths),
        )
        .await
    }

    /// Apply Kustomization directories, like `kubectl apply -k`
    pub async fn apply_kustomization<P: AsRef<Path>>(
        &self,
        ctx: &Context,
        kubeconfig_path: &str,
        opts: &ApplyKustomizationOptions,
        paths: &[P],
    ) -> Result<()> {
        let opts = ApplyOptions::from(opts);
        apply_func(
            &self.engine,
            self.config.default_timeout,
            ctx,
            kubeconfig_path,
            Some(&opts),
            &path_strings(paths),
        )
        .await
    }

    /// Delete the resources in manifest files, like `kubectl delete -f`
    pub async fn delete_manifests<P: AsRef<Path>>(
        &self,
        ctx: &Context,
        kubeconfig_path: &str,
        paths: &[P],
    ) -> Result<()> {
        delete_func(
            &self.engine,
            self.config.default_timeout,
            ctx,
            kubeconfig_path,
            Some(&DeleteOptions::MANIFESTS),
            &path_strings(paths),
        )
        .await
    }

    /// Delete the resources a Kustomization renders, like `kubectl delete -k`
    pub async fn delete_kustomization<P: AsRef<Path>>(
        &self,
        ctx: &Context,
        kubeconfig_path: &str,
        paths: &[P],
    ) -> Result<()> {
        delete_func(
            &self.engine,
            self.config.default_timeout,
            ctx,
            kubeconfig_path,
            Some(&DeleteOptions::KUSTOMIZATION),
            &path_strings(paths),
        )
        .await
    }
}

// ========== Default client ==========

/// [`Kubectl::apply_manifests`] with the default client
pub async fn apply_manifests<P: AsRef<Path>>(
    ctx: &Context,
    kubeconfig_path: &str,
    opts: &ApplyManifestsOptions,
    paths: &[P],
) -> Result<()> {
    Kubectl::<KubectlEngine>::default()
        .apply_manifests(ctx, kubeconfig_path, opts, paths)
        .await
}

/// [`Kubectl::apply_kustomization`] with the default client
pub async fn apply_kustomization<P: AsRef<Path>>(
    ctx: &Context,
    kubeconfig_path: &str,
    opts: &ApplyKustomizationOptions,
    paths: &[P],
) -> Result<()> {
    Kubectl::<KubectlEngine>::default()
        .apply_kustomization(ctx, kubeconfig_path, opts, paths)
        .await
}

/// [`Kubectl::delete_manifests`] with the default client
pub async fn delete_manifests<P: AsRef<Path>>(
    ctx: &Context,
    kubeconfig_path: &str,
    paths: &[P],
) -> Result<()> {
    Kubectl::<KubectlEngine>::default()
        .delete_manifests(ctx, kubeconfig_path, paths)
        .await
}

/// [`Kubectl::delete_kustomization`] with the default client
pub async fn delete_kustomization<P: AsRef<Path>>(
    ctx: &Context,
    kubeconfig_path: &str,
    paths: &[P],
) -> Result<()> {
    Kubectl::<KubectlEngine>::default()
        .delete_kustomization(ctx, kubeconfig_path, paths)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dry_run::DryRun;
    use crate::engine::{MockEngine, Verb};
    use crate::error::KubectlError;
    use crate::test_support::SERIAL;
    use std::time::Duration;

    fn mock_client() -> Kubectl<MockEngine> {
        Kubectl::with_engine(MockEngine::new(), KubectlConfig::default())
    }

    fn ctx() -> Context {
        Context::with_timeout(Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_apply_manifests_uses_filename() {
        let _serial = SERIAL.lock().await;
        let kubectl = mock_client();

        kubectl
            .apply_manifests(
                &ctx(),
                "/tmp/kubeconfig",
                &ApplyManifestsOptions::new().with_dry_run(true),
                &["ns.yaml"],
            )
            .await
            .unwrap();

        let invocation = kubectl.engine().last_invocation().unwrap();
        assert_eq!(invocation.flags().get("filename"), Some("ns.yaml"));
        assert_eq!(invocation.flags().get("dry-run"), Some("server"));
    }

    #[tokio::test]
    async fn test_apply_kustomization_uses_kustomize() {
        let _serial = SERIAL.lock().await;
        let kubectl = mock_client();

        kubectl
            .apply_kustomization(
                &ctx(),
                "/tmp/kubeconfig",
                &ApplyKustomizationOptions::new().with_dry_run(DryRun::None),
                &[Path::new("/tmp/overlay")],
            )
            .await
            .unwrap();

        let invocation = kubectl.engine().last_invocation().unwrap();
        assert_eq!(invocation.flags().get("kustomize"), Some("/tmp/overlay"));
        assert!(!invocation.flags().contains("dry-run"));
    }

    #[tokio::test]
    async fn test_delete_variants() {
        let _serial = SERIAL.lock().await;
        let kubectl = mock_client();

        kubectl
            .delete_manifests(&ctx(), "/tmp/kubeconfig", &["a.yaml", "b.yaml"])
            .await
            .unwrap();
        kubectl
            .delete_kustomization(&ctx(), "/tmp/kubeconfig", &["/tmp/overlay"])
            .await
            .unwrap();

        let invocations = kubectl.engine().invocations();
        assert_eq!(invocations[0].verb(), Verb::Delete);
        assert_eq!(invocations[0].flags().get("filename"), Some("a.yaml,b.yaml"));
        assert_eq!(invocations[1].flags().get("kustomize"), Some("/tmp/overlay"));
    }

    #[tokio::test]
    async fn test_public_api_keeps_bridge_validation() {
        let kubectl = mock_client();
        let empty: [&str; 0] = [];

        let err = kubectl
            .delete_manifests(&ctx(), "/tmp/kubeconfig", &empty)
            .await
            .unwrap_err();
        assert!(matches!(err, KubectlError::NoFiles { verb: Verb::Delete }));

        let err = kubectl
            .apply_kustomization(
                &ctx(),
                "",
                &ApplyKustomizationOptions::default(),
                &["/tmp/overlay"],
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_default_client_uses_kubectl_on_path() {
        let kubectl: Kubectl = Kubectl::default();
        assert_eq!(kubectl.engine().binary(), Path::new("kubectl"));
        assert_eq!(kubectl.config().default_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_client_binary_follows_config() {
        let kubectl: Kubectl = Kubectl::new(KubectlConfig::default().with_binary("/opt/kubectl"));
        assert_eq!(kubectl.engine().binary(), Path::new("/opt/kubectl"));
    }
}
