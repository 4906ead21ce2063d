//! Options for apply and delete operations

use crate::dry_run::DryRun;

/// Options for applying plain manifest files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyManifestsOptions {
    /// Dry-run mode (`true` converts to a server-side dry-run)
    pub dry_run: DryRun,

    /// Process directories given as paths recursively
    pub recursive: bool,
}

impl ApplyManifestsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dry-run mode
    pub fn with_dry_run(mut self, dry_run: impl Into<DryRun>) -> Self {
        self.dry_run = dry_run.into();
        self
    }

    /// Enable recursive directory processing
    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }
}

/// Options for applying Kustomization directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyKustomizationOptions {
    /// Dry-run mode (`true` converts to a server-side dry-run)
    pub dry_run: DryRun,

    /// Process directories given as paths recursively
    pub recursive: bool,
}

impl ApplyKustomizationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dry-run mode
    pub fn with_dry_run(mut self, dry_run: impl Into<DryRun>) -> Self {
        self.dry_run = dry_run.into();
        self
    }

    /// Enable recursive directory processing
    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }
}

/// Options the apply bridge works with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ApplyOptions {
    pub dry_run: DryRun,
    pub recursive: bool,
    pub is_kustomization: bool,
}

impl From<&ApplyManifestsOptions> for ApplyOptions {
    fn from(opts: &ApplyManifestsOptions) -> Self {
        Self {
            dry_run: opts.dry_run,
            recursive: opts.recursive,
            is_kustomization: false,
        }
    }
}

impl From<&ApplyKustomizationOptions> for ApplyOptions {
    fn from(opts: &ApplyKustomizationOptions) -> Self {
        Self {
            dry_run: opts.dry_run,
            recursive: opts.recursive,
            is_kustomization: true,
        }
    }
}

/// Options the delete bridge works with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DeleteOptions {
    pub is_kustomization: bool,
}

impl DeleteOptions {
    pub(crate) const MANIFESTS: Self = Self {
        is_kustomization: false,
    };

    pub(crate) const KUSTOMIZATION: Self = Self {
        is_kustomization: true,
    };
}
