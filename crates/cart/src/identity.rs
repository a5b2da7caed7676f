//! Identity Resolver contract.
//!
//! The engine never reads ambient identity: every cart operation takes an
//! explicit [`CartOwner`]. This trait is how a transport layer produces that
//! owner from its session machinery before calling in. During a login
//! transition the transport holds both identities at once; it runs
//! [`MergeCoordinator::merge_on_authentication`](crate::MergeCoordinator::merge_on_authentication)
//! exactly once per login event, then resolves `Account(..)` from here on.

use async_trait::async_trait;

use quince_core::CartOwner;

/// Source of the caller's current identity.
///
/// Credentials are issued and validated elsewhere; implementations only
/// report the already-resolved owner.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// The identity cart/wishlist operations should run under.
    async fn current_owner(&self) -> CartOwner;
}

/// A fixed identity, for tests and single-tenant embeddings.
#[derive(Debug, Clone, Copy)]
pub struct StaticIdentity(pub CartOwner);

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn current_owner(&self) -> CartOwner {
        self.0
    }
}
