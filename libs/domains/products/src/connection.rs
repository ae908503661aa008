use async_trait::async_trait;

use crate::repository::ProductRepository;

/// Hands out a store handle for the span of one request.
///
/// `acquire` never fails loudly: an unreachable store is reported as `None`
/// and the caller turns it into a connection error. `release` is infallible
/// and must be called exactly once for every handle `acquire` returned.
#[cfg_attr(test, mockall::automock(type Handle = crate::repository::MockProductRepository;))]
#[async_trait]
pub trait ConnectionManager: Send + Sync + 'static {
    type Handle: ProductRepository + 'static;

    async fn acquire(&self) -> Option<Self::Handle>;

    async fn release(&self, handle: Self::Handle);
}
