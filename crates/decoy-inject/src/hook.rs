//! Resolution hooks
//!
//! Provides [`ResolveHook`], the seam through which a container lets its
//! owner redirect a resolution before anything is constructed. Hooks belong
//! to one container instance; there is no process-wide hook slot.

use crate::error::ResolutionError;
use crate::injector::Injector;
use decoy_object::TypeKey;

/// One resolution request as seen by hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    /// Key being resolved
    pub key: TypeKey,
    /// Keys currently being resolved, outermost first
    pub path: Vec<TypeKey>,
}

impl ResolveRequest {
    /// Nesting depth (0 for the key the caller asked for)
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Key that asked for this one, if any
    #[inline]
    #[must_use]
    pub fn requested_by(&self) -> Option<&TypeKey> {
        self.path.last()
    }
}

/// Called once per resolution request, before the container consults its
/// registrations
///
/// A hook may re-register the requested key (for example with a factory)
/// and the container will honor that registration for this very request.
#[cfg_attr(test, mockall::automock)]
pub trait ResolveHook: Send + Sync {
    /// Inspect or redirect a request
    ///
    /// # Errors
    /// Returning an error aborts the resolution with that error.
    fn before_resolve(
        &self,
        injector: &Injector,
        request: &ResolveRequest,
    ) -> Result<(), ResolutionError>;
}

impl<F> ResolveHook for F
where
    F: Fn(&Injector, &ResolveRequest) -> Result<(), ResolutionError> + Send + Sync,
{
    fn before_resolve(
        &self,
        injector: &Injector,
        request: &ResolveRequest,
    ) -> Result<(), ResolutionError> {
        self(injector, request)
    }
}
