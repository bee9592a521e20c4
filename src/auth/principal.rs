//! Suppliers answering "who is acting right now?".

// self
use crate::{_prelude::*, auth::PrincipalId};

/// Reports the principal driving the current request, if one is signed in.
pub trait PrincipalSupplier
where
	Self: Send + Sync,
{
	/// Returns `true` when an authenticated principal is bound to the current context.
	fn is_active(&self) -> bool;

	/// Identifier of the bound principal.
	///
	/// Only consulted after [`is_active`](Self::is_active) returned `true`.
	fn principal_id(&self) -> PrincipalId;

	/// Returns the bound principal, or the reserved `shared` principal when nobody is signed in.
	fn active_principal(&self) -> PrincipalId {
		if self.is_active() { self.principal_id() } else { PrincipalId::shared() }
	}
}

/// Supplier for batch jobs and other contexts that never carry a signed-in user.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnonymousPrincipal;
impl PrincipalSupplier for AnonymousPrincipal {
	fn is_active(&self) -> bool {
		false
	}

	fn principal_id(&self) -> PrincipalId {
		PrincipalId::shared()
	}
}

/// Supplier bound to a request or session whose principal can sign in and out.
///
/// Clones share the same binding, so the host can hand one clone to an asset source and keep
/// another to update when the session changes.
#[derive(Clone, Debug, Default)]
pub struct SessionPrincipal(Arc<RwLock<Option<PrincipalId>>>);
impl SessionPrincipal {
	/// Creates a session that already has a signed-in principal.
	pub fn signed_in(principal: PrincipalId) -> Self {
		Self(Arc::new(RwLock::new(Some(principal))))
	}

	/// Binds `principal` to the session, replacing any previous one.
	pub fn sign_in(&self, principal: PrincipalId) {
		*self.0.write() = Some(principal);
	}

	/// Clears the binding.
	pub fn sign_out(&self) {
		self.0.write().take();
	}
}
impl PrincipalSupplier for SessionPrincipal {
	fn is_active(&self) -> bool {
		self.0.read().is_some()
	}

	fn principal_id(&self) -> PrincipalId {
		self.0.read().clone().unwrap_or_else(PrincipalId::shared)
	}
}
