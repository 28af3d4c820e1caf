//! Request-time policy: text suppression, recovery gating and redirect
//! resolution, wired together through [`Hooks`].

pub mod hooks;
pub mod recovery;
pub mod resolver;
pub mod sanitize;
pub mod text;

pub use self::hooks::{Flow, Hooks, LoginRequest};
pub use self::recovery::{GateOutcome, RecoveryGate, Redirect};
pub use self::resolver::{ContentStore, PostId, Resolver, SiteUrls, TargetType};
