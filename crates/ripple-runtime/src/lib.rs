//! The messaging runtime: the subscription registry (§4.E), the
//! `Provider` transport abstraction plus reference UDP multicast
//! implementation (§4.F), the `Runtime` facade (§4.G), and the
//! generic trampoline generated glue is built on (§4.H).

pub mod provider;
pub mod registry;
pub mod runtime;
pub mod trampoline;

pub use provider::Provider;
pub use registry::{RawHandler, Registry, SubscriptionId};
pub use runtime::Runtime;
