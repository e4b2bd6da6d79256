//! Best-effort direct notification delivery.
//!
//! `notify` returns a plain boolean: `true` means the platform accepted the
//! message, `false` means delivery failed for any reason (blocked DMs,
//! invalid id, platform outage). Callers consume the result for logging
//! only and must never fail an operation because of a `false`.

mod null;
mod platform;
mod traits;

pub use null::NullNotifier;
pub use platform::PlatformNotifier;
pub use traits::Notifier;
