// gwrotate-core: Gateway rotation pipeline between gwrotate-api and the CLI.

pub mod config;
pub mod convert;
pub mod device;
pub mod error;
pub mod firewall;
pub mod gateway;
pub mod lock;
pub mod model;
pub mod notify;
pub mod rotation;
pub mod routeros;
pub mod topology;
pub mod validate;
pub mod wifi;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    NotifyTargets, RawRotationConfig, RotationConfig, RouterConfig, Subnet, TlsVerification,
    WirelessPackage,
};
pub use device::DeviceApi;
pub use error::{CoreError, TopologyStep};
pub use firewall::{FirewallOutcome, RuleChange};
pub use gateway::{GatewayState, OctetSource, RandomOctets};
pub use lock::RunLock;
pub use notify::{Notification, Notifier};
pub use rotation::{RotationPlan, RotationReport, Rotator};
pub use topology::NetworkTopology;
pub use validate::ValidationErrors;
pub use wifi::{AcceptedEntry, ClientPermissionSnapshot, RestoreOutcome, RestoreReport};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AccessAction, AccessEntry, AddressObject, DhcpNetwork, FilterRule, NewBlockRule, Protocol,
    Registration,
};
