//! Client-side "save as": pick the download primitive a host actually
//! supports and drive it with correct object-URL and popup lifecycles.

pub mod config;
pub mod logging;

pub mod blob;
pub mod bom;
pub mod capabilities;
pub mod data_url;
mod executor;
mod fetch;
pub mod host;
mod lease;
pub mod origin;
pub mod popup;
pub mod registry;
pub mod saver;
pub mod strategy;
mod tasks;
pub mod transport;

pub use blob::{Blob, OptionsArg, SaveContent, SaveOptions, SaveRequest};
pub use capabilities::{Capabilities, HostProber, Prober};
pub use config::SaverConfig;
pub use host::{Anchor, Host, HostError, PopupId};
pub use popup::{PopupHandle, PopupSlot, PopupState};
pub use registry::Registry;
pub use saver::{Saver, SaverBuilder};
pub use strategy::Strategy;
pub use transport::{FetchedBody, Transport, TransportError};
