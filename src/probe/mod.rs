pub mod client;

pub use client::{ProbeClient, ProbeError, RawProbeResponse};
