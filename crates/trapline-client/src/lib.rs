//! Delivery client and host integration surface for trapline.
//!
//! Owns the one outbound HTTP call per captured error and the two hook slots
//! a host wires into its runtime. All capture-and-normalize logic lives in
//! `trapline-core`.

pub mod client;
pub mod hooks;

pub use client::{Client, DeliveryError, DELIVERY_TIMEOUT};
pub use hooks::{HookRegistry, TerminationHook, UncaughtErrorHook};

// Re-export the core surface hosts need to drive the client
pub use trapline_core::{
    Config, ConfigError, ExceptionInfo, RawError, RawFrame, RequestEnv, ScalarError,
};
