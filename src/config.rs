// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the `Draft`.

/// The placement quantum components are aligned to.
pub const DEFAULT_GRID_SIZE: i64 = 32;

/// Configuration options for the `Draft`.
#[derive(Clone, Debug)]
pub struct TopologyConfig {
    /// Spacing between the intermediate connection points that are
    /// synthesized for stretchable components.
    pub grid_size: i64,

    /// Whether the edges created by the cross-rack resolver during a
    /// top-level composition carry the cross-rack marker.  The marker is
    /// informational and never changes connectivity.
    pub mark_cross_rack: bool,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            mark_cross_rack: true,
        }
    }
}
