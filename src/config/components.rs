//! Built-in component table
//!
//! Order matters: each entry installs into the shared prefix before the next
//! one is configured.

/// A statically defined component
#[derive(Debug, Clone, Copy)]
pub struct ComponentEntry {
    /// Component name, also its source directory name
    pub name: &'static str,
    /// Git repository URL
    pub repo: &'static str,
    /// Generator options as (key, value) pairs
    pub options: &'static [(&'static str, &'static str)],
    /// Components that must be installed first
    pub depends_on: &'static [&'static str],
}

/// The iowarp native stack, in build order
pub const IOWARP_COMPONENTS: &[ComponentEntry] = &[
    ComponentEntry {
        name: "context-transport-primitives",
        repo: "https://github.com/iowarp/context-transport-primitives",
        options: &[
            ("HSHM_ENABLE_CUDA", "OFF"),
            ("HSHM_ENABLE_ROCM", "OFF"),
            ("HSHM_ENABLE_MPI", "OFF"),
            ("HSHM_ENABLE_ZMQ", "OFF"),
        ],
        depends_on: &[],
    },
    ComponentEntry {
        name: "runtime",
        repo: "https://github.com/iowarp/runtime",
        options: &[],
        depends_on: &["context-transport-primitives"],
    },
    ComponentEntry {
        name: "context-transfer-engine",
        repo: "https://github.com/iowarp/context-transfer-engine",
        options: &[],
        depends_on: &["runtime"],
    },
    ComponentEntry {
        name: "context-assimilation-engine",
        repo: "https://github.com/iowarp/context-assimilation-engine",
        options: &[],
        depends_on: &["context-transfer-engine"],
    },
];
