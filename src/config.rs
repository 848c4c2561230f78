//! Immutable run configuration (design note §9): bundles the process
//! globals the original tool kept as bare statics (`verbose`, `tracing`,
//! `traced_call`, `CUTOFF_LIMIT`, `MAX_PARALLEL`, `TL_LIMIT`, `PC_OUTPUT`,
//! `DISPLAY_BAD_QSOS`) into one value built once in `main` and threaded by
//! `Arc` reference into every pipeline and pruner task.

/// Default `-l` cutoff: a call's surviving count must exceed this to stay.
pub const DEFAULT_CUTOFF_LIMIT: u32 = 1;
/// Default `-p` parallelism.
pub const DEFAULT_PARALLEL: usize = 1;
/// Default `-tl` minimum QSOs for automatic sender inclusion.
pub const DEFAULT_TL_LIMIT: usize = 1;
/// Default `-xpc` retained percentage.
pub const DEFAULT_XPC: u32 = 100;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub verbose: bool,
    pub cutoff_limit: u32,
    pub parallel: usize,
    pub traced_call: Option<String>,
    pub tl_limit: usize,
    pub xscp: bool,
    pub xpc: u32,
    pub display_bad_qsos: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            verbose: false,
            cutoff_limit: DEFAULT_CUTOFF_LIMIT,
            parallel: DEFAULT_PARALLEL,
            traced_call: None,
            tl_limit: DEFAULT_TL_LIMIT,
            xscp: false,
            xpc: DEFAULT_XPC,
            display_bad_qsos: false,
        }
    }
}

impl RunConfig {
    pub fn is_traced(&self, call: &str) -> bool {
        self.traced_call.as_deref() == Some(call)
    }
}
