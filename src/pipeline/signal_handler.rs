use anyhow::Result;
use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Raised once the user interrupts the run.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Set up interrupt handlers for SIGINT (Ctrl-C) and SIGTERM.
///
/// The first signal only raises the returned flag; the engine notices it at
/// the next action boundary. A second signal exits immediately with status 1.
/// Collaborators share our process group, so a terminal Ctrl-C reaches the
/// running tool as well.
pub fn setup_interrupt_handlers() -> Result<InterruptFlag> {
    let flag = InterruptFlag::new();

    for sig in [SIGINT, SIGTERM] {
        signal_hook::flag::register_conditional_shutdown(sig, 1, Arc::clone(&flag.0))?;
        signal_hook::flag::register(sig, Arc::clone(&flag.0))?;
    }

    Ok(flag)
}
