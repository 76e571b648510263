//! Catching panics without the panic hook's report.
//!
//! The failure path writes exactly one line to stderr, so a panic the reporter
//! catches must not also be printed by the process panic hook. A wrapping hook
//! is installed once; it skips the previous hook while the panicking thread is
//! inside [`catch_quietly`] and forwards to it otherwise.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::thread;

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
}

static INSTALL_HOOK: Once = Once::new();

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !SILENCED.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// `catch_unwind` that keeps a panic raised by `f` off stderr.
pub(crate) fn catch_quietly<R>(f: impl FnOnce() -> R) -> thread::Result<R> {
    install_hook();
    let was_silenced = SILENCED.with(|silenced| silenced.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    SILENCED.with(|silenced| silenced.set(was_silenced));
    result
}
