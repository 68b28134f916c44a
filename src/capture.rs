// Multi-line interactive input with cooperative cancellation

use std::io::{ErrorKind, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the SIGTSTP handler; cleared each time a suspend token is armed.
static SUSPEND_FLAG: AtomicBool = AtomicBool::new(false);

enum Flag {
    Local(Arc<AtomicBool>),
    Suspend,
}

/// Cancellation handle observed by [`capture_text`].
///
/// A capture session polls its token after every character, so cancellation
/// lands on a character boundary and never tears the buffer. Local tokens
/// are for tests and programmatic use; suspend tokens are flipped by the
/// process-wide Ctrl+Z handler and reset on every arm.
pub struct CancelToken {
    flag: Flag,
}

impl CancelToken {
    /// A token backed by its own flag, cancelled only via [`cancel`].
    ///
    /// [`cancel`]: CancelToken::cancel
    pub fn new() -> Self {
        Self {
            flag: Flag::Local(Arc::new(AtomicBool::new(false))),
        }
    }

    /// A token cancelled by SIGTSTP (Ctrl+Z in a Unix terminal).
    ///
    /// Installs the signal handler on first use and clears any suspend
    /// request left over from a previous capture session.
    pub fn for_suspend_signal() -> Self {
        install_suspend_handler();
        SUSPEND_FLAG.store(false, Ordering::Relaxed);
        Self { flag: Flag::Suspend }
    }

    pub fn cancel(&self) {
        match &self.flag {
            Flag::Local(flag) => flag.store(true, Ordering::Relaxed),
            Flag::Suspend => SUSPEND_FLAG.store(true, Ordering::Relaxed),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match &self.flag {
            Flag::Local(flag) => flag.load(Ordering::Relaxed),
            Flag::Suspend => SUSPEND_FLAG.load(Ordering::Relaxed),
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CancelToken {
    fn clone(&self) -> Self {
        match &self.flag {
            Flag::Local(flag) => Self {
                flag: Flag::Local(Arc::clone(flag)),
            },
            Flag::Suspend => Self { flag: Flag::Suspend },
        }
    }
}

#[cfg(unix)]
fn install_suspend_handler() {
    use std::sync::Once;

    static INSTALL: Once = Once::new();

    extern "C" fn handle_sigtstp(_sig: libc::c_int) {
        SUSPEND_FLAG.store(true, Ordering::Relaxed);
    }

    INSTALL.call_once(|| unsafe {
        libc::signal(libc::SIGTSTP, handle_sigtstp as libc::sighandler_t);
    });
}

// Without SIGTSTP the console's end-of-file chord ends a capture instead.
#[cfg(not(unix))]
fn install_suspend_handler() {}

/// Read a multi-line block one character at a time until end-of-input or
/// cancellation, whichever comes first.
///
/// A single trailing newline is stripped so Enter-then-cancel yields a
/// clean string. Zero characters captured yields the empty string; there
/// is no error path, the worst case is a truncated capture.
pub fn capture_text<R: Read>(reader: R, token: &CancelToken) -> String {
    let mut buf: Vec<u8> = Vec::with_capacity(16);
    let mut bytes = reader.bytes();

    loop {
        if token.is_cancelled() {
            break;
        }

        match bytes.next() {
            None => break,
            Some(Ok(byte)) => buf.push(byte),
            // The suspend signal interrupts a blocked read; re-poll the token.
            Some(Err(e)) if e.kind() == ErrorKind::Interrupted => continue,
            Some(Err(_)) => break,
        }
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
