pub mod bust_cache;
pub mod deploy;
pub mod project;
pub mod status;
pub mod watch;

/// Process exit status for a command that completed without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// Another process holds the deployment lock
    Contended,
}

/// `EX_TEMPFAIL` from sysexits.h
pub const EXIT_CONTENDED: u8 = 75;

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Exit::Success => 0,
            Exit::Contended => EXIT_CONTENDED,
        }
    }
}
