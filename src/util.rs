use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Copy, Clone, Debug)]
pub(crate) enum ErrorCode {
    Write,
    Flush,
    Format,
    Poison,
}
impl ErrorCode {
    fn as_index(self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Flush => "flush",
            Self::Format => "format",
            Self::Poison => "poison",
        }
    }
}

pub(crate) fn eprint_err(error_code: ErrorCode, msg: &str, err: &dyn std::error::Error) {
    eprintln!(
        "[ds_common_logger][ERRCODE::{error_code:?}] {msg}, caused by {err:?}\n    \
         See https://docs.rs/ds_common_logger/latest/ds_common_logger/error_info/index.html#{}",
        error_code.as_index()
    );
}

pub(crate) fn eprint_msg(error_code: ErrorCode, msg: &str) {
    eprintln!(
        "[ds_common_logger][ERRCODE::{error_code:?}] {msg}\n    \
         See https://docs.rs/ds_common_logger/latest/ds_common_logger/error_info/index.html#{}",
        error_code.as_index()
    );
}

// A panic inside a sink or a format function must not disable logging for the
// rest of the process, so poisoned locks are taken over.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| {
        eprint_msg(ErrorCode::Poison, "lock was poisoned, continuing");
        PoisonError::into_inner(e)
    })
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| {
        eprint_msg(ErrorCode::Poison, "lock was poisoned, continuing");
        PoisonError::into_inner(e)
    })
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| {
        eprint_msg(ErrorCode::Poison, "mutex was poisoned, continuing");
        PoisonError::into_inner(e)
    })
}

// Logger and sink names coming from Rust paths use `::`, dotted names are used
// throughout the registry.
pub(crate) fn dotted(path: &str) -> String {
    path.replace("::", ".")
}
