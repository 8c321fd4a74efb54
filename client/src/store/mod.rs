//! Client-side state: the session store and its token persistence.

pub mod session;
pub mod storage;

pub use session::{init_session, session, SessionState, SessionStore, ERROR_DISPLAY_DURATION};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
