//! Session store port - persisted slot for the signed-in session

use crate::domain::result::Result;
use crate::domain::Session;

/// Persisted key-value slot holding at most one session
///
/// Each call reads or replaces the whole slot.
pub trait SessionStore: Send + Sync {
    /// Read the stored session, if any. Unreadable data counts as no session.
    fn load(&self) -> Result<Option<Session>>;

    /// Replace the stored session
    fn save(&self, session: &Session) -> Result<()>;

    /// Remove the stored session
    fn clear(&self) -> Result<()>;
}
