//! Fatal pipeline errors.

use thiserror::Error;

/// Conditions that abort a run.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("could not fetch a feed containing items after {attempts} attempts")]
    Fetch { attempts: u32 },

    #[error("malformed feed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("feed has no root element")]
    MissingRoot,

    #[error("feed has no <channel> element")]
    MissingChannel,
}
