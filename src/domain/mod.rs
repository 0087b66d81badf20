pub mod fact;
pub mod history;
pub mod question;
pub mod table;

pub use fact::{all_facts, fact_id, Fact, FactProgress, MAX_BOX};
pub use history::{fold_session, HistoryEntry, SessionTally};
pub use question::{InteractionMode, ItemRef, ModePolicy, QueueItem, SessionMode, Track};
pub use table::{TableProgress, TableStats, MULTIPLIERS, TABLES};
