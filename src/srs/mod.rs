pub mod distractors;
pub mod fact_scheduler;
pub mod leveling;
pub mod mastery;
pub mod mode;
pub mod table_selector;

pub use distractors::{choice_count, generate_choices};
pub use fact_scheduler::build_fact_queue;
pub use leveling::{calculate_level, level_progress, xp_award, xp_for_level};
pub use mastery::{record_result, MasteryChange};
pub use mode::{decide_mode, mode_for_session};
pub use table_selector::{build_table_queue, eligible_pool_size};
