mod login_vm;
mod play_vm;
mod stats_vm;
mod time_fmt;

pub use login_vm::{LoginIntent, log_in, register};
pub use play_vm::{AnswerFeedback, PlayIntent, PlayOutcome, PlayVm, start_play};
pub use stats_vm::{BEST_LABEL, ResultBarsVm, StatsVm, map_statistics};
pub use time_fmt::format_datetime;
