use services::{ResultEntry, Statistics};

use super::time_fmt::format_datetime;

/// Label of the personal-best bar pair.
pub const BEST_LABEL: &str = "PB";

/// One pair of correct/wrong bars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultBarsVm {
    pub label: String,
    pub correct: u32,
    pub wrong: u32,
    /// Bar heights in percent of the chart height.
    pub correct_pct: u32,
    pub wrong_pct: u32,
    pub completed_at_str: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsVm {
    /// Most recent first.
    pub recent: Vec<ResultBarsVm>,
    pub best: Option<ResultBarsVm>,
}

impl StatsVm {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty() && self.best.is_none()
    }
}

fn percent(value: u32, scale: u32) -> u32 {
    if scale == 0 {
        return 0;
    }
    let pct = u64::from(value) * 100 / u64::from(scale);
    u32::try_from(pct.min(100)).unwrap_or(100)
}

fn bars(entry: &ResultEntry, label: String, scale: u32) -> ResultBarsVm {
    ResultBarsVm {
        label,
        correct: entry.correct,
        wrong: entry.wrong,
        correct_pct: percent(entry.correct, scale),
        wrong_pct: percent(entry.wrong, scale),
        completed_at_str: format_datetime(entry.completed_at),
    }
}

/// Build chart rows, scaling bar heights against `questions_per_session`.
///
/// Counts above the scale (from a larger catalog in older rows) stretch the
/// scale so no bar overflows.
#[must_use]
pub fn map_statistics(stats: &Statistics, questions_per_session: usize) -> StatsVm {
    let largest = stats
        .recent
        .iter()
        .chain(stats.best.iter())
        .flat_map(|e| [e.correct, e.wrong])
        .max()
        .unwrap_or(0);
    let scale = u32::try_from(questions_per_session)
        .unwrap_or(u32::MAX)
        .max(largest);

    let recent = stats
        .recent
        .iter()
        .enumerate()
        .map(|(idx, entry)| bars(entry, format!("{}", idx + 1), scale))
        .collect();
    let best = stats
        .best
        .as_ref()
        .map(|entry| bars(entry, BEST_LABEL.to_string(), scale));

    StatsVm { recent, best }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::ResultId;
    use quiz_core::time::fixed_now;

    fn entry(id: u64, correct: u32, wrong: u32) -> ResultEntry {
        ResultEntry {
            id: ResultId::new(id),
            correct,
            wrong,
            completed_at: fixed_now(),
        }
    }

    #[test]
    fn bars_scale_against_session_length() {
        let stats = Statistics {
            recent: vec![entry(2, 3, 2), entry(1, 5, 0)],
            best: Some(entry(1, 5, 0)),
        };
        let vm = map_statistics(&stats, 5);

        assert_eq!(vm.recent.len(), 2);
        assert_eq!(vm.recent[0].label, "1");
        assert_eq!((vm.recent[0].correct_pct, vm.recent[0].wrong_pct), (60, 40));
        assert_eq!((vm.recent[1].correct_pct, vm.recent[1].wrong_pct), (100, 0));

        let best = vm.best.unwrap();
        assert_eq!(best.label, BEST_LABEL);
        assert_eq!(best.correct, 5);
        assert_eq!(best.completed_at_str, "2023-11-14 22:13");
    }

    #[test]
    fn oversized_counts_never_exceed_full_height() {
        let stats = Statistics {
            recent: vec![entry(1, 8, 2)],
            best: Some(entry(1, 8, 2)),
        };
        let vm = map_statistics(&stats, 5);
        assert_eq!(vm.recent[0].correct_pct, 100);
        assert_eq!(vm.recent[0].wrong_pct, 25);
    }

    #[test]
    fn empty_statistics_map_to_empty_vm() {
        let stats = Statistics {
            recent: Vec::new(),
            best: None,
        };
        let vm = map_statistics(&stats, 5);
        assert!(vm.is_empty());
    }
}
