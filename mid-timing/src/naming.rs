use crate::clock::Clock;

/// Hour, minute, day, month. Kept as-is so existing data folders sort the same way.
pub const STAMP_FORMAT: &str = "%H%M%d%m";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub results: String,
    pub log: String,
}

/// `Subject<ID>_<HHMMDDMM>.csv` plus the matching `.log`.
pub fn output_names<C: Clock>(subject_id: &str, clock: &C) -> OutputNames {
    let stamp = clock.now().format(STAMP_FORMAT);
    let stem = format!("Subject{}_{}", sanitize(subject_id.trim()), stamp);
    OutputNames {
        results: format!("{stem}.csv"),
        log: format!("{stem}.log"),
    }
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn names_follow_subject_and_stamp() {
        let clock = FixedClock::from_parts(2025, 3, 7, 14, 5).unwrap();
        let names = output_names("007", &clock);
        assert_eq!(names.results, "Subject007_14050703.csv");
        assert_eq!(names.log, "Subject007_14050703.log");
    }

    #[test]
    fn same_clock_same_name() {
        let clock = FixedClock::from_parts(2024, 12, 31, 23, 59).unwrap();
        assert_eq!(output_names("a", &clock), output_names("a", &clock));
    }

    #[test]
    fn path_separators_are_replaced() {
        let clock = FixedClock::from_parts(2025, 1, 1, 0, 0).unwrap();
        let names = output_names(" ../x y ", &clock);
        assert_eq!(names.results, "Subject---x-y_00000101.csv");
    }
}
