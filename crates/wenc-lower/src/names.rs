//! Fresh-name generation
//!
//! Lowering mints temporaries when staging intermediate values. The source
//! of candidate names is pluggable so hosts can supply their own scheme;
//! candidates that collide with user bindings are skipped by the lowerer.

/// A stream of candidate binding names.
pub trait NameSource {
    /// The next candidate. May collide with an existing binding; the caller
    /// keeps pulling until it finds a free one.
    fn next_name(&mut self) -> String;
}

/// The ten heavenly stems, the target language's customary temporaries.
const STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

/// Default source: cycles the heavenly stems, doubling them up once a full
/// round is exhausted (甲, 乙, ... 癸, 甲甲, 乙乙, ...).
#[derive(Debug, Default)]
pub struct StemNames {
    next: usize,
}

impl StemNames {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NameSource for StemNames {
    fn next_name(&mut self) -> String {
        let stem = STEMS[self.next % STEMS.len()];
        let reps = self.next / STEMS.len() + 1;
        self.next += 1;
        stem.repeat(reps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stems_cycle_and_grow() {
        let mut names = StemNames::new();
        assert_eq!(names.next_name(), "甲");
        assert_eq!(names.next_name(), "乙");
        for _ in 2..10 {
            names.next_name();
        }
        assert_eq!(names.next_name(), "甲甲");
    }
}
