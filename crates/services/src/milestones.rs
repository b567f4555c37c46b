use study_core::model::{Milestone, MilestoneId, SubjectId};

use crate::store::MilestoneStore;

/// Completed versus total milestones for one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilestoneCompletion {
    pub completed: usize,
    pub total: usize,
}

impl MilestoneCompletion {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

impl std::fmt::Display for MilestoneCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} Completed", self.completed, self.total)
    }
}

impl MilestoneStore {
    /// Flip `completed` on the milestone with `id`. Returns `false` if absent.
    pub fn toggle(&self, id: &MilestoneId) -> bool {
        self.commit(|items| match items.iter_mut().find(|m| m.id() == id) {
            Some(milestone) => {
                milestone.toggle();
                true
            }
            None => false,
        })
    }

    /// Milestones of one subject, in insertion order.
    #[must_use]
    pub fn for_subject(&self, subject_id: &SubjectId) -> Vec<Milestone> {
        self.with_items(|items| {
            items
                .iter()
                .filter(|m| m.subject_id() == subject_id)
                .cloned()
                .collect()
        })
    }

    #[must_use]
    pub fn completion(&self, subject_id: &SubjectId) -> MilestoneCompletion {
        self.with_items(|items| {
            items
                .iter()
                .filter(|m| m.subject_id() == subject_id)
                .fold(MilestoneCompletion::default(), |mut acc, m| {
                    acc.total += 1;
                    if m.is_completed() {
                        acc.completed += 1;
                    }
                    acc
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::PersistentStore;
    use study_core::time::fixed_now;

    fn milestone(id: &str, subject: &str, completed: bool) -> Milestone {
        Milestone::new(
            MilestoneId::new(id),
            SubjectId::new(subject),
            format!("milestone {id}"),
            fixed_now(),
            completed,
        )
    }

    #[test]
    fn toggle_twice_is_identity() {
        let store = MilestoneStore::new(PersistentStore::in_memory());
        store.add(milestone("m1", "s1", false));
        let id = MilestoneId::new("m1");

        assert!(store.toggle(&id));
        assert!(store.get(&id).unwrap().is_completed());
        assert!(store.toggle(&id));
        assert!(!store.get(&id).unwrap().is_completed());
    }

    #[test]
    fn toggle_missing_is_no_op() {
        let store = MilestoneStore::new(PersistentStore::in_memory());
        store.add(milestone("m1", "s1", false));
        assert!(!store.toggle(&MilestoneId::new("nope")));
        assert!(!store.get(&MilestoneId::new("m1")).unwrap().is_completed());
    }

    #[test]
    fn completion_counts_per_subject() {
        let store = MilestoneStore::new(PersistentStore::in_memory());
        store.add(milestone("m1", "s1", true));
        store.add(milestone("m2", "s1", false));
        store.add(milestone("m3", "s2", true));

        let s1 = store.completion(&SubjectId::new("s1"));
        assert_eq!(s1, MilestoneCompletion { completed: 1, total: 2 });
        assert_eq!(s1.to_string(), "1/2 Completed");
        assert!(store.completion(&SubjectId::new("s2")).is_complete());
        assert!(!store.completion(&SubjectId::new("s3")).is_complete());
        assert_eq!(store.for_subject(&SubjectId::new("s1")).len(), 2);
    }
}
