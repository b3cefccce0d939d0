//! Gating conditions for hook invocation

use std::{fmt, sync::Arc};

use serde_json::Value;

type Predicate = Arc<dyn Fn(&[Value]) -> bool + Send + Sync>;

/// A check run before a mediated callback is invoked
///
/// Every hook starts with [`Condition::IterationLimit`]; predicates added with
/// [`Hook::only_if`](crate::Hook::only_if) follow in the order they were added.
/// The first condition that evaluates to `false` gates the invocation.
#[derive(Clone)]
pub enum Condition {
    /// Passes while the hook has not reached its iteration bound
    IterationLimit,

    /// A user predicate over the full argument list
    Predicate(Predicate),
}

impl Condition {
    /// Wrap a predicate closure
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        Condition::Predicate(Arc::new(f))
    }

    /// Evaluate the condition
    ///
    /// `within_limit` is the current state of the iteration bound; it answers
    /// [`Condition::IterationLimit`].
    pub fn evaluate(&self, args: &[Value], within_limit: bool) -> bool {
        match self {
            Condition::IterationLimit => within_limit,
            Condition::Predicate(predicate) => predicate(args),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::IterationLimit => write!(f, "IterationLimit"),
            Condition::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// Index of the first condition that fails, if any
pub(crate) fn first_failing(
    conditions: &[Condition],
    args: &[Value],
    within_limit: bool,
) -> Option<usize> {
    conditions
        .iter()
        .position(|condition| !condition.evaluate(args, within_limit))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    #[test]
    fn test_iteration_limit_follows_state() {
        assert!(Condition::IterationLimit.evaluate(&[], true));
        assert!(!Condition::IterationLimit.evaluate(&[], false));
    }

    #[test]
    fn test_predicate_sees_arguments() {
        let condition = Condition::predicate(|args| args.first() == Some(&json!("publish")));

        assert!(condition.evaluate(&[json!("publish")], true));
        assert!(!condition.evaluate(&[json!("draft")], true));
    }

    #[test]
    fn test_first_failing_short_circuits() {
        let evaluated = Arc::new(AtomicUsize::new(0));
        let counter = evaluated.clone();

        let conditions = vec![
            Condition::IterationLimit,
            Condition::predicate(|_| false),
            Condition::predicate(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ];

        assert_eq!(first_failing(&conditions, &[], true), Some(1));
        assert_eq!(evaluated.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_first_failing_none_when_all_pass() {
        let conditions = vec![Condition::IterationLimit, Condition::predicate(|_| true)];
        assert_eq!(first_failing(&conditions, &[], true), None);
    }

    #[test]
    fn test_iteration_limit_failure_skips_predicates() {
        let conditions = vec![
            Condition::IterationLimit,
            Condition::predicate(|_| panic!("should not be evaluated")),
        ];
        assert_eq!(first_failing(&conditions, &[], false), Some(0));
    }
}
