//! Mutation guard: detects modification of arguments that must stay read-only.

use gradebench_core::{Value, equals};

/// Which call arguments must not be modified by the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoMod {
    /// One flag broadcast to every argument.
    All(bool),
    /// One flag per argument position; missing trailing positions are unflagged.
    PerArg(Vec<bool>),
}

impl Default for NoMod {
    fn default() -> Self {
        NoMod::All(false)
    }
}

impl From<bool> for NoMod {
    fn from(flag: bool) -> Self {
        NoMod::All(flag)
    }
}

impl From<Vec<bool>> for NoMod {
    fn from(flags: Vec<bool>) -> Self {
        NoMod::PerArg(flags)
    }
}

impl<const N: usize> From<[bool; N]> for NoMod {
    fn from(flags: [bool; N]) -> Self {
        NoMod::PerArg(flags.to_vec())
    }
}

/// Deep snapshot of the flagged arguments, taken before the candidate runs.
#[derive(Debug)]
pub struct MutationGuard {
    snapshots: Vec<Option<Value>>,
}

impl MutationGuard {
    /// Snapshot every flagged argument.
    ///
    /// ## Errors
    /// A per-argument vector longer than the argument list is rejected; there is no sensible position to
    /// apply the extra flags to.
    pub fn arm(args: &[Value], no_mod: &NoMod) -> Result<Self, String> {
        let flags: Vec<bool> = match no_mod {
            NoMod::All(flag) => vec![*flag; args.len()],
            NoMod::PerArg(flags) if flags.len() > args.len() => {
                return Err(format!(
                    "{} no-mod flags given for {} argument(s)",
                    flags.len(),
                    args.len()
                ));
            }
            NoMod::PerArg(flags) => flags.clone(),
        };
        let snapshots = args
            .iter()
            .enumerate()
            .map(|(i, arg)| flags.get(i).copied().unwrap_or(false).then(|| arg.deep_copy()))
            .collect();
        Ok(Self { snapshots })
    }

    pub fn is_armed(&self) -> bool {
        self.snapshots.iter().any(Option::is_some)
    }

    /// 1-indexed position of the first flagged argument that no longer equals its snapshot.
    pub fn first_violation(&self, args: &[Value]) -> Option<usize> {
        self.snapshots
            .iter()
            .zip(args)
            .position(|(snapshot, arg)| snapshot.as_ref().is_some_and(|before| !equals(before, arg)))
            .map(|i| i + 1)
    }
}

/// English ordinal for a 1-indexed position: `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`, ...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gradebench_core::factory::make_array;

    #[test]
    fn ordinal_suffixes() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (101, "101st"),
            (111, "111th"),
        ];
        for (n, expected) in cases {
            assert_eq!(ordinal(n), expected);
        }
    }

    #[test]
    fn snapshot_is_not_affected_by_later_mutation() {
        let mut args = vec![Value::from(make_array([1, 2])), Value::from(make_array([3]))];
        let guard = MutationGuard::arm(&args, &NoMod::from([false, true])).unwrap();
        assert!(guard.first_violation(&args).is_none());

        args[0].array_mut().unwrap().set(0, 9).unwrap();
        assert!(guard.first_violation(&args).is_none(), "first argument is not flagged");

        args[1].array_mut().unwrap().set(0, 9).unwrap();
        assert_eq!(guard.first_violation(&args), Some(2));
    }

    #[test]
    fn too_many_flags_is_a_configuration_error() {
        let args = vec![Value::Int(1)];
        let err = MutationGuard::arm(&args, &NoMod::from(vec![true, true])).unwrap_err();
        assert_eq!(err, "2 no-mod flags given for 1 argument(s)");
    }

    #[test]
    fn unflagged_guard_takes_no_snapshots() {
        let args = vec![Value::Int(1), Value::Int(2)];
        assert!(!MutationGuard::arm(&args, &NoMod::All(false)).unwrap().is_armed());
        assert!(MutationGuard::arm(&args, &NoMod::All(true)).unwrap().is_armed());
    }
}
