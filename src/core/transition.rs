//! Allowed transitions between screen states.

use super::guard::Guard;
use super::state::ScreenState;

/// What the transition table can see of the active card session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionView {
    pub present: bool,
    pub unlocked: bool,
    pub type_selected: bool,
}

/// Reasons a requested transition is not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("No transition from '{from}' to '{to}'")]
    NotAllowed { from: ScreenState, to: ScreenState },

    #[error("Guard '{guard}' blocked transition from '{from}' to '{to}'")]
    GuardBlocked {
        from: ScreenState,
        to: ScreenState,
        guard: &'static str,
    },
}

/// A single allowed edge, optionally guarded.
#[derive(Debug)]
pub struct TransitionRule {
    pub from: ScreenState,
    pub to: ScreenState,
    pub guard: Option<Guard<SessionView>>,
}

impl TransitionRule {
    pub fn new(from: ScreenState, to: ScreenState) -> Self {
        Self {
            from,
            to,
            guard: None,
        }
    }

    pub fn when(mut self, guard: Guard<SessionView>) -> Self {
        self.guard = Some(guard);
        self
    }

    fn matches(&self, from: ScreenState, to: ScreenState) -> bool {
        self.from == from && self.to == to
    }
}

/// The set of edges the terminal accepts.
///
/// ```text
/// IDLE               -> ENTER_PIN
/// ENTER_PIN          -> SELECT_ACCOUNT | IDLE
/// SELECT_ACCOUNT     -> ACCOUNT_MANAGEMENT | IDLE
/// ACCOUNT_MANAGEMENT -> IDLE
/// ```
#[derive(Debug)]
pub struct TransitionTable {
    rules: Vec<TransitionRule>,
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TransitionTable {
    /// Table with no rules; every request is rejected.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The terminal flow with its access-state guards.
    pub fn standard() -> Self {
        use ScreenState::*;

        Self::empty()
            .rule(
                TransitionRule::new(Idle, EnterPin)
                    .when(Guard::labelled("session present", |v: &SessionView| {
                        v.present
                    })),
            )
            .rule(
                TransitionRule::new(EnterPin, SelectAccount)
                    .when(Guard::labelled("session unlocked", |v: &SessionView| {
                        v.present && v.unlocked
                    })),
            )
            .rule(TransitionRule::new(EnterPin, Idle))
            .rule(
                TransitionRule::new(SelectAccount, AccountManagement).when(Guard::labelled(
                    "account type selected",
                    |v: &SessionView| v.present && v.type_selected,
                )),
            )
            .rule(TransitionRule::new(SelectAccount, Idle))
            .rule(TransitionRule::new(AccountManagement, Idle))
    }

    pub fn rule(mut self, rule: TransitionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Whether an edge exists, ignoring guards.
    pub fn allows(&self, from: ScreenState, to: ScreenState) -> bool {
        self.rules.iter().any(|r| r.matches(from, to))
    }

    /// Targets reachable from `from`, ignoring guards.
    pub fn targets(&self, from: ScreenState) -> Vec<ScreenState> {
        self.rules
            .iter()
            .filter(|r| r.from == from)
            .map(|r| r.to)
            .collect()
    }

    /// Validate a request against the table and the edge's guard (pure).
    pub fn check(
        &self,
        from: ScreenState,
        to: ScreenState,
        view: &SessionView,
    ) -> Result<(), TransitionError> {
        let rule = self
            .rules
            .iter()
            .find(|r| r.matches(from, to))
            .ok_or(TransitionError::NotAllowed { from, to })?;

        match &rule.guard {
            Some(guard) if !guard.check(view) => Err(TransitionError::GuardBlocked {
                from,
                to,
                guard: guard.label(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ScreenState::*;

    fn full_view() -> SessionView {
        SessionView {
            present: true,
            unlocked: true,
            type_selected: true,
        }
    }

    #[test]
    fn standard_table_matches_flow() {
        let table = TransitionTable::standard();

        assert_eq!(table.targets(Idle), vec![EnterPin]);
        assert_eq!(table.targets(EnterPin), vec![SelectAccount, Idle]);
        assert_eq!(table.targets(SelectAccount), vec![AccountManagement, Idle]);
        assert_eq!(table.targets(AccountManagement), vec![Idle]);
    }

    #[test]
    fn missing_edges_are_not_allowed() {
        let table = TransitionTable::standard();

        assert_eq!(
            table.check(Idle, Idle, &full_view()),
            Err(TransitionError::NotAllowed { from: Idle, to: Idle })
        );
        assert!(table.check(Idle, AccountManagement, &full_view()).is_err());
        assert!(table.check(AccountManagement, EnterPin, &full_view()).is_err());
        assert!(table.check(EnterPin, AccountManagement, &full_view()).is_err());
    }

    #[test]
    fn guards_check_session_access_state() {
        let table = TransitionTable::standard();
        let locked = SessionView {
            present: true,
            unlocked: false,
            type_selected: false,
        };

        assert!(table.check(Idle, EnterPin, &locked).is_ok());
        assert!(matches!(
            table.check(EnterPin, SelectAccount, &locked),
            Err(TransitionError::GuardBlocked {
                guard: "session unlocked",
                ..
            })
        ));
        assert!(matches!(
            table.check(Idle, EnterPin, &SessionView::default()),
            Err(TransitionError::GuardBlocked { .. })
        ));
    }

    #[test]
    fn returning_to_idle_is_never_guarded() {
        let table = TransitionTable::standard();

        for from in [EnterPin, SelectAccount, AccountManagement] {
            assert!(table.check(from, Idle, &SessionView::default()).is_ok());
        }
    }

    #[test]
    fn empty_table_rejects_everything() {
        let table = TransitionTable::empty();

        for from in ScreenState::ALL {
            for to in ScreenState::ALL {
                assert!(!table.allows(from, to));
            }
        }
    }
}
