//! Deferred branch selection
//!
//! A gated node holds two unevaluated branches and evaluates only the one
//! selected by its boolean gate, after the gate value is known. Branches are
//! plain futures: the unselected one is dropped without ever being polled.

use std::future::Future;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::{NodeEngineError, Result};

/// Which side of a gate was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Pass,
    Fail,
}

impl Branch {
    /// Branch selected by a gate value
    pub fn from_gate(gate: bool) -> Self {
        if gate {
            Branch::Pass
        } else {
            Branch::Fail
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Branch::Pass => "pass",
            Branch::Fail => "fail",
        }
    }

    /// Pick the port list belonging to this branch
    pub fn select<'p>(&self, pass: &'p [&'p str], fail: &'p [&'p str]) -> &'p [&'p str] {
        match self {
            Branch::Pass => pass,
            Branch::Fail => fail,
        }
    }
}

/// Two branches awaiting a gate value
pub struct PendingBranches<'a, T> {
    pass: BoxFuture<'a, Result<T>>,
    fail: BoxFuture<'a, Result<T>>,
}

impl<'a, T: Send + 'a> PendingBranches<'a, T> {
    pub fn new<P, F>(pass: P, fail: F) -> Self
    where
        P: Future<Output = Result<T>> + Send + 'a,
        F: Future<Output = Result<T>> + Send + 'a,
    {
        Self {
            pass: Box::pin(pass),
            fail: Box::pin(fail),
        }
    }

    /// Evaluate only the branch selected by `gate`
    pub async fn resolve(self, gate: bool) -> Result<(Branch, T)> {
        let branch = Branch::from_gate(gate);
        let selected = match branch {
            Branch::Pass => self.pass,
            Branch::Fail => self.fail,
        };

        let value = selected
            .await
            .map_err(|e| NodeEngineError::BranchFailed {
                branch: branch.name().to_string(),
                message: e.to_string(),
            })?;

        Ok((branch, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_only_selected_branch_runs() {
        let pass_ran = AtomicBool::new(false);
        let fail_ran = AtomicBool::new(false);

        let pending = PendingBranches::new(
            async {
                pass_ran.store(true, Ordering::SeqCst);
                Ok("pass value")
            },
            async {
                fail_ran.store(true, Ordering::SeqCst);
                Ok("fail value")
            },
        );

        let (branch, value) = pending.resolve(false).await.unwrap();
        assert_eq!(branch, Branch::Fail);
        assert_eq!(value, "fail value");
        assert!(!pass_ran.load(Ordering::SeqCst));
        assert!(fail_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_unselected_failure_is_ignored() {
        let pending = PendingBranches::new(
            async { Ok(1) },
            async { Err(NodeEngineError::MissingInput("never evaluated".to_string())) },
        );

        let (branch, value) = pending.resolve(true).await.unwrap();
        assert_eq!(branch, Branch::Pass);
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn test_selected_failure_names_branch() {
        let pending: PendingBranches<'_, i32> = PendingBranches::new(
            async { Ok(1) },
            async { Err(NodeEngineError::MissingInput("fail_input".to_string())) },
        );

        let err = pending.resolve(false).await.unwrap_err();
        assert!(err.to_string().contains("Branch 'fail' failed"));
    }

    #[test]
    fn test_branch_port_selection() {
        let pass = ["pass_input1", "pass_input2"];
        let fail = ["fail_input1", "fail_input2"];
        assert_eq!(Branch::from_gate(true).select(&pass, &fail), &pass);
        assert_eq!(Branch::from_gate(false).select(&pass, &fail), &fail);
        assert_eq!(Branch::Fail.name(), "fail");
    }
}
