// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted invoker for tests.

use crate::wp::{InvokeError, Invoker};
use async_trait::async_trait;
use parking_lot::Mutex;

enum Reply {
    Output(String),
    Failure { code: i32, output: String },
}

struct Rule {
    token: String,
    reply: Reply,
}

/// Fake invoker that records every argument vector and answers from
/// scripted rules.
///
/// A rule matches when its token equals one of the call's arguments
/// (e.g. `"get-info"`, `"list-due-batch"`, `"run"`). Unmatched calls fail,
/// so a test that forgets to script a reply surfaces immediately.
#[derive(Default)]
pub struct FakeWp {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeWp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful reply for calls containing `token`.
    pub fn respond(&self, token: &str, output: &str) {
        self.rules.lock().push(Rule {
            token: token.to_string(),
            reply: Reply::Output(output.to_string()),
        });
    }

    /// Script a non-zero exit for calls containing `token`.
    pub fn fail(&self, token: &str, code: i32, output: &str) {
        self.rules.lock().push(Rule {
            token: token.to_string(),
            reply: Reply::Failure {
                code,
                output: output.to_string(),
            },
        });
    }

    /// Every argument vector seen so far, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    /// Calls whose arguments include `token`.
    pub fn calls_matching(&self, token: &str) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .iter()
            .filter(|args| args.iter().any(|a| a == token))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Invoker for FakeWp {
    async fn invoke(&self, args: &[String]) -> Result<String, InvokeError> {
        self.calls.lock().push(args.to_vec());

        let rules = self.rules.lock();
        for rule in rules.iter() {
            if args.iter().any(|a| a == &rule.token) {
                return match &rule.reply {
                    Reply::Output(output) => Ok(output.clone()),
                    Reply::Failure { code, output } => Err(InvokeError::CommandFailed {
                        code: *code,
                        output: output.clone(),
                    }),
                };
            }
        }

        Err(InvokeError::CommandFailed {
            code: 1,
            output: format!("no scripted response for {args:?}"),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
