// src/strategy/human.rs

use crate::model::state::RoleState;
use crate::strategy::traits::OrderPolicy;
use log::warn;
use std::fmt;
use std::io::BufRead;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// External decision source. Receives a snapshot copy, returns an order.
pub type PromptFn = Arc<dyn Fn(RoleState) -> i64 + Send + Sync>;

/// Delegates one role's decisions to an external actor under a bounded
/// wait. The prompt runs on its own thread; if no answer arrives within
/// `timeout` the configured fallback is substituted, so batch runs never
/// stall on an absent human.
pub struct HumanInTheLoop {
    prompt: PromptFn,
    timeout: Duration,
    fallback: i64,
}

impl HumanInTheLoop {
    pub fn new(prompt: PromptFn, timeout: Duration, fallback: i64) -> Self {
        Self {
            prompt,
            timeout,
            fallback,
        }
    }

    /// Interactive variant reading one line from stdin per decision.
    /// Unparseable input counts as no answer.
    pub fn console(timeout: Duration, fallback: i64) -> Self {
        let prompt: PromptFn = Arc::new(|state: RoleState| {
            println!(
                "period {} [{}] inventory {} backlog {} incoming {} — enter order:",
                state.period_index,
                state.role,
                state.inventory_on_hand,
                state.backlog,
                state.incoming_order
            );
            let mut line = String::new();
            match std::io::stdin().lock().read_line(&mut line) {
                Ok(_) => line.trim().parse::<i64>().unwrap_or(0),
                Err(_) => 0,
            }
        });
        Self::new(prompt, timeout, fallback)
    }
}

impl fmt::Debug for HumanInTheLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HumanInTheLoop")
            .field("timeout", &self.timeout)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl OrderPolicy for HumanInTheLoop {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let (tx, rx) = mpsc::channel();
        let prompt = Arc::clone(&self.prompt);
        let snapshot = state.clone();
        // The prompt may never return; the thread is detached and the
        // engine moves on with the fallback.
        thread::spawn(move || {
            let _ = tx.send(prompt(snapshot));
        });

        match rx.recv_timeout(self.timeout) {
            Ok(order) => order,
            Err(_) => {
                warn!(
                    "period {} {}: no answer within {:?}, using fallback {}",
                    state.period_index, state.role, self.timeout, self.fallback
                );
                self.fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::state::Role;

    fn state() -> RoleState {
        RoleState {
            period_index: 0,
            role: Role::Retailer,
            incoming_order: 4,
            received_shipment: 0,
            inventory_on_hand: 12,
            backlog: 0,
            pipeline_on_order: 0,
            last_placed_order: 0,
            upstream: None,
            downstream: None,
        }
    }

    #[test]
    fn prompt_answer_is_used() {
        let prompt: PromptFn = Arc::new(|_| 7);
        let mut policy = HumanInTheLoop::new(prompt, Duration::from_millis(200), 3);
        assert_eq!(policy.decide_order(&state()), 7);
    }

    #[test]
    fn slow_prompt_falls_back() {
        let prompt: PromptFn = Arc::new(|_| {
            thread::sleep(Duration::from_millis(300));
            99
        });
        let mut policy = HumanInTheLoop::new(prompt, Duration::from_millis(20), 3);
        assert_eq!(policy.decide_order(&state()), 3);
    }
}
