use std::collections::VecDeque;

/// Recent question/answer pairs, rendered into the history text
/// handed to `ResponseGenerator::generate`.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    max_exchanges: usize,
    exchanges: VecDeque<(String, String)>,
}

impl SessionHistory {
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            max_exchanges,
            exchanges: VecDeque::with_capacity(max_exchanges),
        }
    }

    pub fn push<Q: Into<String>, A: Into<String>>(&mut self, question: Q, answer: A) {
        if self.max_exchanges == 0 {
            return;
        }
        while self.exchanges.len() >= self.max_exchanges {
            self.exchanges.pop_front();
        }
        self.exchanges.push_back((question.into(), answer.into()));
    }

    pub fn render(&self) -> Option<String> {
        if self.exchanges.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .exchanges
            .iter()
            .map(|(question, answer)| format!("User: {}\nAssistant: {}", question, answer))
            .collect();
        Some(lines.join("\n"))
    }

}
