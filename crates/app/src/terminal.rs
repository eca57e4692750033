use std::io::Write;
use std::sync::Mutex;

use quiz_core::model::{OptionSlot, ScoreReport};
use services::{AnswerResolution, Presentation, QuizSignals};

/// Seconds left at which the countdown is always shown.
const COUNTDOWN_ALERT_SECS: u32 = 5;

/// Plain-text renderer that prints every quiz signal to a writer.
pub struct TerminalSignals<W> {
    out: Mutex<W>,
    current: Mutex<Option<Presentation>>,
}

impl<W: Write + Send> TerminalSignals<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            current: Mutex::new(None),
        }
    }

    /// Print a one-off line, e.g. a rejected command.
    pub fn notice(&self, message: &str) {
        self.write_lines(&[format!("! {message}")]);
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn option_text(&self, slot: OptionSlot) -> Option<String> {
        let current = self.current.lock().ok()?;
        current
            .as_ref()
            .and_then(|p| p.options.get(slot.index()))
            .map(|o| o.text.clone())
    }

    fn write_lines(&self, lines: &[String]) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        for line in lines {
            // Output errors (closed pipe) leave nothing useful to do.
            if writeln!(out, "{line}").is_err() {
                return;
            }
        }
        let _ = out.flush();
    }
}

impl<W: Write + Send> QuizSignals for TerminalSignals<W> {
    fn on_question_loaded(&self, presentation: &Presentation) {
        let mut lines = vec![
            String::new(),
            format!(
                "Question {}/{}: {}",
                presentation.index + 1,
                presentation.total,
                presentation.prompt
            ),
        ];
        for (idx, option) in presentation.options.iter().enumerate() {
            lines.push(format!("  {}. {}", OptionSlot::new(idx), option.text));
        }
        lines.push(format!(
            "Answer with 1-{}, r restarts, q quits.",
            presentation.options.len()
        ));
        if let Ok(mut current) = self.current.lock() {
            *current = Some(presentation.clone());
        }
        self.write_lines(&lines);
    }

    fn on_answer_resolved(&self, resolution: &AnswerResolution) {
        let mut lines = Vec::with_capacity(2);
        if resolution.is_correct {
            lines.push("Correct!".to_string());
        } else {
            let answer = resolution
                .revealed_correct
                .map(|slot| match self.option_text(slot) {
                    Some(text) => format!(" The answer was {slot}. {text}"),
                    None => format!(" The answer was {slot}."),
                })
                .unwrap_or_default();
            lines.push(format!("Wrong.{answer}"));
        }
        lines.push(format!(
            "Score: {}. Press Enter for the next question.",
            resolution.score
        ));
        self.write_lines(&lines);
    }

    fn on_session_completed(&self, report: &ScoreReport) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
        let mut lines = vec![
            String::new(),
            format!(
                "Quiz complete! You scored {}/{} ({}%).",
                report.score, report.total, report.percentage
            ),
            report.tier.message().to_string(),
            format!("High score: {}", report.high_score),
        ];
        if report.high_score_updated {
            lines.push("New high score!".to_string());
        }
        lines.push("Press r to play again or q to quit.".to_string());
        self.write_lines(&lines);
    }

    fn on_tick(&self, seconds_remaining: u32) {
        if seconds_remaining == 0 {
            self.write_lines(&["Time's up!".to_string()]);
        } else if seconds_remaining <= COUNTDOWN_ALERT_SECS
            || seconds_remaining % COUNTDOWN_ALERT_SECS == 0
        {
            self.write_lines(&[format!("Time left: {seconds_remaining}s")]);
        }
    }
}
