use crate::timeline::ScoreLine;

mod scratch_formatter;

pub use scratch_formatter::ScratchFormatter;

pub trait ScoreFormatter {
    fn format(&self, line: &ScoreLine) -> String;

    fn format_all(&self, lines: &[ScoreLine]) -> String {
        lines
            .iter()
            .map(|line| self.format(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
