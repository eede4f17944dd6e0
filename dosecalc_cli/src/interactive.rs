//! Line-oriented interactive session.
//!
//! Each cycle: search text, pick from the numbered matches, confirm or type
//! weight, dose and concentration, then print the result. Entered values
//! carry over to the next cycle until cleared.

use dosecalc_core::*;
use std::io::{BufRead, Write};

/// What the user typed at a prompt
enum Reply {
    Text(String),
    Clear,
    Quit,
}

/// Whether to keep looping after a cycle
enum Flow {
    Continue,
    Quit,
}

pub struct Session<'a, R, W> {
    catalog: &'a Catalog,
    decimals: usize,
    input: DoseInput,
    medication: String,
    reader: R,
    writer: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(catalog: &'a Catalog, decimals: usize, reader: R, writer: W) -> Self {
        Self {
            catalog,
            decimals,
            input: DoseInput::default(),
            medication: String::new(),
            reader,
            writer,
        }
    }

    pub fn run(mut self) -> Result<()> {
        writeln!(self.writer, "Medication Dose Calculator")?;
        writeln!(
            self.writer,
            "Type 'clear' or 'quit' at any prompt ('c'/'q' after the search)."
        )?;

        while let Flow::Continue = self.cycle()? {}

        writeln!(self.writer, "Goodbye.")?;
        Ok(())
    }

    fn cycle(&mut self) -> Result<Flow> {
        writeln!(self.writer)?;
        let query = match self.ask_search("Search medication: ")? {
            Reply::Text(text) => text,
            Reply::Clear => return self.clear(),
            Reply::Quit => return Ok(Flow::Quit),
        };

        if !query.is_empty() {
            if let Some(flow) = self.choose(&query)? {
                return Ok(flow);
            }
        }

        for field in DoseField::ALL {
            let label = match field {
                DoseField::Weight => "Weight (kg)",
                DoseField::DosePerKg => "Dose (mg/kg)",
                DoseField::Concentration => "Concentration (mg/ml)",
            };
            let current = self.input.get(field);
            let prompt = if current.is_empty() {
                format!("{}: ", label)
            } else {
                format!("{} [{}]: ", label, current)
            };

            match self.ask(&prompt)? {
                Reply::Text(text) if text.is_empty() => {}
                Reply::Text(text) => self.input.set(field, text),
                Reply::Clear => return self.clear(),
                Reply::Quit => return Ok(Flow::Quit),
            }
        }

        self.calculate()?;
        Ok(Flow::Continue)
    }

    /// List matches for `query` and let the user pick one
    ///
    /// Returns `Some(flow)` when the user cleared or quit instead of choosing.
    fn choose(&mut self, query: &str) -> Result<Option<Flow>> {
        let catalog = self.catalog;
        let matches = catalog.filter(query);

        if matches.is_empty() {
            writeln!(self.writer, "No medications match '{}'", query)?;
            self.medication = query.to_string();
            return Ok(None);
        }

        for (index, record) in matches.iter().enumerate() {
            writeln!(self.writer, "  {}. {}", index + 1, record.name)?;
        }

        let prompt = format!("Select [1-{}, Enter to skip]: ", matches.len());
        loop {
            let text = match self.ask(&prompt)? {
                Reply::Text(text) => text,
                Reply::Clear => return self.clear().map(Some),
                Reply::Quit => return Ok(Some(Flow::Quit)),
            };

            if text.is_empty() {
                self.medication = query.to_string();
                return Ok(None);
            }

            let picked = match text.parse::<usize>() {
                Ok(n) if (1..=matches.len()).contains(&n) => Some(matches[n - 1]),
                _ => catalog.find_by_name(&text),
            };

            match picked {
                Some(record) => {
                    self.select(record)?;
                    return Ok(None);
                }
                None => writeln!(self.writer, "Invalid selection '{}'", text)?,
            }
        }
    }

    fn select(&mut self, record: &MedicationRecord) -> Result<()> {
        tracing::debug!("Selected medication {:?}", record.name);
        self.medication = record.name.clone();
        self.input.prefill(record);
        writeln!(
            self.writer,
            "{}: {} mg/kg, {} mg/ml, {}",
            record.name, record.dose_per_kg, record.concentration, record.interval
        )?;
        Ok(())
    }

    fn calculate(&mut self) -> Result<()> {
        let outcome = parse_input(&self.input)
            .and_then(|query| compute_for_medication(self.catalog, &self.medication, &query));

        match outcome {
            Ok(result) => {
                for warning in &result.warnings {
                    writeln!(self.writer, "Warning: {}", warning)?;
                }
                writeln!(self.writer, "{}", result.render(self.decimals))?;
            }
            Err(e) => {
                tracing::error!("Error in calculation: {}", e);
                writeln!(self.writer, "Error: {}", e)?;
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<Flow> {
        self.input.clear();
        self.medication.clear();
        writeln!(self.writer, "Fields cleared.")?;
        Ok(Flow::Continue)
    }

    /// Prompt where single letters are search text, not shortcuts
    fn ask_search(&mut self, prompt: &str) -> Result<Reply> {
        self.read_reply(prompt, false)
    }

    fn ask(&mut self, prompt: &str) -> Result<Reply> {
        self.read_reply(prompt, true)
    }

    fn read_reply(&mut self, prompt: &str, shortcuts: bool) -> Result<Reply> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            // EOF
            writeln!(self.writer)?;
            return Ok(Reply::Quit);
        }

        let text = line.trim();
        let reply = match text.to_lowercase().as_str() {
            "quit" => Reply::Quit,
            "clear" => Reply::Clear,
            "q" if shortcuts => Reply::Quit,
            "c" if shortcuts => Reply::Clear,
            _ => Reply::Text(text.to_string()),
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_session(script: &str) -> String {
        let catalog = build_default_catalog();
        let mut output = Vec::new();
        Session::new(&catalog, 2, script.as_bytes(), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_search_select_and_calculate() {
        let output = run_session("cefix\n1\n20\n\n\nquit\n");
        assert!(output.contains("  1. Cefixime"));
        assert!(output.contains("Dose (mg/kg) [8]: "));
        assert!(output.contains("Dose: 160.00 mg = 8.00 ml, Every 12 hours"));
        assert!(output.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_select_by_exact_name() {
        let output = run_session("para\nParacetamol (100 mg/ml)\n10\n\n\n");
        assert!(output.contains("Dose: 150.00 mg = 1.50 ml, Every 4-6 hours"));
    }

    #[test]
    fn test_manual_entry_without_search() {
        let output = run_session("\n20\n8\n20\nquit\n");
        assert!(output.contains("Dose: 160.00 mg = 8.00 ml\n"));
    }

    #[test]
    fn test_no_match_leaves_interval_empty() {
        let output = run_session("warfarin\n10\n15\n100\n");
        assert!(output.contains("No medications match 'warfarin'"));
        assert!(output.contains("Dose: 150.00 mg = 1.50 ml\n"));
    }

    #[test]
    fn test_invalid_selection_reprompts() {
        let output = run_session("ibu\n7\n1\n10\n\n\n");
        assert!(output.contains("Invalid selection '7'"));
        assert!(output.contains("Dose: 100.00 mg = 5.00 ml, Every 6 hours"));
    }

    #[test]
    fn test_error_is_reported_and_session_continues() {
        let output = run_session("\n20\n8\n0\n\n\n\n20\n");
        assert!(output.contains(
            "Error: Invalid input for concentration: concentration must be greater than zero"
        ));
        // Second cycle keeps weight and dose, replaces concentration
        assert!(output.contains("Dose: 160.00 mg = 8.00 ml"));
    }

    #[test]
    fn test_missing_field_reported() {
        let output = run_session("\n\n8\n20\n");
        assert!(output.contains("Error: Missing input: weight must be filled"));
    }

    #[test]
    fn test_clear_resets_fields() {
        let output = run_session("cefix\n1\nc\n\n20\n8\n20\n");
        assert!(output.contains("Fields cleared."));
        // After clearing, no pre-filled values and no interval
        assert!(output.contains("Dose: 160.00 mg = 8.00 ml\n"));
    }

    #[test]
    fn test_single_letter_search_is_not_a_shortcut() {
        let output = run_session("c\n1\n20\n\n\nquit\n");
        assert!(!output.contains("Fields cleared."));
        assert!(output.contains("  1. Cefixime"));
        assert!(output.contains("Dose: 160.00 mg = 8.00 ml, Every 12 hours"));
        assert!(output.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_full_words_work_at_search_prompt() {
        let output = run_session("cefix\n1\nclear\nq\n");
        assert!(output.contains("Fields cleared."));
        // 'q' at the search prompt is searched for, 'quit' would exit
        assert!(output.contains("No medications match 'q'"));
    }

    #[test]
    fn test_negative_weight_warns() {
        let output = run_session("\n-5\n10\n20\n");
        assert!(output.contains("Warning: weight is not positive (-5 kg)"));
        assert!(output.contains("Dose: -50.00 mg = -2.50 ml"));
    }
}
