use std::ffi::{CString, NulError};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(String),    // < file
    Heredoc(String), // << DELIM, collected body
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub file: String,
    pub append: bool,
}

/// What joins a stage to the one after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// stdout of this stage feeds stdin of the next.
    Pipe,
    /// The next stage runs on its own after this one.
    Sequential,
    /// Last stage of the line.
    End,
}

/// One pipeline stage.
///
/// The program name is always `args[0]`; a stage with no words has no program
/// and is malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub args: Vec<String>,
    pub input: Option<InputSource>,
    pub output: Option<OutputTarget>,
    pub background: bool,
}

impl Command {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(&self) -> Option<&str> {
        self.args.first().map(|s| s.as_str())
    }

    pub fn argv(&self) -> &[String] {
        &self.args
    }

    pub fn argc(&self) -> usize {
        self.args.len()
    }

    pub fn push_word(&mut self, word: &str) {
        self.args.push(word.to_string());
    }

    pub fn is_malformed(&self) -> bool {
        self.args.is_empty()
    }

    /// Argument vector for exec-style calls. Fails if a word contains NUL.
    pub fn c_argv(&self) -> Result<Vec<CString>, NulError> {
        self.args.iter().map(|a| CString::new(a.as_bytes())).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub command: Command,
    pub next: Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub stages: Vec<Stage>,
    pub diagnostics: Vec<crate::parser::Diagnostic>,
}

impl ParsedLine {
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.stages.iter().map(|s| &s.command)
    }

    /// Indices of stages that have no program.
    pub fn malformed_stages(&self) -> Vec<usize> {
        self.stages
            .iter()
            .enumerate()
            .filter(|(_, s)| s.command.is_malformed())
            .map(|(i, _)| i)
            .collect()
    }

    /// Splits the line at sequential boundaries; each slice is a run of
    /// pipe-connected stages.
    pub fn pipelines(&self) -> Vec<&[Stage]> {
        let mut groups = Vec::new();
        let mut start = 0;
        for (i, stage) in self.stages.iter().enumerate() {
            if stage.next != Separator::Pipe {
                groups.push(&self.stages[start..=i]);
                start = i + 1;
            }
        }
        if start < self.stages.len() {
            groups.push(&self.stages[start..]);
        }
        groups
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.program().unwrap_or("(null)"))?;
        write!(f, "    Arguments ({}): ", self.argc())?;
        for arg in &self.args {
            write!(f, "'{}' ", arg)?;
        }
        writeln!(f)?;
        match &self.input {
            Some(InputSource::File(file)) => writeln!(f, "    Input: {}", file)?,
            Some(InputSource::Heredoc(body)) => {
                writeln!(f, "    Here Document: \n----------\n{}----------", body)?
            }
            None => {}
        }
        if let Some(out) = &self.output {
            writeln!(
                f,
                "    Output: {} (append: {})",
                out.file,
                if out.append { "yes" } else { "no" }
            )?;
        }
        writeln!(f, "    Background: {}", if self.background { "yes" } else { "no" })
    }
}

impl fmt::Display for ParsedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Parsed Commands ({}):", self.len())?;
        for (i, stage) in self.stages.iter().enumerate() {
            write!(f, "  Command {}: {}", i + 1, stage.command)?;
            match stage.next {
                Separator::Pipe => writeln!(f, "    Then: | (pipe)")?,
                Separator::Sequential => writeln!(f, "    Then: ; (sequential)")?,
                Separator::End => {}
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
