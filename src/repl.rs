use std::io::{BufRead, Write};
use log::debug;
use crate::ast::ParsedLine;
use crate::config::Config;
use crate::error::ShellError;
use crate::heredoc::{read_raw_line, HeredocCollector};
use crate::lexer::{self, Token};
use crate::parser;
use crate::resolver::PathResolver;

/// Read loop that tokenizes and builds each line and prints the result.
///
/// Here-documents are read from the same input as command lines.
pub struct Repl<R, W> {
    input: R,
    output: W,
    config: Config,
    resolver: Option<PathResolver>,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W, config: Config) -> Self {
        let resolver = config.resolve_paths.then(PathResolver::from_env);
        Repl {
            input,
            output,
            config,
            resolver,
        }
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Runs until end of input or `exit`.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            write!(self.output, "{}", self.config.prompt)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                // End with EOF (e.g. Ctrl+D)
                writeln!(self.output)?;
                break;
            };
            if line == "exit" {
                break;
            }
            self.run_line(&line)?;
        }
        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    pub fn run_line(&mut self, line: &str) -> Result<ParsedLine, ShellError> {
        let limits = self.config.limits;
        let tokens = lexer::tokenize(line, &limits)?;
        if self.config.show_tokens {
            self.print_tokens(&tokens)?;
        }

        let collector = HeredocCollector::new(
            &mut self.input,
            &mut self.output,
            &self.config.heredoc_prompt,
            limits.max_heredoc_size,
        );
        let parsed = parser::parse(&tokens, &limits, collector);
        for diag in &parsed.diagnostics {
            eprintln!("Error: {}", diag);
        }

        write!(self.output, "{}", parsed)?;
        self.report_stages(&parsed)?;
        self.output.flush()?;
        Ok(parsed)
    }

    fn read_line(&mut self) -> Result<Option<String>, ShellError> {
        let Some(line) = read_raw_line(&mut self.input)? else {
            return Ok(None);
        };
        let line = line.trim_end_matches('\r');
        debug!("read line: {:?}", line);
        Ok(Some(line.to_string()))
    }

    fn print_tokens(&mut self, tokens: &[Token]) -> Result<(), ShellError> {
        writeln!(self.output, "Tokens:")?;
        for (i, token) in tokens.iter().enumerate() {
            writeln!(self.output, "  Token {}: {}", i, token)?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    // Stands in for the executor's checks: malformed stages are rejected and
    // programs are looked up on PATH.
    fn report_stages(&mut self, parsed: &ParsedLine) -> Result<(), ShellError> {
        for i in parsed.malformed_stages() {
            eprintln!("Error: command {} is empty", i + 1);
        }
        let Some(resolver) = &self.resolver else {
            return Ok(());
        };
        for (i, cmd) in parsed.commands().enumerate() {
            let Some(program) = cmd.program() else {
                continue;
            };
            match resolver.resolve(program) {
                Ok(path) => writeln!(self.output, "  Command {}: {} -> {}", i + 1, program, path.display())?,
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{InputSource, Separator};
    use crate::config::ConfigLoader;
    use std::io::Cursor;

    fn quiet_config() -> Config {
        Config {
            show_tokens: false,
            resolve_paths: false,
            ..ConfigLoader::default_config()
        }
    }

    #[test]
    fn test_run_until_exit() {
        let input = Cursor::new("echo hi > out.txt\nexit\nls\n");
        let mut output = Vec::new();
        Repl::new(input, &mut output, quiet_config()).run().unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("minish> Parsed Commands (1):\n  Command 1: echo\n"));
        assert!(text.contains("    Arguments (2): 'echo' 'hi' \n"));
        assert!(text.contains("    Output: out.txt (append: no)\n"));
        assert!(!text.contains("Command 1: ls"));
        assert!(text.ends_with("minish> Goodbye!\n"));
    }

    #[test]
    fn test_run_until_eof() {
        let input = Cursor::new("true\n");
        let mut output = Vec::new();
        Repl::new(input, &mut output, quiet_config()).run().unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with("minish> \nGoodbye!\n"));
    }

    #[test]
    fn test_heredoc_reads_following_lines() {
        let input = Cursor::new("cat << END | wc\nalpha\nEND\nexit\n");
        let mut output = Vec::new();
        let mut repl = Repl::new(input, &mut output, quiet_config());

        let line = repl.read_line().unwrap().unwrap();
        let parsed = repl.run_line(&line).unwrap();
        assert_eq!(
            parsed.stages[0].command.input,
            Some(InputSource::Heredoc("alpha\n".to_string()))
        );
        assert_eq!(parsed.stages[0].next, Separator::Pipe);

        // The delimiter line was consumed by the collector.
        assert_eq!(repl.read_line().unwrap(), Some("exit".to_string()));
    }

    #[test]
    fn test_invalid_utf8_heredoc_line_stays_in_body() {
        let input = Cursor::new(b"cat << END\n\xff\nrm -rf x\nEND\nexit\n".to_vec());
        let mut output = Vec::new();
        let mut repl = Repl::new(input, &mut output, quiet_config());

        let line = repl.read_line().unwrap().unwrap();
        let parsed = repl.run_line(&line).unwrap();
        assert_eq!(
            parsed.stages[0].command.input,
            Some(InputSource::Heredoc("\u{FFFD}\nrm -rf x\n".to_string()))
        );
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(repl.read_line().unwrap(), Some("exit".to_string()));
    }

    #[test]
    fn test_invalid_utf8_command_line_keeps_session() {
        let input = Cursor::new(b"echo \xff\nexit\n".to_vec());
        let mut output = Vec::new();
        Repl::new(input, &mut output, quiet_config()).run().unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("    Arguments (2): 'echo' '\u{FFFD}' \n"));
        assert!(text.ends_with("minish> Goodbye!\n"));
    }

    #[test]
    fn test_token_dump() {
        let config = Config {
            show_tokens: true,
            ..quiet_config()
        };
        let mut output = Vec::new();
        Repl::new(Cursor::new(""), &mut output, config).run_line("a|b").unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with(
            "Tokens:\n  Token 0: type=Word, value='a'\n  Token 1: type=Pipe, value='|'\n"
        ));
        assert!(text.contains("  Token 3: type=EndOfInput, value='EOF'\n\n"));
    }

    #[test]
    fn test_resolved_programs_are_reported() {
        use std::fs::{self, File};
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        File::create(&tool).unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let mut output = Vec::new();
        Repl::new(Cursor::new(""), &mut output, quiet_config())
            .with_resolver(PathResolver::new(dir.path()))
            .run_line("tool -x | missing")
            .unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains(&format!("  Command 1: tool -> {}\n", tool.display())));
        assert!(!text.contains("missing ->"));
    }
}
