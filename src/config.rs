use std::io;
use std::io::{ BufRead, BufReader };
use std::fs::File;
use thiserror::Error;

/// Resource caps applied while lexing and building a command line.
///
/// Every cap truncates instead of failing: the lexer stops producing tokens,
/// words lose their tail, and the builder stops opening new stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Total tokens per line, end marker included.
    pub max_tokens: usize,
    /// Bytes kept from a single word.
    pub max_word_len: usize,
    /// Stages per line.
    pub max_commands: usize,
    /// Bytes accumulated by one here-document.
    pub max_heredoc_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_tokens: 128,
            max_word_len: 255,
            max_commands: 128,
            max_heredoc_size: 4096,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    pub heredoc_prompt: String,
    pub show_tokens: bool,
    pub resolve_paths: bool,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        ConfigLoader::default_config()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config() -> Config {
        Config {
            prompt: "minish> ".to_string(),
            heredoc_prompt: "heredoc> ".to_string(),
            show_tokens: true,
            resolve_paths: true,
            limits: Limits::default(),
        }
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let mut src = String::new();
        for line in BufReader::new(file).lines() {
            src.push_str(&line?);
            src.push('\n');
        }
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = Self::default_config();

        for (lineno, line) in src.lines().enumerate() {
            let lineno = lineno + 1;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!("Line {}: No '=' found: {}", lineno, line)));
            };
            // Prompts keep their surrounding whitespace, so only the key is trimmed.
            let key = key.trim();

            match key {
                "prompt" => config.prompt = value.to_string(),
                "heredoc_prompt" => config.heredoc_prompt = value.to_string(),
                "show_tokens" => config.show_tokens = parse_bool(lineno, value)?,
                "resolve_paths" => config.resolve_paths = parse_bool(lineno, value)?,
                "max_tokens" => config.limits.max_tokens = parse_limit(lineno, value)?,
                "max_word_len" => config.limits.max_word_len = parse_limit(lineno, value)?,
                "max_commands" => config.limits.max_commands = parse_limit(lineno, value)?,
                "max_heredoc_size" => config.limits.max_heredoc_size = parse_limit(lineno, value)?,
                _ => return Err(ConfigError::Parse(format!("Line {}: Unknown key: {}", lineno, key))),
            }
        }

        Ok(config)
    }
}

fn parse_bool(lineno: usize, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(ConfigError::Parse(format!("Line {}: Invalid bool: {}", lineno, other))),
    }
}

fn parse_limit(lineno: usize, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::Parse(format!("Line {}: Limit must be positive", lineno))),
        Ok(n) => Ok(n),
        Err(_) => Err(ConfigError::Parse(format!("Line {}: Invalid usize: {}", lineno, value.trim()))),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}
