use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Program and arguments used to start one actor process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ActorCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Runs `line` through `sh -c`, so pipes, quoting and `exec` work as they
    /// would on a terminal.
    pub fn shell(line: impl Into<String>) -> Self {
        Self {
            program: "sh".to_owned(),
            args: vec!["-c".to_owned(), line.into()],
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl FromStr for ActorCommand {
    type Err = Infallible;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Ok(Self::shell(line))
    }
}

impl fmt::Display for ActorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.args.as_slice() {
            [flag, line] if self.program == "sh" && flag == "-c" => f.write_str(line),
            args => {
                f.write_str(&self.program)?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
        }
    }
}
