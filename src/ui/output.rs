//! Output verbosity.

/// How much the wizard prints besides prompts and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Also report redirects between wizards.
    Verbose,
    /// Form text, hints and progress.
    #[default]
    Normal,
    /// Only results and errors.
    Quiet,
}

impl OutputMode {
    /// Pick the mode for the `--verbose`/`--quiet` flags.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Whether form text, headers and hints are printed.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Whether a spinner runs while a submission executes.
    pub fn shows_spinners(&self) -> bool {
        self.shows_status()
    }

    /// Whether wizard-to-wizard redirects are reported.
    pub fn shows_redirects(&self) -> bool {
        matches!(self, Self::Verbose)
    }
}
